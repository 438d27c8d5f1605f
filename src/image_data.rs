//! Loading images into arrays.
//!
//! Raster formats are decoded with the `image` crate into `(H, W)` or
//! `(H, W, C)` `u8` arrays. NumPy `.npy` files keep their element type; the
//! dtype is probed in order `f32`, `f64`, `u8`, `u16`, `i16`, `i32`.

use std::io::Cursor;
use std::path::Path;

use image::DynamicImage;
use ndarray::{Array2, Array3, ArrayD};
use ndarray_npy::ReadNpyExt;
use roi_ui::Scalar;

use crate::error::{Error, Result};

/// An image array with one of the supported element types.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedImage {
    U8(ArrayD<u8>),
    U16(ArrayD<u16>),
    I16(ArrayD<i16>),
    I32(ArrayD<i32>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
}

impl LoadedImage {
    /// NumPy magic bytes: \x93NUMPY
    const NPY_MAGIC: &'static [u8] = &[0x93, b'N', b'U', b'M', b'P', b'Y'];

    /// Load an image file, choosing the decoder from its contents.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let image = if data.starts_with(Self::NPY_MAGIC) {
            Self::from_npy_bytes(&data)?
        } else {
            Self::from_dynamic_image(image::load_from_memory(&data)?)?
        };
        log::info!(
            "Loaded {:?}: shape {:?}, dtype {}",
            path,
            image.shape(),
            image.dtype()
        );
        Ok(image)
    }

    /// Read a `.npy` buffer.
    pub fn from_npy_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);

        if let Ok(array) = ArrayD::<f32>::read_npy(&mut cursor) {
            return checked(array).map(LoadedImage::F32);
        }
        cursor.set_position(0);
        if let Ok(array) = ArrayD::<f64>::read_npy(&mut cursor) {
            return checked(array).map(LoadedImage::F64);
        }
        cursor.set_position(0);
        if let Ok(array) = ArrayD::<u8>::read_npy(&mut cursor) {
            return checked(array).map(LoadedImage::U8);
        }
        cursor.set_position(0);
        if let Ok(array) = ArrayD::<u16>::read_npy(&mut cursor) {
            return checked(array).map(LoadedImage::U16);
        }
        cursor.set_position(0);
        if let Ok(array) = ArrayD::<i16>::read_npy(&mut cursor) {
            return checked(array).map(LoadedImage::I16);
        }
        cursor.set_position(0);
        match ArrayD::<i32>::read_npy(&mut cursor) {
            Ok(array) => checked(array).map(LoadedImage::I32),
            Err(e) => {
                log::error!("No supported dtype for NumPy array: {}", e);
                Err(Error::Npy(e))
            }
        }
    }

    /// Convert a decoded raster image to an 8-bit array.
    ///
    /// Grayscale images become `(H, W)`, images with alpha `(H, W, 4)` and
    /// everything else `(H, W, 3)`.
    pub fn from_dynamic_image(image: DynamicImage) -> Result<Self> {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let color = image.color();

        let array = if color.channel_count() == 1 {
            Array2::from_shape_vec((height, width), image.into_luma8().into_raw())?.into_dyn()
        } else if color.has_alpha() {
            Array3::from_shape_vec((height, width, 4), image.into_rgba8().into_raw())?.into_dyn()
        } else {
            Array3::from_shape_vec((height, width, 3), image.into_rgb8().into_raw())?.into_dyn()
        };
        Ok(LoadedImage::U8(array))
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            LoadedImage::U8(a) => a.shape(),
            LoadedImage::U16(a) => a.shape(),
            LoadedImage::I16(a) => a.shape(),
            LoadedImage::I32(a) => a.shape(),
            LoadedImage::F32(a) => a.shape(),
            LoadedImage::F64(a) => a.shape(),
        }
    }

    /// Element type name, as NumPy spells it.
    pub fn dtype(&self) -> &'static str {
        match self {
            LoadedImage::U8(_) => u8::DTYPE,
            LoadedImage::U16(_) => u16::DTYPE,
            LoadedImage::I16(_) => i16::DTYPE,
            LoadedImage::I32(_) => i32::DTYPE,
            LoadedImage::F32(_) => f32::DTYPE,
            LoadedImage::F64(_) => f64::DTYPE,
        }
    }
}

/// Reject arrays that are not 2-D or 3-D.
pub fn check_rank<P>(array: &ArrayD<P>) -> Result<()> {
    match array.ndim() {
        2 | 3 => Ok(()),
        rank => Err(Error::UnsupportedRank { rank }),
    }
}

fn checked<P>(array: ArrayD<P>) -> Result<ArrayD<P>> {
    check_rank(&array)?;
    Ok(array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage, RgbaImage};
    use ndarray::{Array1, Array4};
    use ndarray_npy::WriteNpyExt;

    fn npy_bytes<P: ndarray_npy::WritableElement>(array: &ArrayD<P>) -> Vec<u8> {
        let mut buf = Vec::new();
        array.write_npy(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_npy_keeps_dtype() {
        let array = Array3::<u16>::from_elem((4, 5, 3), 7).into_dyn();
        let loaded = LoadedImage::from_npy_bytes(&npy_bytes(&array)).unwrap();
        assert_eq!(loaded.dtype(), "uint16");
        assert_eq!(loaded, LoadedImage::U16(array));
    }

    #[test]
    fn test_npy_float_first() {
        let array = Array2::<f32>::from_elem((2, 2), 0.5).into_dyn();
        let loaded = LoadedImage::from_npy_bytes(&npy_bytes(&array)).unwrap();
        assert!(matches!(loaded, LoadedImage::F32(_)));
    }

    #[test]
    fn test_npy_rank_is_checked() {
        let flat = Array1::<u8>::zeros(10).into_dyn();
        assert!(matches!(
            LoadedImage::from_npy_bytes(&npy_bytes(&flat)),
            Err(Error::UnsupportedRank { rank: 1 })
        ));
        let four = Array4::<u8>::zeros((1, 2, 2, 3)).into_dyn();
        assert!(check_rank(&four).is_err());
    }

    #[test]
    fn test_garbage_npy_is_an_error() {
        assert!(matches!(
            LoadedImage::from_npy_bytes(b"not a numpy file"),
            Err(Error::Npy(_))
        ));
    }

    #[test]
    fn test_raster_channel_layouts() {
        let gray = DynamicImage::ImageLuma8(GrayImage::new(6, 4));
        assert_eq!(LoadedImage::from_dynamic_image(gray).unwrap().shape(), &[4, 6]);

        let rgb = DynamicImage::ImageRgb8(RgbImage::from_pixel(6, 4, image::Rgb([1, 2, 3])));
        let loaded = LoadedImage::from_dynamic_image(rgb).unwrap();
        assert_eq!(loaded.shape(), &[4, 6, 3]);
        let LoadedImage::U8(array) = loaded else {
            panic!("expected u8 image");
        };
        assert_eq!(array[[3, 5, 2].as_slice()], 3);

        let rgba = DynamicImage::ImageRgba8(RgbaImage::new(2, 2));
        assert_eq!(LoadedImage::from_dynamic_image(rgba).unwrap().shape(), &[2, 2, 4]);
    }
}
