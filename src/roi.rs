//! Region of interest value types.

use std::ops::Range;
use std::str::FromStr;

use ndarray::{ArrayViewD, Slice};
use roi_ui::widgets::{Patch, PatchStyle};
use serde::{Deserialize, Serialize};

/// Rectangular region of interest in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Roi {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Default for Roi {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 100,
            height: 100,
        }
    }
}

/// Shape used to draw an [`Roi`] on the axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatchKind {
    #[default]
    Rectangle,
}

impl FromStr for PatchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Rectangle" | "rectangle" => Ok(PatchKind::Rectangle),
            other => Err(format!("unknown patch kind '{}'", other)),
        }
    }
}

impl Roi {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a drawable patch anchored at `(x, y)` with this size.
    pub fn draw(&self, kind: PatchKind, style: PatchStyle) -> Patch {
        match kind {
            PatchKind::Rectangle => Patch::rectangle(
                self.x as f64,
                self.y as f64,
                self.width as f64,
                self.height as f64,
                style,
            ),
        }
    }
}

/// Half-open row and column index ranges selecting a region of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoiSlice {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl RoiSlice {
    /// Slice covering `roi` shifted by `offset` pixels on both axes.
    ///
    /// The offset keeps the drawn outline out of the crop. Negative
    /// coordinates saturate at zero.
    pub fn from_roi(roi: &Roi, offset: i64) -> Self {
        let index = |v: i64| usize::try_from(v.max(0)).unwrap_or(0);
        Self {
            rows: index(roi.y + offset)..index(roi.y + roi.height + offset),
            cols: index(roi.x + offset)..index(roi.x + roi.width + offset),
        }
    }

    /// Shape `(rows, cols)` the slice would have if fully in bounds.
    pub fn extent(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }

    /// View of `image` restricted to this slice.
    ///
    /// Ranges reaching past the array edge are clipped, so the view is
    /// smaller (possibly empty) rather than out of bounds. Axes after the
    /// second are kept whole.
    pub fn apply<'a, P>(&self, image: ArrayViewD<'a, P>) -> ArrayViewD<'a, P> {
        let mut view = image;
        view.slice_each_axis_inplace(|axis| match axis.axis.index() {
            0 => Slice::from(clip(&self.rows, axis.len)),
            1 => Slice::from(clip(&self.cols, axis.len)),
            _ => Slice::from(..),
        });
        view
    }
}

fn clip(range: &Range<usize>, len: usize) -> Range<usize> {
    let start = range.start.min(len);
    start..range.end.clamp(start, len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3, Ix2};
    use roi_ui::widgets::PatchShape;

    #[test]
    fn test_slice_offsets_by_linewidth() {
        let slice = RoiSlice::from_roi(&Roi::new(10, 10, 30, 20), 1);
        assert_eq!(slice.rows, 11..31);
        assert_eq!(slice.cols, 11..41);
        assert_eq!(slice.extent(), (20, 30));
    }

    #[test]
    fn test_apply_keeps_channels() {
        let image = Array3::<u8>::zeros((100, 100, 3));
        let slice = RoiSlice::from_roi(&Roi::new(10, 10, 30, 20), 1);
        assert_eq!(slice.apply(image.view().into_dyn()).shape(), &[20, 30, 3]);
    }

    #[test]
    fn test_apply_takes_offset_region() {
        let image = Array2::from_shape_fn((8, 8), |(r, c)| (r * 8 + c) as u16).into_dyn();
        let view = RoiSlice::from_roi(&Roi::new(2, 3, 2, 2), 1)
            .apply(image.view())
            .into_dimensionality::<Ix2>()
            .unwrap();
        assert_eq!(view.shape(), &[2, 2]);
        assert_eq!(view[[0, 0]], 4 * 8 + 3);
        assert_eq!(view[[1, 1]], 5 * 8 + 4);
    }

    #[test]
    fn test_apply_clips_at_edges() {
        let image = Array2::<u8>::zeros((10, 10)).into_dyn();
        let view = RoiSlice::from_roi(&Roi::new(5, 5, 10, 10), 1).apply(image.view());
        assert_eq!(view.shape(), &[4, 4]);

        let outside = RoiSlice::from_roi(&Roi::new(20, 20, 5, 5), 0).apply(image.view());
        assert_eq!(outside.shape(), &[0, 0]);
    }

    #[test]
    fn test_draw_rectangle() {
        let style = PatchStyle::default();
        let patch = Roi::new(1, 2, 3, 4).draw("Rectangle".parse().unwrap(), style);
        assert_eq!(
            patch.shape,
            PatchShape::Rectangle {
                x: 1.0,
                y: 2.0,
                width: 3.0,
                height: 4.0
            }
        );
        assert!("Circle".parse::<PatchKind>().is_err());
    }
}
