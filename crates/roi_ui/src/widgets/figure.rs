//! Plotting canvas: a figure with a single image axes.
//!
//! Data coordinates follow the image convention. Pixel `(row, col)` is
//! centered on `(x = col, y = row)`, the image covers
//! `[-0.5, W - 0.5] x [-0.5, H - 0.5]` and y grows downward. The image is
//! fit into the canvas keeping its aspect ratio.

use ndarray::{ArrayViewD, Ix2, Ix3};
use tiny_skia::{ColorU8, Pixmap};

use crate::colormap::{Colormap, Normalize};
use crate::error::{Result, UiError};
use crate::event::{Event, Key};
use crate::layout::{Bounds, Point, Size};
use crate::renderer::{Color, Renderer};
use crate::scalar::Scalar;
use crate::widget::Widget;
use crate::widgets::rectangle_selector::RectangleSelector;

/// Figures are laid out at a fixed resolution.
pub const DPI: f32 = 100.0;
/// Gap between the canvas edge and the axes.
const AXES_PADDING: f32 = 4.0;

/// A position in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Stroke/fill options for a patch. Line widths are in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchStyle {
    pub linewidth: f32,
    pub edgecolor: Option<Color>,
    pub facecolor: Option<Color>,
}

impl Default for PatchStyle {
    fn default() -> Self {
        Self {
            linewidth: 1.0,
            edgecolor: Some(Color::BLACK),
            facecolor: None,
        }
    }
}

impl PatchStyle {
    /// Stroke width in layout pixels at `dpi`.
    pub fn linewidth_px(&self, dpi: f32) -> f32 {
        self.linewidth * dpi / 72.0
    }
}

/// Geometry of a drawable shape, in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatchShape {
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// A styled shape drawn over the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patch {
    pub shape: PatchShape,
    pub style: PatchStyle,
}

impl Patch {
    /// Rectangle anchored at `(x, y)` spanning `width` x `height`.
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64, style: PatchStyle) -> Self {
        Self {
            shape: PatchShape::Rectangle {
                x,
                y,
                width,
                height,
            },
            style,
        }
    }

    /// Move and resize a rectangle in place.
    pub fn set_bounds(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.shape = PatchShape::Rectangle {
            x,
            y,
            width,
            height,
        };
    }
}

/// Handle to a patch added to an [`Axes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatchId(u64);

/// Mapping between data coordinates and layout pixels for one placement of
/// the axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxesTransform {
    /// Axes rectangle in layout pixels
    pub area: Bounds,
    pub xlim: (f64, f64),
    /// `(top, bottom)` in data coordinates
    pub ylim: (f64, f64),
}

impl AxesTransform {
    pub fn to_display(&self, point: DataPoint) -> Point {
        let fx = (point.x - self.xlim.0) / (self.xlim.1 - self.xlim.0);
        let fy = (point.y - self.ylim.0) / (self.ylim.1 - self.ylim.0);
        Point::new(
            self.area.x + (fx * f64::from(self.area.width)) as f32,
            self.area.y + (fy * f64::from(self.area.height)) as f32,
        )
    }

    pub fn to_data(&self, point: Point) -> DataPoint {
        let fx = f64::from(point.x - self.area.x) / f64::from(self.area.width.max(f32::EPSILON));
        let fy = f64::from(point.y - self.area.y) / f64::from(self.area.height.max(f32::EPSILON));
        DataPoint::new(
            self.xlim.0 + fx * (self.xlim.1 - self.xlim.0),
            self.ylim.0 + fy * (self.ylim.1 - self.ylim.0),
        )
    }

    /// Clip a data point into the axes limits.
    pub fn clip(&self, point: DataPoint) -> DataPoint {
        let (x0, x1) = (self.xlim.0.min(self.xlim.1), self.xlim.0.max(self.xlim.1));
        let (y0, y1) = (self.ylim.0.min(self.ylim.1), self.ylim.0.max(self.ylim.1));
        DataPoint::new(point.x.clamp(x0, x1), point.y.clamp(y0, y1))
    }

    /// Display rectangle covering the data rectangle with corners `a`, `b`.
    pub fn rect_to_display(&self, a: DataPoint, b: DataPoint) -> Bounds {
        let p = self.to_display(a);
        let q = self.to_display(b);
        Bounds::new(
            p.x.min(q.x),
            p.y.min(q.y),
            (p.x - q.x).abs(),
            (p.y - q.y).abs(),
        )
    }
}

/// The rendered image and its array shape.
struct ImageArtist {
    pixmap: Pixmap,
    rows: usize,
    cols: usize,
}

/// A single plotting area holding at most one image plus patches.
#[derive(Default)]
pub struct Axes {
    image: Option<ImageArtist>,
    patches: Vec<(PatchId, Patch)>,
    next_patch: u64,
    axis_visible: bool,
}

impl Axes {
    pub fn new() -> Self {
        Self {
            axis_visible: true,
            ..Self::default()
        }
    }

    /// Draw `image` with the fixed 8-bit display range.
    ///
    /// 2-D arrays (and single-channel 3-D arrays) go through `colormap`;
    /// 3- and 4-channel arrays are drawn as RGB(A).
    pub fn imshow<S: Scalar>(&mut self, image: ArrayViewD<'_, S>, colormap: Colormap) -> Result<()> {
        let (rows, cols) = (
            image.shape().first().copied().unwrap_or(0),
            image.shape().get(1).copied().unwrap_or(0),
        );
        let pixmap = image_pixmap(image, colormap, Normalize::EIGHT_BIT)?;
        log::debug!("imshow {}x{} {}", cols, rows, S::DTYPE);
        self.image = Some(ImageArtist { pixmap, rows, cols });
        Ok(())
    }

    /// Remove the image and all patches, and hide the axis decorations.
    pub fn clear(&mut self) {
        self.image = None;
        self.patches.clear();
        self.axis_visible = false;
    }

    pub fn set_axis_visible(&mut self, visible: bool) {
        self.axis_visible = visible;
    }

    pub fn axis_visible(&self) -> bool {
        self.axis_visible
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// `(rows, cols)` of the current image.
    pub fn image_shape(&self) -> Option<(usize, usize)> {
        self.image.as_ref().map(|img| (img.rows, img.cols))
    }

    pub fn image_pixmap(&self) -> Option<&Pixmap> {
        self.image.as_ref().map(|img| &img.pixmap)
    }

    pub fn add_patch(&mut self, patch: Patch) -> PatchId {
        let id = PatchId(self.next_patch);
        self.next_patch += 1;
        self.patches.push((id, patch));
        id
    }

    /// Remove a patch, returning it if it was still present.
    pub fn remove_patch(&mut self, id: PatchId) -> Option<Patch> {
        let index = self.patches.iter().position(|(pid, _)| *pid == id)?;
        Some(self.patches.remove(index).1)
    }

    pub fn patch(&self, id: PatchId) -> Option<&Patch> {
        self.patches.iter().find(|(pid, _)| *pid == id).map(|(_, p)| p)
    }

    pub fn patch_mut(&mut self, id: PatchId) -> Option<&mut Patch> {
        self.patches
            .iter_mut()
            .find(|(pid, _)| *pid == id)
            .map(|(_, p)| p)
    }

    pub fn patches(&self) -> impl Iterator<Item = &Patch> {
        self.patches.iter().map(|(_, p)| p)
    }

    /// Data limits: the image extent, or the unit square without an image.
    fn limits(&self) -> ((f64, f64), (f64, f64)) {
        match &self.image {
            Some(img) => ((-0.5, img.cols as f64 - 0.5), (-0.5, img.rows as f64 - 0.5)),
            None => ((0.0, 1.0), (0.0, 1.0)),
        }
    }

    /// Transform for the axes placed in the canvas area `bounds`.
    pub fn transform(&self, bounds: Bounds) -> AxesTransform {
        let inner = Bounds::new(
            bounds.x + AXES_PADDING,
            bounds.y + AXES_PADDING,
            (bounds.width - 2.0 * AXES_PADDING).max(1.0),
            (bounds.height - 2.0 * AXES_PADDING).max(1.0),
        );
        let (xlim, ylim) = self.limits();
        let area = match &self.image {
            Some(img) if img.rows > 0 && img.cols > 0 => {
                let aspect = img.cols as f32 / img.rows as f32;
                let (w, h) = if inner.width / inner.height > aspect {
                    (inner.height * aspect, inner.height)
                } else {
                    (inner.width, inner.width / aspect)
                };
                Bounds::new(
                    inner.x + (inner.width - w) / 2.0,
                    inner.y + (inner.height - h) / 2.0,
                    w,
                    h,
                )
            }
            _ => inner,
        };
        AxesTransform { area, xlim, ylim }
    }

    fn draw(&self, renderer: &mut Renderer, transform: &AxesTransform, dpi: f32) {
        if let Some(img) = &self.image {
            renderer.draw_pixmap(&img.pixmap, transform.area);
        }
        renderer.with_clip(transform.area, |r| {
            for (_, patch) in &self.patches {
                draw_patch(r, transform, patch, dpi);
            }
        });
        if self.axis_visible {
            renderer.stroke_rect(transform.area, Color::BLACK, 1.0);
        }
    }
}

fn draw_patch(renderer: &mut Renderer, transform: &AxesTransform, patch: &Patch, dpi: f32) {
    match patch.shape {
        PatchShape::Rectangle {
            x,
            y,
            width,
            height,
        } => {
            let rect = transform.rect_to_display(
                DataPoint::new(x, y),
                DataPoint::new(x + width, y + height),
            );
            if let Some(face) = patch.style.facecolor {
                renderer.fill_rect(rect, face);
            }
            if let Some(edge) = patch.style.edgecolor {
                renderer.stroke_rect(rect, edge, patch.style.linewidth_px(dpi));
            }
        }
    }
}

/// Rasterize an (H, W) or (H, W, C) array into an RGBA pixmap.
pub fn image_pixmap<S: Scalar>(
    image: ArrayViewD<'_, S>,
    colormap: Colormap,
    norm: Normalize,
) -> Result<Pixmap> {
    let shape = image.shape().to_vec();
    let unsupported = || UiError::UnsupportedImageShape {
        shape: shape.clone(),
    };
    let channels = match shape.len() {
        2 => 1,
        3 if matches!(shape[2], 1 | 3 | 4) => shape[2],
        _ => return Err(unsupported()),
    };
    let (rows, cols) = (shape[0], shape[1]);
    let mut pixmap = Pixmap::new(cols as u32, rows as u32).ok_or(UiError::EmptyFrame)?;
    let pixels = pixmap.pixels_mut();

    let mapped = |v: S| {
        let [r, g, b] = colormap.map(norm.apply(v.to_f64()));
        ColorU8::from_rgba(r, g, b, 255)
    };

    if shape.len() == 2 {
        let image = image.into_dimensionality::<Ix2>().map_err(|_| unsupported())?;
        for ((row, col), &v) in image.indexed_iter() {
            pixels[row * cols + col] = mapped(v).premultiply();
        }
        return Ok(pixmap);
    }

    let image = image.into_dimensionality::<Ix3>().map_err(|_| unsupported())?;
    for (index, px) in image.lanes(ndarray::Axis(2)).into_iter().enumerate() {
        let color = match channels {
            1 => mapped(px[0]),
            3 => ColorU8::from_rgba(
                norm.to_u8(px[0].to_f64()),
                norm.to_u8(px[1].to_f64()),
                norm.to_u8(px[2].to_f64()),
                255,
            ),
            _ => ColorU8::from_rgba(
                norm.to_u8(px[0].to_f64()),
                norm.to_u8(px[1].to_f64()),
                norm.to_u8(px[2].to_f64()),
                norm.to_u8(px[3].to_f64()),
            ),
        };
        pixels[index] = color.premultiply();
    }
    Ok(pixmap)
}

/// A figure of fixed size (in inches) holding one [`Axes`] and an optional
/// rectangle selector.
pub struct FigureCanvas<M> {
    figsize: (f32, f32),
    dpi: f32,
    axes: Axes,
    selector: Option<RectangleSelector<M>>,
    visible: bool,
    hovered: bool,
}

impl<M> FigureCanvas<M> {
    pub fn new(figsize: (f32, f32)) -> Self {
        Self {
            figsize,
            dpi: DPI,
            axes: Axes::new(),
            selector: None,
            visible: true,
            hovered: false,
        }
    }

    pub fn figsize(&self) -> (f32, f32) {
        self.figsize
    }

    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    pub fn axes_mut(&mut self) -> &mut Axes {
        &mut self.axes
    }

    /// Attach a selector to the axes, replacing any previous one.
    pub fn set_selector(&mut self, selector: RectangleSelector<M>) {
        self.selector = Some(selector);
    }

    pub fn selector(&self) -> Option<&RectangleSelector<M>> {
        self.selector.as_ref()
    }

    pub fn selector_mut(&mut self) -> Option<&mut RectangleSelector<M>> {
        self.selector.as_mut()
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Transform for the canvas placed at `bounds`.
    pub fn transform(&self, bounds: Bounds) -> AxesTransform {
        self.axes.transform(bounds)
    }
}

impl<M> Widget<M> for FigureCanvas<M> {
    fn size(&self) -> Size {
        Size::new(self.figsize.0 * self.dpi, self.figsize.1 * self.dpi)
    }

    fn draw(&self, renderer: &mut Renderer, bounds: Bounds) {
        renderer.fill_rect(bounds, Color::WHITE);
        let transform = self.transform(bounds);
        self.axes.draw(renderer, &transform, self.dpi);
        if let Some(selector) = &self.selector {
            renderer.with_clip(transform.area, |r| selector.draw(r, &transform, self.dpi));
        }
    }

    fn on_event(&mut self, event: &Event, bounds: Bounds) -> Vec<M> {
        if let Some(position) = event.position() {
            self.hovered = bounds.contains(position);
        }
        let transform = self.axes.transform(bounds);
        let Some(selector) = self.selector.as_mut() else {
            return Vec::new();
        };
        match event {
            Event::KeyPressed {
                key: Key::Char('t' | 'T'),
                ..
            } if self.hovered => {
                selector.set_active(!selector.is_active());
                log::debug!("Rectangle selector active: {}", selector.is_active());
                Vec::new()
            }
            _ => selector.on_event(event, &transform).into_iter().collect(),
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};

    fn square_image() -> Array2<u8> {
        Array2::from_shape_fn((10, 10), |(r, c)| (r * 10 + c) as u8)
    }

    #[test]
    fn test_transform_roundtrip_and_extent() {
        let mut axes = Axes::new();
        axes.imshow(square_image().into_dyn().view(), Colormap::Gray)
            .unwrap();
        let t = axes.transform(Bounds::new(0.0, 0.0, 208.0, 108.0));

        // 100x100 square centered horizontally in the padded area
        assert_eq!(t.area, Bounds::new(54.0, 4.0, 100.0, 100.0));
        assert_eq!(t.to_display(DataPoint::new(-0.5, -0.5)), Point::new(54.0, 4.0));
        let p = t.to_data(Point::new(104.0, 54.0));
        assert!((p.x - 4.5).abs() < 1e-9 && (p.y - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_clip_to_limits() {
        let mut axes = Axes::new();
        axes.imshow(square_image().into_dyn().view(), Colormap::Gray)
            .unwrap();
        let t = axes.transform(Bounds::new(0.0, 0.0, 108.0, 108.0));
        assert_eq!(
            t.clip(DataPoint::new(-3.0, 20.0)),
            DataPoint::new(-0.5, 9.5)
        );
    }

    #[test]
    fn test_image_pixmap_normalizes_to_eight_bit() {
        let rgb = Array3::from_shape_fn((2, 3, 3), |(_, c, k)| {
            if k == 0 {
                c as f64 * 200.0
            } else {
                0.0
            }
        });
        let pixmap = image_pixmap(rgb.into_dyn().view(), Colormap::Gray, Normalize::EIGHT_BIT)
            .unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (3, 2));
        let reds: Vec<u8> = pixmap.pixels()[..3].iter().map(|p| p.red()).collect();
        assert_eq!(reds, vec![0, 200, 255]);
    }

    #[test]
    fn test_unsupported_shapes_are_rejected() {
        let two_channel = Array3::<u8>::zeros((4, 4, 2));
        assert!(matches!(
            image_pixmap(two_channel.into_dyn().view(), Colormap::Gray, Normalize::EIGHT_BIT),
            Err(UiError::UnsupportedImageShape { .. })
        ));
        let flat = ndarray::Array1::<u8>::zeros(4);
        assert!(image_pixmap(flat.into_dyn().view(), Colormap::Gray, Normalize::EIGHT_BIT).is_err());
    }

    #[test]
    fn test_patch_handles() {
        let mut axes = Axes::new();
        let id = axes.add_patch(Patch::rectangle(1.0, 1.0, 2.0, 2.0, PatchStyle::default()));
        axes.patch_mut(id).unwrap().set_bounds(0.0, 0.0, 5.0, 5.0);
        assert!(matches!(
            axes.patch(id).map(|p| p.shape),
            Some(PatchShape::Rectangle { width, .. }) if width == 5.0
        ));
        assert!(axes.remove_patch(id).is_some());
        assert!(axes.remove_patch(id).is_none());
    }

    #[test]
    fn test_clear_hides_axis() {
        let mut axes = Axes::new();
        axes.imshow(square_image().into_dyn().view(), Colormap::Viridis)
            .unwrap();
        axes.add_patch(Patch::rectangle(0.0, 0.0, 1.0, 1.0, PatchStyle::default()));
        axes.clear();
        assert!(!axes.has_image());
        assert_eq!(axes.patches().count(), 0);
        assert!(!axes.axis_visible());
    }

    #[test]
    fn test_canvas_size_from_figsize() {
        let canvas = FigureCanvas::<()>::new((7.0, 5.0));
        assert_eq!(canvas.size(), Size::new(700.0, 500.0));
    }
}
