//! Image figures: the interactive selector and the cropped preview.

use ndarray::ArrayViewD;
use roi_ui::widgets::{DataPoint, Extents, FigureCanvas, Patch, PatchId, PatchStyle, RectangleSelector};
use roi_ui::{
    column, Bounds, Colormap, Element, Event, Handle, Renderer, Scalar, Size, Stack, UiBase,
    Widget,
};

use crate::error::Result;
use crate::message::Message;
use crate::roi::{PatchKind, Roi};

/// A figure canvas showing one image with the fixed 8-bit display range.
///
/// Axis decorations are always off.
pub struct ImageBase {
    stack: Stack<Message>,
    canvas: Handle<FigureCanvas<Message>>,
    colormap: Colormap,
}

impl ImageBase {
    /// Empty figure of `figsize` inches.
    pub fn new(figsize: (f32, f32), colormap: Colormap) -> Self {
        let mut stack = column().spacing(0.0);
        let canvas = stack.add(FigureCanvas::new(figsize));
        canvas.borrow_mut().axes_mut().set_axis_visible(false);
        Self {
            stack,
            canvas,
            colormap,
        }
    }

    /// Figure showing `image`, unless `hidden`.
    pub fn with_image<P: Scalar>(
        image: ArrayViewD<'_, P>,
        figsize: (f32, f32),
        colormap: Colormap,
        hidden: bool,
    ) -> Result<Self> {
        let base = Self::new(figsize, colormap);
        if !hidden {
            base.plot(image)?;
        }
        Ok(base)
    }

    pub fn canvas(&self) -> &Handle<FigureCanvas<Message>> {
        &self.canvas
    }

    /// Draw `image` into the axes.
    pub fn plot<P: Scalar>(&self, image: ArrayViewD<'_, P>) -> Result<()> {
        self.canvas
            .borrow_mut()
            .axes_mut()
            .imshow(image, self.colormap)?;
        Ok(())
    }

    /// Erase everything drawn on the axes.
    pub fn clear_plot(&self) {
        let mut canvas = self.canvas.borrow_mut();
        let axes = canvas.axes_mut();
        axes.clear();
        axes.set_axis_visible(false);
    }
}

impl UiBase<Message> for ImageBase {
    fn children(&self) -> &[Element<Message>] {
        self.stack.children()
    }

    fn children_mut(&mut self) -> &mut Vec<Element<Message>> {
        self.stack.children_mut()
    }
}

impl Widget<Message> for ImageBase {
    fn size(&self) -> Size {
        self.stack.size()
    }

    fn draw(&self, renderer: &mut Renderer, bounds: Bounds) {
        self.stack.draw(renderer, bounds);
    }

    fn on_event(&mut self, event: &Event, bounds: Bounds) -> Vec<Message> {
        self.stack.on_event(event, bounds)
    }
}

/// Last completed drag, in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub click: DataPoint,
    pub release: DataPoint,
}

impl Selection {
    /// Integer bounding box of the drag, independent of drag direction.
    ///
    /// Rounds half to even, on the minimum corner and on the span.
    pub fn boundaries(&self) -> Roi {
        let (x0, x1) = (
            self.click.x.min(self.release.x),
            self.click.x.max(self.release.x),
        );
        let (y0, y1) = (
            self.click.y.min(self.release.y),
            self.click.y.max(self.release.y),
        );
        Roi::new(
            x0.round_ties_even() as i64,
            y0.round_ties_even() as i64,
            (x1 - x0).round_ties_even() as i64,
            (y1 - y0).round_ties_even() as i64,
        )
    }
}

/// Figure with a rubber-band selector and at most one committed ROI
/// outline.
///
/// While an outline is committed the live selector is hidden; removing the
/// outline shows it again.
pub struct ImageRegionSelect {
    base: ImageBase,
    selection: Option<Selection>,
    overlay: Option<PatchId>,
}

impl ImageRegionSelect {
    pub fn new<P: Scalar>(
        image: ArrayViewD<'_, P>,
        figsize: (f32, f32),
        minspan: i64,
        colormap: Colormap,
    ) -> Result<Self> {
        let base = ImageBase::with_image(image, figsize, colormap, false)?;
        let selector = RectangleSelector::new(|(click, release)| Message::Selected { click, release })
            .minspan(minspan as f32)
            .interactive(true);
        base.canvas().borrow_mut().set_selector(selector);
        Ok(Self {
            base,
            selection: None,
            overlay: None,
        })
    }

    pub fn base(&self) -> &ImageBase {
        &self.base
    }

    pub fn canvas(&self) -> &Handle<FigureCanvas<Message>> {
        self.base.canvas()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Remember a completed drag.
    pub fn record_selection(&mut self, click: DataPoint, release: DataPoint) {
        self.selection = Some(Selection { click, release });
    }

    /// Bounding box of the last drag, if there was one.
    pub fn get_boundaries(&self) -> Option<Roi> {
        self.selection.map(|s| s.boundaries())
    }

    /// Commit `roi` as an outline and hide the live selector.
    ///
    /// An outline that is already committed is replaced.
    pub fn draw_roi(&mut self, roi: Roi, style: PatchStyle) {
        let mut canvas = self.base.canvas.borrow_mut();
        if let Some(previous) = self.overlay.take() {
            canvas.axes_mut().remove_patch(previous);
        }
        self.overlay = Some(canvas.axes_mut().add_patch(roi.draw(PatchKind::Rectangle, style)));
        if let Some(selector) = canvas.selector_mut() {
            selector.set_visible(false);
        }
    }

    /// Remove the committed outline, if any, and show the live selector.
    ///
    /// Returns whether an outline was removed.
    pub fn remove_roi(&mut self) -> bool {
        let mut canvas = self.base.canvas.borrow_mut();
        let removed = self
            .overlay
            .take()
            .and_then(|id| canvas.axes_mut().remove_patch(id))
            .is_some();
        if let Some(selector) = canvas.selector_mut() {
            selector.set_visible(true);
        }
        removed
    }

    /// Move the selection, the live selector and the outline to `roi`.
    pub fn update_roi(&mut self, roi: Roi) {
        let (x, y) = (roi.x as f64, roi.y as f64);
        let (x1, y1) = ((roi.x + roi.width) as f64, (roi.y + roi.height) as f64);
        self.selection = Some(Selection {
            click: DataPoint::new(x, y),
            release: DataPoint::new(x1, y1),
        });

        let mut canvas = self.base.canvas.borrow_mut();
        if let Some(selector) = canvas.selector_mut() {
            selector.set_extents(Extents {
                xmin: x,
                xmax: x1,
                ymin: y,
                ymax: y1,
            });
        }
        if let Some(id) = self.overlay {
            if let Some(patch) = canvas.axes_mut().patch_mut(id) {
                patch.set_bounds(x, y, roi.width as f64, roi.height as f64);
            }
        }
    }

    /// The committed outline.
    pub fn overlay(&self) -> Option<Patch> {
        let canvas = self.base.canvas.borrow();
        self.overlay.and_then(|id| canvas.axes().patch(id).copied())
    }

    pub fn is_selector_visible(&self) -> bool {
        self.base
            .canvas
            .borrow()
            .selector()
            .is_some_and(|s| s.is_visible())
    }

    pub fn is_selector_active(&self) -> bool {
        self.base
            .canvas
            .borrow()
            .selector()
            .is_some_and(|s| s.is_active())
    }
}

impl Widget<Message> for ImageRegionSelect {
    fn size(&self) -> Size {
        self.base.size()
    }

    fn draw(&self, renderer: &mut Renderer, bounds: Bounds) {
        self.base.draw(renderer, bounds);
    }

    fn on_event(&mut self, event: &Event, bounds: Bounds) -> Vec<Message> {
        self.base.on_event(event, bounds)
    }
}

/// Passive preview of the cropped region. Starts empty.
pub struct ImageRegionDisplay {
    base: ImageBase,
}

impl ImageRegionDisplay {
    pub fn new(figsize: (f32, f32), colormap: Colormap) -> Self {
        Self {
            base: ImageBase::new(figsize, colormap),
        }
    }

    pub fn plot<P: Scalar>(&self, image: ArrayViewD<'_, P>) -> Result<()> {
        self.base.plot(image)
    }

    pub fn clear_plot(&self) {
        self.base.clear_plot();
    }

    pub fn has_image(&self) -> bool {
        self.base.canvas().borrow().axes().has_image()
    }

    /// `(rows, cols)` of the image shown.
    pub fn image_shape(&self) -> Option<(usize, usize)> {
        self.base.canvas().borrow().axes().image_shape()
    }
}

impl Widget<Message> for ImageRegionDisplay {
    fn size(&self) -> Size {
        self.base.size()
    }

    fn draw(&self, renderer: &mut Renderer, bounds: Bounds) {
        self.base.draw(renderer, bounds);
    }
}
