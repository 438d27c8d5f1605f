//! The composed region selector.
//!
//! Layout: the selector figure on the left; on the right a sidebar with the
//! Draw/Clear buttons, the four bounding box fields and the cropped preview.

use std::collections::VecDeque;
use std::rc::Rc;

use ndarray::{ArrayD, ArrayViewD};
use roi_ui::widgets::{button, AxesTransform, Button, Icon, PatchStyle};
use roi_ui::{
    column, icons, row, Application, Bounds, Element, Event, Handle, Scalar, Stack, UiBase,
    Widget,
};
use serde::Serialize;

use crate::config::AppConfig;
use crate::constants::{
    BUTTONS_MARGIN, BUTTON_SPACING, BUTTON_WIDTH, SIDEBAR_MARGIN, WINDOW_TITLE,
};
use crate::error::Result;
use crate::image_data::check_rank;
use crate::message::{BBoxField, Message};
use crate::roi::{Roi, RoiSlice};
use crate::ui::{BBoxControls, ImageRegionDisplay, ImageRegionSelect};

const DRAW_ICON: Icon = Icon {
    name: "compass",
    svg: icons::COMPASS,
};

const CLEAR_ICON: Icon = Icon {
    name: "trash",
    svg: icons::TRASH,
};

/// Summary of the final selection, printed by the binary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionReport {
    pub boundaries: Option<Roi>,
    pub inputs: Option<Roi>,
    pub slice: Option<RoiSlice>,
    pub roi_shape: Vec<usize>,
}

/// Interactive region of interest selection on one image.
///
/// Drag on the image, press Draw to commit the box, fine tune it with the
/// fields, read the crop back with [`RegionSelector::get_roi`].
pub struct RegionSelector<P: Scalar> {
    image: ArrayD<P>,
    active: bool,
    root: Handle<Stack<Message>>,
    sidebar: Handle<Stack<Message>>,
    buttons: Handle<Stack<Message>>,
    selector: Handle<ImageRegionSelect>,
    draw_button: Handle<Button<Message>>,
    clear_button: Handle<Button<Message>>,
    controls: Handle<BBoxControls>,
    roi: Handle<ImageRegionDisplay>,
    bbox_style: PatchStyle,
    pending: VecDeque<Message>,
}

impl<P: Scalar> RegionSelector<P> {
    /// Selector with default styling. Displays itself unless `hidden`.
    pub fn new(image: ArrayD<P>, minspan: i64, hidden: bool) -> Result<Self> {
        let config = AppConfig {
            minspan,
            hidden,
            ..AppConfig::default()
        };
        Self::with_config(image, &config)
    }

    pub fn with_config(image: ArrayD<P>, config: &AppConfig) -> Result<Self> {
        check_rank(&image)?;
        let (height, width) = (image.shape()[0] as i64, image.shape()[1] as i64);
        let bbox_style = config.bbox_style.to_patch_style()?;

        let mut root = row().spacing(0.0);
        let selector = root.add(ImageRegionSelect::new(
            image.view(),
            config.selector_figsize,
            config.minspan,
            config.colormap,
        )?);

        let mut sidebar = column().margin(SIDEBAR_MARGIN);

        let mut buttons = row().spacing(BUTTON_SPACING).margin(BUTTONS_MARGIN);
        let draw_button = buttons.add(
            button("Draw")
                .icon(DRAW_ICON)
                .width(BUTTON_WIDTH)
                .on_click(Message::Draw),
        );
        let clear_button = buttons.add(
            button("Clear")
                .icon(CLEAR_ICON)
                .width(BUTTON_WIDTH)
                .on_click(Message::Clear)
                .disabled(true),
        );
        let buttons = sidebar.add(buttons);

        let controls = sidebar.add(BBoxControls::new(
            height,
            width,
            config.bbox_style.offset(),
            config.minspan,
        ));
        let roi = sidebar.add(ImageRegionDisplay::new(
            config.display_figsize,
            config.colormap,
        ));
        let sidebar = root.add(sidebar);

        let root = roi_ui::handle(root);
        if !config.hidden {
            roi_ui::display(&*root.borrow())?;
        }
        log::debug!(
            "Region selector ready for {:?} image, minspan {}",
            image.shape(),
            config.minspan
        );

        Ok(Self {
            image,
            active: false,
            root,
            sidebar,
            buttons,
            selector,
            draw_button,
            clear_button,
            controls,
            roi,
            bbox_style,
            pending: VecDeque::new(),
        })
    }

    /// The cropped image, or the whole image when no region is committed.
    pub fn get_roi(&self) -> ArrayViewD<'_, P> {
        match self.get_roi_slice() {
            Some(slice) => slice.apply(self.image.view()),
            None => self.image.view(),
        }
    }

    /// Row and column ranges of the committed region.
    pub fn get_roi_slice(&self) -> Option<RoiSlice> {
        self.active.then(|| self.controls.borrow().get_slice())
    }

    /// Bounding box of the last drag on the image.
    pub fn get_boundaries(&self) -> Option<Roi> {
        self.selector.borrow().get_boundaries()
    }

    /// Field values of the committed region.
    pub fn get_inputs(&self) -> Option<Roi> {
        self.active.then(|| self.controls.borrow().get_inputs())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_draw_enabled(&self) -> bool {
        !self.draw_button.borrow().is_disabled()
    }

    pub fn is_clear_enabled(&self) -> bool {
        !self.clear_button.borrow().is_disabled()
    }

    pub fn image(&self) -> &ArrayD<P> {
        &self.image
    }

    pub fn selector(&self) -> &Handle<ImageRegionSelect> {
        &self.selector
    }

    pub fn controls(&self) -> &Handle<BBoxControls> {
        &self.controls
    }

    pub fn roi_display(&self) -> &Handle<ImageRegionDisplay> {
        &self.roi
    }

    pub fn root_widget(&self) -> &Handle<Stack<Message>> {
        &self.root
    }

    /// Data transform of the selector figure within the root layout.
    pub fn selector_transform(&self) -> AxesTransform {
        let root = self.root.borrow();
        let bounds = Bounds::from_size(root.size());
        let placed = root.child_bounds(bounds).first().copied().unwrap_or(bounds);
        let selector = self.selector.borrow();
        let canvas = selector.canvas().borrow();
        canvas.transform(placed)
    }

    /// Placement of the Draw button within the root layout.
    pub fn draw_button_bounds(&self) -> Bounds {
        self.button_bounds(0)
    }

    /// Placement of the Clear button within the root layout.
    pub fn clear_button_bounds(&self) -> Bounds {
        self.button_bounds(1)
    }

    fn button_bounds(&self, index: usize) -> Bounds {
        let root = self.root.borrow();
        let bounds = Bounds::from_size(root.size());
        let sidebar = root.child_bounds(bounds).get(1).copied().unwrap_or(bounds);
        let buttons = self
            .sidebar
            .borrow()
            .child_bounds(sidebar)
            .first()
            .copied()
            .unwrap_or(sidebar);
        self.buttons
            .borrow()
            .child_bounds(buttons)
            .get(index)
            .copied()
            .unwrap_or(buttons)
    }

    pub fn report(&self) -> SelectionReport {
        SelectionReport {
            boundaries: self.get_boundaries(),
            inputs: self.get_inputs(),
            slice: self.get_roi_slice(),
            roi_shape: self.get_roi().shape().to_vec(),
        }
    }

    /// Handle `message` and every notification it triggers, in order.
    pub fn update(&mut self, message: Message) {
        self.pending.push_back(message);
        while let Some(message) = self.pending.pop_front() {
            if let Err(e) = self.handle(message) {
                log::error!("Failed to update region: {}", e);
            }
        }
    }

    fn handle(&mut self, message: Message) -> Result<()> {
        match message {
            Message::Draw => self.draw_region(),
            Message::Clear => self.clear_region(),
            Message::Selected { click, release } => {
                log::debug!("Selection ({:?}) -> ({:?})", click, release);
                self.selector.borrow_mut().record_selection(click, release);
                Ok(())
            }
            Message::RegionEdited(field, value) => self.update_region(field, value),
        }
    }

    /// Commit the last drag as the region.
    ///
    /// Does nothing when there was no drag yet.
    pub fn draw_region(&mut self) -> Result<()> {
        let Some(boundaries) = self.get_boundaries() else {
            log::debug!("Draw ignored: nothing selected");
            return Ok(());
        };
        log::debug!("Drawing region {:?}", boundaries);
        self.active = true;

        {
            let controls = self.controls.borrow();
            let notifications = controls.set_inputs(boundaries);
            self.pending.extend(notifications);
            controls.show_inputs();
        }
        self.selector
            .borrow_mut()
            .draw_roi(boundaries, self.bbox_style);
        self.draw_button.borrow_mut().set_disabled(true);
        self.clear_button.borrow_mut().set_disabled(false);
        self.refresh_display()
    }

    /// Drop the committed region and go back to selecting.
    pub fn clear_region(&mut self) -> Result<()> {
        log::debug!("Clearing region");
        self.active = false;
        self.controls.borrow().hide_inputs();
        self.selector.borrow_mut().remove_roi();
        self.roi.borrow().clear_plot();
        self.draw_button.borrow_mut().set_disabled(false);
        self.clear_button.borrow_mut().set_disabled(true);
        Ok(())
    }

    /// Move the outline and preview to the current field values.
    pub fn update_region(&mut self, field: BBoxField, value: i64) -> Result<()> {
        if !self.active {
            log::trace!("Ignoring {} = {} while no region is drawn", field.name(), value);
            return Ok(());
        }
        log::debug!("Field {} changed to {}", field.name(), value);
        let roi = self.controls.borrow().get_inputs();
        self.selector.borrow_mut().update_roi(roi);
        self.refresh_display()
    }

    fn refresh_display(&self) -> Result<()> {
        let roi = self.roi.borrow();
        roi.clear_plot();
        roi.plot(self.get_roi())
    }

    /// Deliver a pointer or key event to the widget tree.
    pub fn dispatch(&mut self, event: &Event) {
        let root = self.root();
        roi_ui::dispatch(self, &root, event);
    }
}

impl<P: Scalar> Application for RegionSelector<P> {
    type Message = Message;

    fn title(&self) -> String {
        WINDOW_TITLE.to_string()
    }

    fn root(&self) -> Element<Message> {
        Rc::clone(&self.root) as Element<Message>
    }

    fn update(&mut self, message: Message) {
        RegionSelector::update(self, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use roi_ui::widgets::DataPoint;

    fn gradient() -> ArrayD<u8> {
        Array3::from_shape_fn((100, 100, 3), |(r, c, k)| ((r + c + k) % 256) as u8).into_dyn()
    }

    fn selected(x0: f64, y0: f64, x1: f64, y1: f64) -> Message {
        Message::Selected {
            click: DataPoint::new(x0, y0),
            release: DataPoint::new(x1, y1),
        }
    }

    #[test]
    fn test_initial_state() {
        let sel = RegionSelector::new(gradient(), 5, true).unwrap();
        assert!(!sel.is_active());
        assert!(sel.is_draw_enabled());
        assert!(!sel.is_clear_enabled());
        assert_eq!(sel.get_boundaries(), None);
        assert_eq!(sel.get_roi_slice(), None);
        assert_eq!(sel.get_inputs(), None);
        assert_eq!(sel.get_roi(), sel.image().view());
    }

    #[test]
    fn test_draw_commits_selection() {
        let mut sel = RegionSelector::new(gradient(), 5, true).unwrap();
        sel.update(selected(10.0, 10.0, 40.0, 30.0));
        sel.update(Message::Draw);

        assert!(sel.is_active());
        assert_eq!(sel.get_inputs(), Some(Roi::new(10, 10, 30, 20)));
        assert_eq!(sel.get_roi().shape(), &[20, 30, 3]);
        assert_eq!(sel.get_roi()[[0, 0, 0]], sel.image()[[11, 11, 0]]);
        assert!(sel.controls().borrow().inputs_visible());
        assert!(!sel.selector().borrow().is_selector_visible());
        assert_eq!(sel.roi_display().borrow().image_shape(), Some((20, 30)));
    }

    #[test]
    fn test_draw_without_selection_is_noop() {
        let mut sel = RegionSelector::new(gradient(), 5, true).unwrap();
        sel.update(Message::Draw);
        assert!(!sel.is_active());
        assert!(sel.is_draw_enabled());
        assert!(!sel.roi_display().borrow().has_image());
    }

    #[test]
    fn test_edits_ignored_while_inactive() {
        let mut sel = RegionSelector::new(gradient(), 5, true).unwrap();
        sel.update(Message::RegionEdited(BBoxField::X, 20));
        assert!(sel.selector().borrow().overlay().is_none());
        assert!(!sel.roi_display().borrow().has_image());
    }

    #[test]
    fn test_report_serializes() {
        let mut sel = RegionSelector::new(gradient(), 5, true).unwrap();
        sel.update(selected(10.0, 10.0, 40.0, 30.0));
        sel.update(Message::Draw);
        let json = serde_json::to_value(sel.report()).unwrap();
        assert_eq!(json["boundaries"]["width"], 30);
        assert_eq!(json["roi_shape"], serde_json::json!([20, 30, 3]));
    }

    #[test]
    fn test_rejects_bad_rank() {
        let flat = ndarray::Array1::<u8>::zeros(10).into_dyn();
        assert!(RegionSelector::new(flat, 5, true).is_err());
    }
}
