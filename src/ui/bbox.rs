//! Bounding box input fields.

use roi_ui::widgets::{number_input, NumberInput};
use roi_ui::{column, Bounds, Element, Event, Handle, Renderer, Size, Stack, UiBase, Widget};

use crate::constants::INPUT_WIDTH;
use crate::message::{BBoxField, Message};
use crate::roi::{Roi, RoiSlice};

/// Input field for one side of the bounding box. Starts hidden.
pub type BBoxInput = NumberInput<Message>;

/// Build a hidden field reporting its edits as [`Message::RegionEdited`].
pub fn bbox_input(field: BBoxField, value: i64, min: i64, max: i64) -> BBoxInput {
    let mut input = number_input(field.name(), min, max)
        .value(value)
        .width(INPUT_WIDTH)
        .on_change(move |v| Message::RegionEdited(field, v));
    input.set_visible(false);
    input
}

/// The four bounded integer fields holding the committed ROI.
///
/// Each field clamps itself: `x` to `[0, width - minspan]`, `y` to
/// `[0, height - minspan]`, `width` to `[minspan, width]` and `height` to
/// `[minspan, height]`.
pub struct BBoxControls {
    stack: Stack<Message>,
    pub x: Handle<BBoxInput>,
    pub y: Handle<BBoxInput>,
    pub width: Handle<BBoxInput>,
    pub height: Handle<BBoxInput>,
    linewidth: i64,
}

impl BBoxControls {
    /// Controls for an image of `height` x `width` pixels.
    pub fn new(height: i64, width: i64, linewidth: i64, minspan: i64) -> Self {
        let mut stack = column().spacing(2.0);
        let x = stack.add(bbox_input(BBoxField::X, 0, 0, width - minspan));
        let y = stack.add(bbox_input(BBoxField::Y, 0, 0, height - minspan));
        let w = stack.add(bbox_input(BBoxField::Width, minspan, minspan, width));
        let h = stack.add(bbox_input(BBoxField::Height, minspan, minspan, height));
        Self {
            stack,
            x,
            y,
            width: w,
            height: h,
            linewidth,
        }
    }

    pub fn field(&self, field: BBoxField) -> &Handle<BBoxInput> {
        match field {
            BBoxField::X => &self.x,
            BBoxField::Y => &self.y,
            BBoxField::Width => &self.width,
            BBoxField::Height => &self.height,
        }
    }

    pub fn linewidth(&self) -> i64 {
        self.linewidth
    }

    /// Current field values.
    pub fn get_inputs(&self) -> Roi {
        Roi::new(
            self.x.borrow().get(),
            self.y.borrow().get(),
            self.width.borrow().get(),
            self.height.borrow().get(),
        )
    }

    /// Set all four fields, returning the change notifications they raise.
    pub fn set_inputs(&self, roi: Roi) -> Vec<Message> {
        [
            (BBoxField::X, roi.x),
            (BBoxField::Y, roi.y),
            (BBoxField::Width, roi.width),
            (BBoxField::Height, roi.height),
        ]
        .into_iter()
        .filter_map(|(field, value)| self.field(field).borrow_mut().set_value(value))
        .collect()
    }

    /// Array slice of the field values, offset by the outline width.
    pub fn get_slice(&self) -> RoiSlice {
        RoiSlice::from_roi(&self.get_inputs(), self.linewidth)
    }

    pub fn show_inputs(&self) {
        self.set_inputs_visible(true);
    }

    pub fn hide_inputs(&self) {
        self.set_inputs_visible(false);
    }

    /// Whether the fields are shown. They are always shown or hidden together.
    pub fn inputs_visible(&self) -> bool {
        self.x.borrow().is_visible()
    }

    fn set_inputs_visible(&self, visible: bool) {
        for field in BBoxField::ALL {
            self.field(field).borrow_mut().set_visible(visible);
        }
    }
}

impl UiBase<Message> for BBoxControls {
    fn children(&self) -> &[Element<Message>] {
        self.stack.children()
    }

    fn children_mut(&mut self) -> &mut Vec<Element<Message>> {
        self.stack.children_mut()
    }
}

impl Widget<Message> for BBoxControls {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> BBoxControls {
        BBoxControls::new(100, 100, 1, 5)
    }

    #[test]
    fn test_initial_values_and_visibility() {
        let c = controls();
        assert_eq!(c.get_inputs(), Roi::new(0, 0, 5, 5));
        assert!(!c.inputs_visible());
        assert_eq!(c.children().len(), 4);
    }

    #[test]
    fn test_set_inputs_notifies_changes_only() {
        let c = controls();
        let notes = c.set_inputs(Roi::new(0, 10, 30, 5));
        assert_eq!(
            notes,
            vec![
                Message::RegionEdited(BBoxField::Y, 10),
                Message::RegionEdited(BBoxField::Width, 30),
            ]
        );
        assert_eq!(c.get_inputs(), Roi::new(0, 10, 30, 5));
    }

    #[test]
    fn test_fields_clamp() {
        let c = controls();
        c.set_inputs(Roi::new(99, -3, 500, 1));
        assert_eq!(c.get_inputs(), Roi::new(95, 0, 100, 5));
    }

    #[test]
    fn test_slice_uses_linewidth() {
        let c = controls();
        c.set_inputs(Roi::new(10, 10, 30, 20));
        let slice = c.get_slice();
        assert_eq!((slice.rows, slice.cols), (11..31, 11..41));
    }

    #[test]
    fn test_show_hide_all() {
        let c = controls();
        c.show_inputs();
        assert!(BBoxField::ALL
            .iter()
            .all(|f| c.field(*f).borrow().is_visible()));
        c.hide_inputs();
        assert!(BBoxField::ALL
            .iter()
            .all(|f| !c.field(*f).borrow().is_visible()));
    }
}
