//! End-to-end behavior of the composed selector, driven through pointer and
//! key events the way the windowed runtime delivers them.

use std::cell::RefCell;
use std::rc::Rc;

use ndarray::{Array2, Array3, ArrayD};
use roi_select::{BBoxField, Message, RegionSelector, Roi};
use roi_ui::widgets::DataPoint;
use roi_ui::{Bounds, DisplayHook, Event, Frame, Key, Modifiers, MouseButton, Point, Widget};

fn image() -> ArrayD<u8> {
    Array3::from_shape_fn((100, 100, 3), |(r, c, k)| ((r * 2 + c + k * 50) % 256) as u8).into_dyn()
}

fn selector() -> RegionSelector<u8> {
    RegionSelector::new(image(), 5, true).unwrap()
}

fn to_screen(sel: &RegionSelector<u8>, x: f64, y: f64) -> Point {
    sel.selector_transform().to_display(DataPoint::new(x, y))
}

fn drag(sel: &mut RegionSelector<u8>, from: (f64, f64), to: (f64, f64)) {
    let start = to_screen(sel, from.0, from.1);
    let end = to_screen(sel, to.0, to.1);
    sel.dispatch(&Event::MousePressed {
        button: MouseButton::Left,
        position: start,
    });
    sel.dispatch(&Event::MouseMoved { position: end });
    sel.dispatch(&Event::MouseReleased {
        button: MouseButton::Left,
        position: end,
    });
}

fn click(sel: &mut RegionSelector<u8>, position: Point) {
    sel.dispatch(&Event::MousePressed {
        button: MouseButton::Left,
        position,
    });
    sel.dispatch(&Event::MouseReleased {
        button: MouseButton::Left,
        position,
    });
}

fn center(bounds: Bounds) -> Point {
    Point::new(bounds.x + bounds.width / 2.0, bounds.y + bounds.height / 2.0)
}

fn click_draw(sel: &mut RegionSelector<u8>) {
    let position = center(sel.draw_button_bounds());
    click(sel, position);
}

fn click_clear(sel: &mut RegionSelector<u8>) {
    let position = center(sel.clear_button_bounds());
    click(sel, position);
}

fn press_key(sel: &mut RegionSelector<u8>, c: char) {
    sel.dispatch(&Event::KeyPressed {
        key: Key::Char(c),
        modifiers: Modifiers::default(),
    });
}

#[test]
fn test_drag_draw_and_crop() {
    let mut sel = selector();
    drag(&mut sel, (10.0, 10.0), (40.0, 30.0));
    assert_eq!(sel.get_boundaries(), Some(Roi::new(10, 10, 30, 20)));

    click_draw(&mut sel);
    assert!(sel.is_active());
    assert!(!sel.is_draw_enabled());
    assert!(sel.is_clear_enabled());

    let slice = sel.get_roi_slice().unwrap();
    assert_eq!((slice.rows.clone(), slice.cols.clone()), (11..31, 11..41));

    let roi = sel.get_roi();
    assert_eq!(roi.shape(), &[20, 30, 3]);
    let expected = image();
    assert_eq!(roi[[0, 0, 1]], expected[[11, 11, 1]]);
    assert_eq!(roi[[19, 29, 2]], expected[[30, 40, 2]]);
}

#[test]
fn test_no_interaction_returns_full_image() {
    let sel = selector();
    assert_eq!(sel.get_boundaries(), None);
    assert_eq!(sel.get_roi_slice(), None);
    assert_eq!(sel.get_roi(), image().view());
}

#[test]
fn test_drag_direction_does_not_matter() {
    let mut a = selector();
    let mut b = selector();
    drag(&mut a, (10.0, 10.0), (40.0, 30.0));
    drag(&mut b, (40.0, 30.0), (10.0, 10.0));
    assert_eq!(a.get_boundaries(), b.get_boundaries());
}

#[test]
fn test_short_drag_is_ignored() {
    let mut sel = selector();
    // one data unit is under five canvas pixels at this zoom
    drag(&mut sel, (10.0, 10.0), (11.0, 40.0));
    assert_eq!(sel.get_boundaries(), None);
}

#[test]
fn test_draw_clear_draw_cycle() {
    let mut sel = selector();
    drag(&mut sel, (10.0, 10.0), (40.0, 30.0));
    click_draw(&mut sel);

    click_clear(&mut sel);
    assert!(!sel.is_active());
    assert!(sel.is_draw_enabled());
    assert!(!sel.is_clear_enabled());
    assert!(!sel.controls().borrow().inputs_visible());
    assert!(sel.selector().borrow().overlay().is_none());
    assert!(!sel.roi_display().borrow().has_image());
    assert_eq!(sel.get_roi().shape(), &[100, 100, 3]);

    drag(&mut sel, (50.0, 20.0), (90.0, 60.0));
    click_draw(&mut sel);
    assert_eq!(sel.get_inputs(), Some(Roi::new(50, 20, 40, 40)));
    assert_eq!(sel.get_roi().shape(), &[40, 40, 3]);
    assert!(!sel.is_draw_enabled());
    assert!(sel.is_clear_enabled());
}

#[test]
fn test_disabled_clear_does_nothing() {
    let mut sel = selector();
    drag(&mut sel, (10.0, 10.0), (40.0, 30.0));
    click_clear(&mut sel);
    assert!(sel.is_draw_enabled());
    assert_eq!(sel.get_boundaries(), Some(Roi::new(10, 10, 30, 20)));
}

#[test]
fn test_editing_one_field_moves_overlay() {
    let mut sel = selector();
    sel.update(Message::Selected {
        click: DataPoint::new(10.0, 10.0),
        release: DataPoint::new(40.0, 30.0),
    });
    sel.update(Message::Draw);

    let message = sel
        .controls()
        .borrow()
        .field(BBoxField::X)
        .borrow_mut()
        .set_value(20);
    sel.update(message.unwrap());

    assert_eq!(sel.get_inputs(), Some(Roi::new(20, 10, 30, 20)));
    assert_eq!(sel.get_boundaries(), Some(Roi::new(20, 10, 30, 20)));
    let slice = sel.get_roi_slice().unwrap();
    assert_eq!((slice.rows, slice.cols), (11..31, 21..51));
    assert_eq!(sel.roi_display().borrow().image_shape(), Some((20, 30)));
}

#[test]
fn test_fields_clamp_edits() {
    let mut sel = selector();
    sel.update(Message::Selected {
        click: DataPoint::new(10.0, 10.0),
        release: DataPoint::new(40.0, 30.0),
    });
    sel.update(Message::Draw);

    let message = sel
        .controls()
        .borrow()
        .field(BBoxField::Width)
        .borrow_mut()
        .set_value(1000);
    sel.update(message.unwrap());
    assert_eq!(sel.get_inputs().map(|r| r.width), Some(100));
    // cropping past the edge keeps the in-bounds part
    assert_eq!(sel.get_roi().shape(), &[20, 89, 3]);
}

#[test]
fn test_toggle_key_disables_selector() {
    let mut sel = selector();
    let inside = to_screen(&sel, 50.0, 50.0);
    sel.dispatch(&Event::MouseMoved { position: inside });
    press_key(&mut sel, 't');
    assert!(!sel.selector().borrow().is_selector_active());

    drag(&mut sel, (10.0, 10.0), (40.0, 30.0));
    assert_eq!(sel.get_boundaries(), None);

    sel.dispatch(&Event::MouseMoved { position: inside });
    press_key(&mut sel, 't');
    drag(&mut sel, (10.0, 10.0), (40.0, 30.0));
    assert_eq!(sel.get_boundaries(), Some(Roi::new(10, 10, 30, 20)));
}

#[test]
fn test_grayscale_image() {
    let gray = Array2::from_shape_fn((60, 80), |(r, c)| (r * 80 + c) as f32).into_dyn();
    let mut sel = RegionSelector::new(gray, 5, true).unwrap();
    sel.update(Message::Selected {
        click: DataPoint::new(5.0, 5.0),
        release: DataPoint::new(25.0, 15.0),
    });
    sel.update(Message::Draw);
    assert_eq!(sel.get_roi().shape(), &[10, 20]);
    assert_eq!(sel.get_roi()[[0, 0]], (6 * 80 + 6) as f32);
}

struct Recorder(Rc<RefCell<Vec<(u32, u32)>>>);

impl DisplayHook for Recorder {
    fn show(&mut self, frame: &Frame) -> roi_ui::Result<()> {
        self.0.borrow_mut().push((frame.width, frame.height));
        Ok(())
    }
}

#[test]
fn test_displays_on_construction_unless_hidden() {
    let frames = Rc::new(RefCell::new(Vec::new()));
    roi_ui::set_display_hook(Box::new(Recorder(Rc::clone(&frames))));

    let hidden = RegionSelector::new(image(), 5, true).unwrap();
    assert!(frames.borrow().is_empty());

    let shown = RegionSelector::new(image(), 5, false).unwrap();
    let size = shown.root_widget().borrow().size();
    assert_eq!(
        *frames.borrow(),
        vec![(size.width.ceil() as u32, size.height.ceil() as u32)]
    );
    drop(hidden);

    roi_ui::take_display_hook();
}

#[test]
fn test_empty_crop_clears_preview() {
    let image = Array3::<u8>::zeros((100, 100, 3)).into_dyn();
    let mut sel = RegionSelector::new(image, 1, true).unwrap();
    sel.update(Message::Selected {
        click: DataPoint::new(10.0, 10.0),
        release: DataPoint::new(40.0, 30.0),
    });
    sel.update(Message::Draw);
    assert_eq!(sel.roi_display().borrow().image_shape(), Some((20, 30)));

    let message = sel
        .controls()
        .borrow()
        .field(BBoxField::X)
        .borrow_mut()
        .set_value(99);
    sel.update(message.unwrap());

    assert_eq!(sel.get_inputs(), Some(Roi::new(99, 10, 30, 20)));
    assert_eq!(sel.get_roi().shape(), &[20, 0, 3]);
    // nothing left to show, so the previous crop must not linger
    assert!(!sel.roi_display().borrow().has_image());
}

#[test]
fn test_buttons_sit_in_sidebar() {
    let sel = selector();
    let figure = sel.selector_transform().area;
    let draw = sel.draw_button_bounds();
    let clear = sel.clear_button_bounds();
    assert!(draw.x >= figure.right());
    assert!(clear.x >= draw.right());
    assert_eq!(draw.y, clear.y);
}
