//! Widget trait and shared widget handles.

use std::cell::RefCell;
use std::rc::Rc;

use crate::event::Event;
use crate::layout::{Bounds, Size};
use crate::renderer::Renderer;

/// The core widget trait that all UI elements implement.
///
/// Widgets are retained: they live in a tree for the lifetime of the UI and
/// are mutated by the application between events.
pub trait Widget<M> {
    /// The size this widget occupies in its parent's layout.
    fn size(&self) -> Size;

    /// Draw the widget into `bounds`.
    fn draw(&self, renderer: &mut Renderer, bounds: Bounds);

    /// Handle an event, producing any messages it triggers.
    fn on_event(&mut self, event: &Event, bounds: Bounds) -> Vec<M> {
        let _ = (event, bounds);
        Vec::new()
    }

    /// Hidden widgets keep their layout slot but are neither drawn nor
    /// receive events.
    fn is_visible(&self) -> bool {
        true
    }
}

/// Shared, typed reference to a widget in the tree.
pub type Handle<W> = Rc<RefCell<W>>;

/// Type-erased child of a container.
pub type Element<M> = Rc<RefCell<dyn Widget<M>>>;

/// Wrap a widget into a shareable handle.
pub fn handle<W>(widget: W) -> Handle<W> {
    Rc::new(RefCell::new(widget))
}

/// Whether `element` and `target` point at the same widget.
pub fn same_widget<M, W: ?Sized>(element: &Element<M>, target: &Rc<RefCell<W>>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(element), Rc::as_ptr(target))
}
