//! Component tree building blocks.
//!
//! [`UiBase`] gives any container with a child list `add`/`add_to`/
//! `remove_from` helpers. [`Stack`] is the concrete row/column container.

use crate::event::Event;
use crate::layout::{Bounds, Padding, Size};
use crate::renderer::Renderer;
use crate::widget::{handle, same_widget, Element, Handle, Widget};

/// A container whose children can be added and removed.
pub trait UiBase<M: 'static> {
    fn children(&self) -> &[Element<M>];

    fn children_mut(&mut self) -> &mut Vec<Element<M>>;

    /// Add `widget` to this container, returning its handle.
    fn add<W: Widget<M> + 'static>(&mut self, widget: W) -> Handle<W>
    where
        Self: Sized,
    {
        add_to(self, widget)
    }

    /// Add an already shared widget to this container.
    fn add_instance<W: Widget<M> + 'static>(&mut self, instance: Handle<W>) -> Handle<W>
    where
        Self: Sized,
    {
        add_instance_to(self, instance)
    }

    /// Remove `component` from this container if present.
    fn remove<W: ?Sized>(&mut self, component: &Handle<W>) -> bool
    where
        Self: Sized,
    {
        remove_from(self, component)
    }
}

/// Add `widget` to `container`'s children, returning its handle.
pub fn add_to<M, C, W>(container: &mut C, widget: W) -> Handle<W>
where
    M: 'static,
    C: UiBase<M> + ?Sized,
    W: Widget<M> + 'static,
{
    add_instance_to(container, handle(widget))
}

/// Add an existing handle to `container`'s children.
pub fn add_instance_to<M, C, W>(container: &mut C, instance: Handle<W>) -> Handle<W>
where
    M: 'static,
    C: UiBase<M> + ?Sized,
    W: Widget<M> + 'static,
{
    let element: Element<M> = instance.clone();
    container.children_mut().push(element);
    instance
}

/// Remove the first child of `container` that is `component`.
///
/// A component that is not a child is not an error; the call does nothing
/// and returns `false`.
pub fn remove_from<M, C, W>(container: &mut C, component: &Handle<W>) -> bool
where
    M: 'static,
    C: UiBase<M> + ?Sized,
    W: ?Sized,
{
    let children = container.children_mut();
    match children.iter().position(|child| same_widget(child, component)) {
        Some(index) => {
            children.remove(index);
            true
        }
        None => {
            log::trace!("remove_from: component is not a child, ignoring");
            false
        }
    }
}

/// Stacking direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A row or column of children.
pub struct Stack<M> {
    axis: Axis,
    children: Vec<Element<M>>,
    spacing: f32,
    margin: Padding,
    visible: bool,
}

/// Create an empty column (children stacked top to bottom).
pub fn column<M>() -> Stack<M> {
    Stack::new(Axis::Vertical)
}

/// Create an empty row (children stacked left to right).
pub fn row<M>() -> Stack<M> {
    Stack::new(Axis::Horizontal)
}

impl<M> Stack<M> {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            children: Vec::new(),
            spacing: 4.0,
            margin: Padding::ZERO,
            visible: true,
        }
    }

    /// Gap between consecutive children.
    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Outer margin around the stack.
    pub fn margin(mut self, margin: impl Into<Padding>) -> Self {
        self.margin = margin.into();
        self
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Bounds of each child when the stack is placed at `bounds`.
    pub fn child_bounds(&self, bounds: Bounds) -> Vec<Bounds> {
        let inner = bounds.shrink(self.margin);
        let mut cursor = match self.axis {
            Axis::Horizontal => inner.x,
            Axis::Vertical => inner.y,
        };
        self.children
            .iter()
            .map(|child| {
                let size = child.borrow().size();
                let placed = match self.axis {
                    Axis::Horizontal => Bounds::new(cursor, inner.y, size.width, size.height),
                    Axis::Vertical => Bounds::new(inner.x, cursor, size.width, size.height),
                };
                cursor += match self.axis {
                    Axis::Horizontal => size.width,
                    Axis::Vertical => size.height,
                } + self.spacing;
                placed
            })
            .collect()
    }
}

impl<M: 'static> UiBase<M> for Stack<M> {
    fn children(&self) -> &[Element<M>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Element<M>> {
        &mut self.children
    }
}

impl<M: 'static> Widget<M> for Stack<M> {
    fn size(&self) -> Size {
        let mut main = 0.0f32;
        let mut cross = 0.0f32;
        for child in &self.children {
            let size = child.borrow().size();
            let (m, c) = match self.axis {
                Axis::Horizontal => (size.width, size.height),
                Axis::Vertical => (size.height, size.width),
            };
            main += m;
            cross = cross.max(c);
        }
        if self.children.len() > 1 {
            main += self.spacing * (self.children.len() - 1) as f32;
        }
        let (width, height) = match self.axis {
            Axis::Horizontal => (main, cross),
            Axis::Vertical => (cross, main),
        };
        Size::new(
            width + self.margin.horizontal(),
            height + self.margin.vertical(),
        )
    }

    fn draw(&self, renderer: &mut Renderer, bounds: Bounds) {
        for (child, child_bounds) in self.children.iter().zip(self.child_bounds(bounds)) {
            let child = child.borrow();
            if child.is_visible() {
                child.draw(renderer, child_bounds);
            }
        }
    }

    fn on_event(&mut self, event: &Event, bounds: Bounds) -> Vec<M> {
        let placements = self.child_bounds(bounds);
        let mut messages = Vec::new();
        for (child, child_bounds) in self.children.iter().zip(placements) {
            let mut child = child.borrow_mut();
            if child.is_visible() {
                messages.extend(child.on_event(event, child_bounds));
            }
        }
        messages
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}
