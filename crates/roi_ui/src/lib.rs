//! roi_ui - a small retained widget toolkit with a plotting canvas
//!
//! Widgets live in a shared tree (`Rc<RefCell<dyn Widget>>`) that the
//! application keeps handles into. Everything is rasterized in software;
//! the windowed runtime only uploads finished frames to the GPU.

mod application;
mod callback;
mod colormap;
mod container;
mod display;
mod error;
mod event;
mod icon;
mod layout;
mod renderer;
mod scalar;
mod text;
mod widget;
pub mod widgets;

pub use application::{dispatch, init_logging, run, Application, Settings};
pub use callback::Callback;
pub use colormap::{Colormap, Normalize};
pub use container::{add_instance_to, add_to, column, remove_from, row, Axis, Stack, UiBase};
pub use display::{display, render, set_display_hook, take_display_hook, DisplayHook, Frame, PngSnapshot};
pub use error::{Result, UiError};
pub use event::{Event, Key, Modifiers, MouseButton};
pub use icon::icons;
pub use layout::{Bounds, Padding, Point, Size};
pub use renderer::{Color, Renderer};
pub use scalar::Scalar;
pub use text::TextMetrics;
pub use widget::{handle, Element, Handle, Widget};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::container::{add_to, column, remove_from, row, UiBase};
    pub use crate::event::{Event, Key, MouseButton};
    pub use crate::layout::{Bounds, Padding, Point, Size};
    pub use crate::widget::{handle, Element, Handle, Widget};
    pub use crate::widgets::{
        button, number_input, Button, DataPoint, FigureCanvas, NumberInput, Patch, PatchId,
        PatchStyle, RectangleSelector,
    };
    pub use crate::Color;
}
