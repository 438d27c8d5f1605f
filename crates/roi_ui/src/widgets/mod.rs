//! Leaf widgets and the plotting canvas.

pub mod button;
pub mod figure;
pub mod number_input;
pub mod rectangle_selector;

pub use button::{button, Button, Icon};
pub use figure::{
    AxesTransform, Axes, DataPoint, FigureCanvas, Patch, PatchId, PatchShape, PatchStyle, DPI,
};
pub use number_input::{number_input, NumberInput};
pub use rectangle_selector::{Extents, RectangleSelector};
