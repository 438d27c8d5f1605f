//! Composite widgets of the region selector.

pub mod bbox;
pub mod figure;

pub use bbox::{bbox_input, BBoxControls, BBoxInput};
pub use figure::{ImageBase, ImageRegionDisplay, ImageRegionSelect, Selection};
