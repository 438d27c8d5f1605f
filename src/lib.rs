//! ROI Select - interactive region of interest selection
//!
//! Drag a box on an image, commit it, fine tune it with four bounded fields
//! and read the cropped array back.

pub mod config;
pub mod constants;
pub mod error;
pub mod image_data;
pub mod message;
pub mod region_selector;
pub mod roi;
pub mod ui;

pub use config::{AppConfig, BBoxStyle, LogLevel};
pub use error::{Error, Result};
pub use image_data::LoadedImage;
pub use message::{BBoxField, Message};
pub use region_selector::{RegionSelector, SelectionReport};
pub use roi::{PatchKind, Roi, RoiSlice};
