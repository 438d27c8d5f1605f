//! roi_gpu - presents software-rendered frames in a window using wgpu.
//!
//! The UI is rasterized on the CPU; this crate only owns the device, the
//! window surface and a single textured quad that blits the frame.

pub mod bindings;
pub mod config;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod texture;

pub use config::{GpuConfig, TextureConfig};
pub use context::GpuContext;
pub use error::{GpuError, Result};
pub use pipeline::{FramePipeline, Vertex};
pub use texture::Texture;
