//! Render pipeline abstractions.

pub mod builder;
pub mod frame;

pub use builder::{BindGroupLayoutBuilder, PipelineBuilder};
pub use frame::{FramePipeline, Vertex};
