use thiserror::Error;

/// Errors raised by the toolkit.
#[derive(Debug, Error)]
pub enum UiError {
    #[error("Failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU error: {0}")]
    Gpu(#[from] roi_gpu::GpuError),

    #[error("Cannot display array of shape {shape:?}: expected (H, W) or (H, W, 1|3|4)")]
    UnsupportedImageShape { shape: Vec<usize> },

    #[error("Nothing to render: widget has zero size")]
    EmptyFrame,

    #[error("Failed to encode frame: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Application state still borrowed after the event loop exited")]
    Shutdown,
}

pub type Result<T> = std::result::Result<T, UiError>;
