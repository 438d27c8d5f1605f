use thiserror::Error;

#[derive(Debug, Error)]
pub enum GpuError {
    #[error("Failed to request adapter: {0}")]
    AdapterRequest(#[from] wgpu::RequestAdapterError),

    #[error("Failed to request device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("Failed to create surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("Surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("Invalid frame size: expected {expected} bytes for {width}x{height} RGBA8, got {actual}")]
    FrameSize {
        expected: usize,
        actual: usize,
        width: u32,
        height: u32,
    },
}

pub type Result<T> = std::result::Result<T, GpuError>;
