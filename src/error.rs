//! Error types for loading images, reading configuration and running the UI.

use thiserror::Error;

/// Errors that can occur in the region selector.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Raster image could not be decoded
    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    /// NumPy file could not be read with any supported element type
    #[error("Failed to read NumPy array: {0}")]
    Npy(#[from] ndarray_npy::ReadNpyError),

    /// Decoded buffer does not match the expected array shape
    #[error("Invalid array shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Images must be 2-D (grayscale) or 3-D (channels last)
    #[error("Unsupported image rank {rank}: expected a 2-D or 3-D array")]
    UnsupportedRank {
        /// Number of dimensions of the rejected array
        rank: usize,
    },

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration written by a newer version
    #[error("Config version {file_version} is newer than supported version {supported_version}")]
    ConfigVersion {
        /// Version found in the file
        file_version: u32,
        /// Highest version this build understands
        supported_version: u32,
    },

    /// Color string that is neither a known name, a hex code nor "none"
    #[error("Invalid color: '{0}'")]
    InvalidColor(String),

    /// Widget toolkit error
    #[error("UI error: {0}")]
    Ui(#[from] roi_ui::UiError),
}

/// Result type alias for region selector operations.
pub type Result<T> = std::result::Result<T, Error>;
