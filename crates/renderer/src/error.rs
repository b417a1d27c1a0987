//! Error types for slice rendering.

use thiserror::Error;

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while turning a plane into an output format.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Input grid is not rectangular.
    #[error("invalid grid: {0}")]
    InvalidGrid(#[from] aeris_common::GridError),

    /// Raster would be empty or too large to address.
    #[error("invalid raster dimensions: {0}")]
    InvalidDimensions(String),

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        Self::Encode(err.to_string())
    }
}
