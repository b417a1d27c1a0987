//! Error types for NetCDF dataset operations.

use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF dataset access.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error (missing file, unreadable file, failed read)
    #[error("I/O error: {0}")]
    Io(String),

    /// The file is not a valid NetCDF container or holds malformed data
    #[error("Invalid data format: {0}")]
    Decode(String),

    /// Named variable is absent from the file
    #[error("Variable '{0}' not found in NetCDF file")]
    NotFound(String),

    /// Requested index lies outside the declared axis length
    #[error("{axis} index {index} is out of range (dimension length {len})")]
    OutOfRange {
        axis: &'static str,
        index: i64,
        len: usize,
    },

    /// Variable rank differs from the expected `[time, z, y, x]` layout
    #[error("Variable '{name}' has rank {rank}, expected {expected}")]
    InvalidShape {
        name: String,
        rank: usize,
        expected: usize,
    },
}

impl NetCdfError {
    /// True for failures caused by the request rather than the file.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}

impl From<std::io::Error> for NetCdfError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<aeris_common::GridError> for NetCdfError {
    fn from(err: aeris_common::GridError) -> Self {
        Self::Decode(err.to_string())
    }
}
