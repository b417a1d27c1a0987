//! Aeris API Service Library
//!
//! HTTP plumbing around the concentration slice pipeline: metadata listing,
//! per-slice numeric extraction, and grayscale slice images.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use handlers::build_router;
pub use state::{AppState, DatasetStatus};
