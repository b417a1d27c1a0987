//! Slice statistics and rendering for concentration planes.
//!
//! A [`SliceTransform`] wraps one extracted [`Plane`](aeris_common::Plane),
//! computes its value range once, and produces:
//! - a serializable record (JSON with full `f64` precision)
//! - a text table with display-unit conversion
//! - a grayscale raster encoded as PNG

pub mod error;
pub mod grayscale;
pub mod png;
pub mod slice;
pub mod stats;

pub use error::{RenderError, RenderResult};
pub use grayscale::{GrayRaster, DEFAULT_MAX_PIXELS, DEFAULT_SCALE_FACTOR};
pub use slice::{SliceRecord, SliceTransform, StatisticsRecord};
pub use stats::SliceStatistics;
