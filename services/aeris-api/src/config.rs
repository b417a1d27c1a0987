//! Runtime configuration carried into the application state.

use std::path::PathBuf;

use aeris_common::UnitConversion;
use renderer::{DEFAULT_MAX_PIXELS, DEFAULT_SCALE_FACTOR};

/// Default dataset file, resolved against the working directory.
pub const DEFAULT_DATASET_PATH: &str = "concentration.timeseries.nc";

/// Values the request handlers need after startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// NetCDF file opened once at startup.
    pub dataset_path: PathBuf,

    /// Pixels per grid cell edge when `/get-image` has no `scale` parameter.
    pub image_scale: usize,

    /// Largest raster `/get-image` will render, in pixels.
    pub max_image_pixels: usize,

    /// Conversion applied to values in text tables.
    pub display_units: UnitConversion,
}

impl ServiceConfig {
    pub fn new(dataset_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            ..Self::default()
        }
    }

    pub fn with_image_scale(mut self, scale: usize) -> Self {
        self.image_scale = scale;
        self
    }

    pub fn with_max_image_pixels(mut self, max_pixels: usize) -> Self {
        self.max_image_pixels = max_pixels;
        self
    }

    pub fn with_display_units(mut self, units: UnitConversion) -> Self {
        self.display_units = units;
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            image_scale: DEFAULT_SCALE_FACTOR,
            max_image_pixels: DEFAULT_MAX_PIXELS,
            display_units: UnitConversion::default(),
        }
    }
}
