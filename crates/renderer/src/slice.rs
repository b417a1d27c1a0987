//! One extracted plane and everything derived from it.

use std::fmt::Write;

use aeris_common::{Plane, UnitConversion};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RenderResult;
use crate::grayscale::{render_plane, GrayRaster, DEFAULT_MAX_PIXELS};
use crate::stats::SliceStatistics;

/// Serializable form of a slice.
///
/// `grid` keeps the stored values at full `f64` precision. Statistics fields
/// are `None` when the plane has no comparable value (JSON has no NaN).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceRecord {
    pub time_index: usize,
    pub z_index: usize,
    pub grid: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<StatisticsRecord>,
}

/// Value range of a slice; `None` where the range is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRecord {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub range: Option<f64>,
}

impl From<&SliceStatistics> for StatisticsRecord {
    fn from(stats: &SliceStatistics) -> Self {
        let finite = |v: f64| v.is_finite().then_some(v);
        Self {
            min: finite(stats.min_value),
            max: finite(stats.max_value),
            range: finite(stats.range),
        }
    }
}

/// A plane plus its value range, computed once on construction.
#[derive(Debug, Clone)]
pub struct SliceTransform {
    plane: Plane,
    statistics: SliceStatistics,
}

impl SliceTransform {
    pub fn new(plane: Plane) -> Self {
        let statistics = SliceStatistics::compute(plane.values());
        Self { plane, statistics }
    }

    /// Build from nested rows. Ragged input is rejected.
    pub fn from_grid(time_index: usize, z_index: usize, grid: Vec<Vec<f64>>) -> RenderResult<Self> {
        let plane = Plane::from_rows(time_index, z_index, grid)?;
        Ok(Self::new(plane))
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    pub fn statistics(&self) -> &SliceStatistics {
        &self.statistics
    }

    pub fn to_record(&self) -> SliceRecord {
        SliceRecord {
            time_index: self.plane.time_index(),
            z_index: self.plane.z_index(),
            grid: self.plane.to_nested(),
            statistics: Some(StatisticsRecord::from(&self.statistics)),
        }
    }

    pub fn to_json(&self) -> RenderResult<String> {
        Ok(serde_json::to_string(&self.to_record())?)
    }

    /// One line per cell, values converted for display.
    pub fn to_table(&self, units: &UnitConversion) -> String {
        let t = self.plane.time_index();
        let z = self.plane.z_index();
        let mut out = String::with_capacity(self.plane.len() * 64);

        for (y, row) in self.plane.iter_rows().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                // Writing into a String cannot fail
                let _ = writeln!(
                    out,
                    "Concentration at time={}, z={}, y={}, x={}: {:.6} {}",
                    t,
                    z,
                    y,
                    x,
                    units.apply(value),
                    units.label
                );
            }
        }
        out
    }

    /// Render with the default size cap of [`DEFAULT_MAX_PIXELS`].
    pub fn render_raster(&self, scale_factor: usize) -> RenderResult<GrayRaster> {
        self.render_raster_within(scale_factor, DEFAULT_MAX_PIXELS)
    }

    pub fn render_raster_within(
        &self,
        scale_factor: usize,
        max_pixels: usize,
    ) -> RenderResult<GrayRaster> {
        render_plane(&self.plane, &self.statistics, scale_factor, max_pixels)
    }

    pub fn to_png(&self, scale_factor: usize) -> RenderResult<Vec<u8>> {
        self.to_png_within(scale_factor, DEFAULT_MAX_PIXELS)
    }

    /// Render and encode, rejecting rasters above `max_pixels`.
    pub fn to_png_within(&self, scale_factor: usize, max_pixels: usize) -> RenderResult<Vec<u8>> {
        let raster = self.render_raster_within(scale_factor, max_pixels)?;
        let png = raster.encode_png()?;
        debug!(
            time_index = self.plane.time_index(),
            z_index = self.plane.z_index(),
            width = raster.width(),
            height = raster.height(),
            bytes = png.len(),
            "Rendered slice PNG"
        );
        Ok(png)
    }
}
