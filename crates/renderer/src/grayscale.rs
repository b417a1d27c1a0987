//! Linear grayscale rendering of a plane.
//!
//! Each grid cell becomes a `scale × scale` block of pixels. Cell `(i, j)`
//! (row, column) is painted at pixel origin `(j * scale, i * scale)` with
//! intensity `round(255 * normalized)`.

use aeris_common::Plane;
use rayon::prelude::*;

use crate::error::{RenderError, RenderResult};
use crate::png::create_png_rgb;
use crate::stats::SliceStatistics;

/// Default edge length, in pixels, of the block painted for one cell.
pub const DEFAULT_SCALE_FACTOR: usize = 20;

/// Default cap on raster size (4096 × 4096).
pub const DEFAULT_MAX_PIXELS: usize = 4096 * 4096;

/// Rasters below this many pixels are painted on the calling thread.
const PARALLEL_THRESHOLD: usize = 64 * 64;

/// A single-channel 8-bit raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayRaster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl GrayRaster {
    /// Solid black raster.
    fn black(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Intensity at pixel `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Expand to RGB with the intensity copied into all three channels.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&v| [v, v, v]).collect()
    }

    /// Encode as an RGB PNG.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        create_png_rgb(&self.to_rgb(), self.width, self.height)
    }
}

/// 8-bit intensity for one value. Non-finite values yield `None`.
pub fn intensity(value: f64, stats: &SliceStatistics) -> Option<u8> {
    stats
        .normalize(value)
        .map(|normalized| (255.0 * normalized).round() as u8)
}

/// Paint `plane` into a new raster, `scale` pixels per cell edge.
///
/// Rasters with more than `max_pixels` pixels are rejected before any
/// pixel buffer is allocated.
pub fn render_plane(
    plane: &Plane,
    stats: &SliceStatistics,
    scale: usize,
    max_pixels: usize,
) -> RenderResult<GrayRaster> {
    if scale == 0 {
        return Err(RenderError::InvalidDimensions(
            "scale factor must be at least 1".to_string(),
        ));
    }
    if plane.is_empty() {
        return Err(RenderError::InvalidDimensions(format!(
            "cannot render an empty {}x{} plane",
            plane.rows(),
            plane.cols()
        )));
    }

    let width = checked_edge(plane.cols(), scale, "width")?;
    let height = checked_edge(plane.rows(), scale, "height")?;
    let pixels = width
        .checked_mul(height)
        .filter(|n| n.checked_mul(3).is_some())
        .ok_or_else(|| {
            RenderError::InvalidDimensions(format!("{}x{} raster overflows", width, height))
        })?;
    if pixels > max_pixels {
        return Err(RenderError::InvalidDimensions(format!(
            "{}x{} raster exceeds the limit of {} pixels",
            width, height, max_pixels
        )));
    }

    // Background stays black for cells without a finite value
    let cells: Vec<u8> = plane
        .values()
        .iter()
        .map(|&v| intensity(v, stats).unwrap_or(0))
        .collect();

    let mut raster = GrayRaster::black(width, height);
    let cols = plane.cols();

    let paint_row = |(py, row): (usize, &mut [u8])| {
        let i = py / scale;
        let cell_row = &cells[i * cols..(i + 1) * cols];
        for (j, &value) in cell_row.iter().enumerate() {
            row[j * scale..(j + 1) * scale].fill(value);
        }
    };

    if pixels >= PARALLEL_THRESHOLD {
        raster
            .pixels
            .par_chunks_mut(width)
            .enumerate()
            .for_each(paint_row);
    } else {
        raster
            .pixels
            .chunks_mut(width)
            .enumerate()
            .for_each(paint_row);
    }

    Ok(raster)
}

fn checked_edge(cells: usize, scale: usize, what: &str) -> RenderResult<usize> {
    cells
        .checked_mul(scale)
        .filter(|&px| u32::try_from(px).is_ok())
        .ok_or_else(|| {
            RenderError::InvalidDimensions(format!(
                "raster {} of {} cells at scale {} exceeds PNG limits",
                what, cells, scale
            ))
        })
}
