//! Read window derivation for `[time, z, y, x]` variables.
//!
//! The window is validated against the declared shape before any I/O so that
//! out-of-range requests never trigger a partial read.

use crate::error::{NetCdfError, NetCdfResult};

/// Rank of the concentration variable.
pub const EXPECTED_RANK: usize = 4;

/// Origin and extent of a single (time, z) plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadWindow {
    pub time_index: usize,
    pub z_index: usize,
    pub rows: usize,
    pub cols: usize,
}

impl ReadWindow {
    /// Validate the requested indices against `shape` and build the window.
    ///
    /// `name` is only used for error messages.
    pub fn for_plane(
        name: &str,
        shape: &[usize],
        time_index: i64,
        z_index: i64,
    ) -> NetCdfResult<Self> {
        if shape.len() != EXPECTED_RANK {
            return Err(NetCdfError::InvalidShape {
                name: name.to_string(),
                rank: shape.len(),
                expected: EXPECTED_RANK,
            });
        }

        let time_index = check_index("time", time_index, shape[0])?;
        let z_index = check_index("z", z_index, shape[1])?;

        Ok(Self {
            time_index,
            z_index,
            rows: shape[2],
            cols: shape[3],
        })
    }

    /// Start indices of the hyperslab.
    pub fn origin(&self) -> [usize; EXPECTED_RANK] {
        [self.time_index, self.z_index, 0, 0]
    }

    /// Counts along each axis.
    pub fn extent(&self) -> [usize; EXPECTED_RANK] {
        [1, 1, self.rows, self.cols]
    }

    /// Number of values the window materializes.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_index(axis: &'static str, index: i64, len: usize) -> NetCdfResult<usize> {
    match usize::try_from(index) {
        Ok(i) if i < len => Ok(i),
        _ => Err(NetCdfError::OutOfRange { axis, index, len }),
    }
}
