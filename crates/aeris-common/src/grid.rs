//! Extracted 2D planes of a 4D `[time, z, y, x]` variable.

use serde::Serialize;
use thiserror::Error;

/// Result type for plane construction.
pub type GridResult<T> = Result<T, GridError>;

/// Errors raised when a value buffer does not describe a rectangular grid.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    /// Flat buffer length disagrees with the declared dimensions.
    #[error("buffer holds {actual} values but a {rows}x{cols} grid needs {expected}")]
    LengthMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },

    /// A row in a nested grid has a different length than the first row.
    #[error("row {row} has {actual} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// `rows * cols` does not fit in memory addressing.
    #[error("grid dimensions {rows}x{cols} overflow")]
    Overflow { rows: usize, cols: usize },
}

/// A single y × x slice at fixed time and z indices.
///
/// Values are stored row-major (y outer, x inner) in the units found in the
/// file. The dimensions are fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plane {
    time_index: usize,
    z_index: usize,
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Plane {
    /// Build a plane from a flat row-major buffer.
    pub fn new(
        time_index: usize,
        z_index: usize,
        rows: usize,
        cols: usize,
        values: Vec<f64>,
    ) -> GridResult<Self> {
        let expected = rows
            .checked_mul(cols)
            .ok_or(GridError::Overflow { rows, cols })?;

        if values.len() != expected {
            return Err(GridError::LengthMismatch {
                rows,
                cols,
                expected,
                actual: values.len(),
            });
        }

        Ok(Self {
            time_index,
            z_index,
            rows,
            cols,
            values,
        })
    }

    /// Build a plane from nested rows, rejecting ragged input.
    ///
    /// An empty outer vector yields a 0×0 plane.
    pub fn from_rows(time_index: usize, z_index: usize, grid: Vec<Vec<f64>>) -> GridResult<Self> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);

        let mut values = Vec::with_capacity(rows * cols);
        for (row, line) in grid.into_iter().enumerate() {
            if line.len() != cols {
                return Err(GridError::RaggedRow {
                    row,
                    expected: cols,
                    actual: line.len(),
                });
            }
            values.extend(line);
        }

        Self::new(time_index, z_index, rows, cols, values)
    }

    pub fn time_index(&self) -> usize {
        self.time_index
    }

    pub fn z_index(&self) -> usize {
        self.z_index
    }

    /// Number of rows (the y dimension).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (the x dimension).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the plane has no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Flat row-major values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at row `y`, column `x`.
    pub fn get(&self, y: usize, x: usize) -> Option<f64> {
        if y >= self.rows || x >= self.cols {
            return None;
        }
        self.values.get(y * self.cols + x).copied()
    }

    /// Iterate over rows as slices.
    ///
    /// Yields nothing for a plane with zero columns.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on a zero chunk size
        self.values.chunks_exact(self.cols.max(1)).take(self.rows)
    }

    /// Copy the values out as nested rows.
    pub fn to_nested(&self) -> Vec<Vec<f64>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }
}
