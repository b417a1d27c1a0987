//! Value range of a plane.

use serde::Serialize;

/// Minimum, maximum and range of a plane's values.
///
/// NaN cells never compare smaller or greater than the running extremes, so
/// they are ignored. A plane without any comparable value reports NaN for all
/// three fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliceStatistics {
    pub min_value: f64,
    pub max_value: f64,
    pub range: f64,
}

impl SliceStatistics {
    /// Scan every value once.
    pub fn compute(values: &[f64]) -> Self {
        let mut min_value = f64::INFINITY;
        let mut max_value = f64::NEG_INFINITY;
        let mut seen = false;

        for &v in values {
            if v.is_nan() {
                continue;
            }
            seen = true;
            if v < min_value {
                min_value = v;
            }
            if v > max_value {
                max_value = v;
            }
        }

        if !seen {
            return Self {
                min_value: f64::NAN,
                max_value: f64::NAN,
                range: f64::NAN,
            };
        }

        Self {
            min_value,
            max_value,
            range: max_value - min_value,
        }
    }

    /// True when normalization by `range` is undefined (constant plane,
    /// infinite values, or no values).
    pub fn is_degenerate(&self) -> bool {
        !(self.range.is_finite() && self.range > 0.0)
    }

    /// Position of `value` within `[min, max]`, clamped to `[0, 1]`.
    ///
    /// Returns `None` for non-finite values. Degenerate statistics map every
    /// finite value to 0.
    pub fn normalize(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        if self.is_degenerate() {
            return Some(0.0);
        }
        Some(((value - self.min_value) / self.range).clamp(0.0, 1.0))
    }
}
