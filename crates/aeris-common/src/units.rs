//! Display-side unit conversion.
//!
//! Planes always carry the raw stored values. A `UnitConversion` is applied
//! only when formatting derived output such as text tables.

use serde::Serialize;

/// Multiplicative conversion plus the label of the target unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitConversion {
    pub factor: f64,
    pub label: String,
}

impl UnitConversion {
    pub fn new(factor: f64, label: impl Into<String>) -> Self {
        Self {
            factor,
            label: label.into(),
        }
    }

    /// No conversion; values print as stored.
    pub fn identity(label: impl Into<String>) -> Self {
        Self::new(1.0, label)
    }

    /// kg/m3 as stored in the dataset, shown as ug/m3.
    pub fn kg_to_micrograms_per_cubic_meter() -> Self {
        Self::new(1e9, "ug/m3")
    }

    pub fn apply(&self, value: f64) -> f64 {
        value * self.factor
    }
}

impl Default for UnitConversion {
    fn default() -> Self {
        Self::kg_to_micrograms_per_cubic_meter()
    }
}
