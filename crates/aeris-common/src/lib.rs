//! Common types shared across the aeris crates and services.

pub mod grid;
pub mod units;

pub use grid::{GridError, GridResult, Plane};
pub use units::UnitConversion;
