//! NetCDF access for the concentration time series.
//!
//! This crate wraps the native `netcdf` library (libnetcdf/HDF5) and exposes a
//! single handle type, [`ConcentrationDataset`], which lists metadata and
//! extracts 2D planes of the 4D `concentration` variable.
//!
//! # Data Layout
//!
//! The variable is declared with axes `[time, z, y, x]`. A plane is the full
//! `y × x` extent at one `(time, z)` pair, read with origin `(t, z, 0, 0)` and
//! extent `(1, 1, ny, nx)`. Values are returned in the units stored in the
//! file.
//!
//! # Thread Safety
//!
//! Callers sharing one handle between threads are expected to serialize access
//! (the service keeps it behind a mutex).

pub mod dataset;
pub mod error;
pub mod native;
pub mod window;

pub use dataset::{ConcentrationDataset, DimensionInfo, VariableInfo, CONCENTRATION_VARIABLE};
pub use error::{NetCdfError, NetCdfResult};
pub use native::silence_hdf5_errors;
pub use window::{ReadWindow, EXPECTED_RANK};
