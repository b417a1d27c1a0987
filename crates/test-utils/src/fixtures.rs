//! NetCDF fixtures written to temporary directories.
//!
//! `ConcentrationFixture` builds a small but complete dataset file with the
//! same layout as the production concentration time series, so tests can
//! exercise the real libnetcdf read path.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::generators::create_concentration_cube;
use crate::paths::temp_test_dir;

/// Default `[time, z, y, x]` shape of the synthetic dataset.
pub const DEFAULT_SHAPE: [usize; 4] = [3, 2, 4, 5];

/// Axis names of the concentration variable.
pub const AXIS_NAMES: [&str; 4] = ["time", "z", "y", "x"];

/// Builder for a synthetic concentration NetCDF file.
#[derive(Debug, Clone)]
pub struct ConcentrationFixture {
    shape: [usize; 4],
    variable: String,
    units: Option<String>,
    unlimited_time: bool,
    values: Option<Vec<f64>>,
}

impl Default for ConcentrationFixture {
    fn default() -> Self {
        Self {
            shape: DEFAULT_SHAPE,
            variable: "concentration".to_string(),
            units: Some("kg m-3".to_string()),
            unlimited_time: false,
            values: None,
        }
    }
}

impl ConcentrationFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shape(mut self, shape: [usize; 4]) -> Self {
        self.shape = shape;
        self
    }

    /// Store the 4D data under a different variable name.
    pub fn with_variable_name(mut self, name: &str) -> Self {
        self.variable = name.to_string();
        self
    }

    pub fn with_units(mut self, units: Option<&str>) -> Self {
        self.units = units.map(str::to_string);
        self
    }

    /// Declare `time` as the record (unlimited) dimension.
    pub fn with_unlimited_time(mut self) -> Self {
        self.unlimited_time = true;
        self
    }

    /// Replace the generated cube with explicit row-major values.
    pub fn with_values(mut self, values: Vec<f64>) -> Self {
        self.values = Some(values);
        self
    }

    /// Write the file into a fresh temporary directory.
    ///
    /// Keep the returned [`WrittenFixture`] alive while the file is in use.
    pub fn write(self) -> WrittenFixture {
        let dir = temp_test_dir();
        let path = dir.path().join("concentration.timeseries.nc");
        self.write_to(&path);
        WrittenFixture { dir, path }
    }

    /// Write the file at `path`, overwriting anything already there.
    pub fn write_to(&self, path: &Path) {
        let [nt, nz, ny, nx] = self.shape;
        let values = self
            .values
            .clone()
            .unwrap_or_else(|| create_concentration_cube(self.shape));
        assert_eq!(
            values.len(),
            nt * nz * ny * nx,
            "fixture values do not match shape {:?}",
            self.shape
        );

        let mut file = netcdf::create(path).expect("Failed to create NetCDF fixture");

        if self.unlimited_time {
            file.add_unlimited_dimension("time")
                .expect("Failed to add time dimension");
        } else {
            file.add_dimension("time", nt)
                .expect("Failed to add time dimension");
        }
        file.add_dimension("z", nz).expect("Failed to add z dimension");
        file.add_dimension("y", ny).expect("Failed to add y dimension");
        file.add_dimension("x", nx).expect("Failed to add x dimension");

        let mut var = file
            .add_variable::<f64>(&self.variable, &AXIS_NAMES)
            .expect("Failed to add variable");
        if let Some(units) = &self.units {
            var.put_attribute("units", units.as_str())
                .expect("Failed to add units attribute");
        }
        var.put_attribute("long_name", "mass concentration")
            .expect("Failed to add long_name attribute");

        if !values.is_empty() {
            var.put_values(&values, (0..nt, 0..nz, 0..ny, 0..nx))
                .expect("Failed to write fixture values");
        }
    }
}

/// A fixture file on disk; the directory is removed on drop.
#[derive(Debug)]
pub struct WrittenFixture {
    dir: TempDir,
    path: PathBuf,
}

impl WrittenFixture {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Writes a NetCDF file whose `concentration` variable has rank 3 (`[time, y, x]`).
pub fn write_rank3_dataset() -> WrittenFixture {
    let dir = temp_test_dir();
    let path = dir.path().join("rank3.nc");

    let mut file = netcdf::create(&path).expect("Failed to create NetCDF fixture");
    file.add_dimension("time", 2).expect("Failed to add time dimension");
    file.add_dimension("y", 3).expect("Failed to add y dimension");
    file.add_dimension("x", 3).expect("Failed to add x dimension");

    let mut var = file
        .add_variable::<f64>("concentration", &["time", "y", "x"])
        .expect("Failed to add variable");
    let values: Vec<f64> = (0..18).map(f64::from).collect();
    var.put_values(&values, (0..2, 0..3, 0..3))
        .expect("Failed to write fixture values");

    WrittenFixture { dir, path }
}

/// Writes a file that is not a NetCDF container.
pub fn write_garbage_file() -> WrittenFixture {
    let dir = temp_test_dir();
    let path = dir.path().join("not_netcdf.nc");
    std::fs::write(&path, b"this is definitely not HDF5 or classic NetCDF\n")
        .expect("Failed to write garbage file");
    WrittenFixture { dir, path }
}
