//! The concentration dataset handle.
//!
//! A `ConcentrationDataset` owns one open NetCDF file. Closing consumes the
//! handle, so the file is released exactly once and cannot be read afterwards.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use aeris_common::Plane;
use tracing::{debug, info};

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::{cdl_type_name, format_attribute_value, get_string_attr, silence_hdf5_errors};
use crate::window::ReadWindow;

/// Name of the 4D `[time, z, y, x]` variable served by the dataset.
pub const CONCENTRATION_VARIABLE: &str = "concentration";

/// A declared dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionInfo {
    pub name: String,
    pub len: usize,
    pub unlimited: bool,
}

/// A declared variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableInfo {
    pub name: String,
    /// Dimension names in axis order
    pub dimensions: Vec<String>,
    /// Axis lengths in axis order
    pub shape: Vec<usize>,
    /// CDL type keyword (`double`, `float`, ...)
    pub type_name: String,
    /// Value of the `units` attribute, if any
    pub units: Option<String>,
}

/// Open handle to a NetCDF file holding the concentration time series.
pub struct ConcentrationDataset {
    path: PathBuf,
    file: netcdf::File,
}

impl std::fmt::Debug for ConcentrationDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcentrationDataset")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl ConcentrationDataset {
    /// Open the file at `path`.
    ///
    /// Missing or unreadable files are reported as [`NetCdfError::Io`];
    /// files libnetcdf cannot parse as [`NetCdfError::Decode`].
    pub fn open<P: AsRef<Path>>(path: P) -> NetCdfResult<Self> {
        let path = path.as_ref();

        // Probe with std first so a missing file is not reported as a format error
        std::fs::File::open(path)
            .map_err(|e| NetCdfError::Io(format!("cannot open {}: {}", path.display(), e)))?;

        silence_hdf5_errors();

        let file = netcdf::open(path).map_err(|e| {
            NetCdfError::Decode(format!(
                "{} is not a readable NetCDF file: {}",
                path.display(),
                e
            ))
        })?;

        info!(path = %path.display(), "Opened NetCDF dataset");

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Release the underlying file.
    pub fn close(self) -> NetCdfResult<()> {
        let path = self.path;
        self.file
            .close()
            .map_err(|e| NetCdfError::Io(format!("failed to close {}: {}", path.display(), e)))?;
        info!(path = %path.display(), "Closed NetCDF dataset");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared dimensions in file order.
    pub fn dimensions(&self) -> Vec<DimensionInfo> {
        self.file
            .dimensions()
            .map(|dim| DimensionInfo {
                name: dim.name(),
                len: dim.len(),
                unlimited: dim.is_unlimited(),
            })
            .collect()
    }

    /// Declared variables in file order.
    pub fn variables(&self) -> Vec<VariableInfo> {
        self.file.variables().map(|var| variable_info(&var)).collect()
    }

    /// Metadata of a single variable.
    pub fn variable(&self, name: &str) -> NetCdfResult<VariableInfo> {
        self.file
            .variable(name)
            .map(|var| variable_info(&var))
            .ok_or_else(|| NetCdfError::NotFound(name.to_string()))
    }

    /// CDL header of the file, in the layout of `ncdump -h`.
    pub fn detail_info(&self) -> String {
        let mut out = String::new();
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("dataset");

        let _ = writeln!(out, "netcdf {} {{", stem);

        out.push_str("dimensions:\n");
        for dim in self.dimensions() {
            if dim.unlimited {
                let _ = writeln!(
                    out,
                    "\t{} = UNLIMITED ; // ({} currently)",
                    dim.name, dim.len
                );
            } else {
                let _ = writeln!(out, "\t{} = {} ;", dim.name, dim.len);
            }
        }

        out.push_str("variables:\n");
        for var in self.file.variables() {
            let name = var.name();
            let dims = var
                .dimensions()
                .iter()
                .map(|d| d.name())
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "\t{} {}({}) ;", cdl_type_name(&var), name, dims);

            for attr in var.attributes() {
                if let Ok(value) = attr.value() {
                    let _ = writeln!(
                        out,
                        "\t\t{}:{} = {} ;",
                        name,
                        attr.name(),
                        format_attribute_value(&value)
                    );
                }
            }
        }

        let globals: Vec<_> = self.file.attributes().collect();
        if !globals.is_empty() {
            out.push_str("\n// global attributes:\n");
            for attr in globals {
                if let Ok(value) = attr.value() {
                    let _ = writeln!(
                        out,
                        "\t\t:{} = {} ;",
                        attr.name(),
                        format_attribute_value(&value)
                    );
                }
            }
        }

        out.push_str("}\n");
        out
    }

    /// Extract the y × x plane of the concentration variable.
    pub fn extract_plane(&self, time_index: i64, z_index: i64) -> NetCdfResult<Plane> {
        self.extract_variable_plane(CONCENTRATION_VARIABLE, time_index, z_index)
    }

    /// Extract the y × x plane of any rank-4 variable.
    ///
    /// Indices are validated against the declared shape before reading.
    pub fn extract_variable_plane(
        &self,
        name: &str,
        time_index: i64,
        z_index: i64,
    ) -> NetCdfResult<Plane> {
        let var = self
            .file
            .variable(name)
            .ok_or_else(|| NetCdfError::NotFound(name.to_string()))?;

        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let window = ReadWindow::for_plane(name, &shape, time_index, z_index)?;

        debug!(
            variable = name,
            time_index = window.time_index,
            z_index = window.z_index,
            rows = window.rows,
            cols = window.cols,
            "Reading plane"
        );

        let values: Vec<f64> = if window.is_empty() {
            Vec::new()
        } else {
            let [t, z, y, x] = window.origin();
            let [nt, nz, ny, nx] = window.extent();
            var.get_values::<f64, _>((
                t..t + nt,
                z..z + nz,
                y..y + ny,
                x..x + nx,
            ))
            .map_err(|e| NetCdfError::Io(format!("failed to read '{}': {}", name, e)))?
        };

        if values.len() != window.len() {
            return Err(NetCdfError::Decode(format!(
                "read {} values for '{}', expected {}",
                values.len(),
                name,
                window.len()
            )));
        }

        Ok(Plane::new(
            window.time_index,
            window.z_index,
            window.rows,
            window.cols,
            values,
        )?)
    }
}

fn variable_info(var: &netcdf::Variable) -> VariableInfo {
    VariableInfo {
        name: var.name(),
        dimensions: var.dimensions().iter().map(|d| d.name()).collect(),
        shape: var.dimensions().iter().map(|d| d.len()).collect(),
        type_name: cdl_type_name(var),
        units: get_string_attr(var, "units"),
    }
}
