//! Thin helpers over the native netcdf library.
//!
//! Everything here talks to `netcdf::Variable`/`netcdf::Attribute` directly;
//! the dataset handle builds on these to produce owned metadata.

use std::sync::Once;

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g. probing for an optional
/// `units` attribute). This disables that output process-wide.
///
/// Call it before the first HDF5/NetCDF operation; repeated calls are no-ops.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
pub(crate) fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get a string attribute.
pub(crate) fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

/// CDL type keyword for a variable, as printed by `ncdump -h`.
pub(crate) fn cdl_type_name(var: &netcdf::Variable) -> String {
    use netcdf::types::{FloatType, IntType, NcVariableType};

    let name = match var.vartype() {
        NcVariableType::Float(FloatType::F64) => "double",
        NcVariableType::Float(FloatType::F32) => "float",
        NcVariableType::Int(IntType::I8) => "byte",
        NcVariableType::Int(IntType::U8) => "ubyte",
        NcVariableType::Int(IntType::I16) => "short",
        NcVariableType::Int(IntType::U16) => "ushort",
        NcVariableType::Int(IntType::I32) => "int",
        NcVariableType::Int(IntType::U32) => "uint",
        NcVariableType::Int(IntType::I64) => "int64",
        NcVariableType::Int(IntType::U64) => "uint64",
        other => return format!("{:?}", other).to_lowercase(),
    };
    name.to_string()
}

/// Render an attribute value in CDL syntax.
pub(crate) fn format_attribute_value(value: &netcdf::AttributeValue) -> String {
    use netcdf::AttributeValue as V;

    match value {
        V::Str(s) => format!("\"{}\"", escape_cdl(s)),
        V::Strs(items) => items
            .iter()
            .map(|s| format!("\"{}\"", escape_cdl(s)))
            .collect::<Vec<_>>()
            .join(", "),
        V::Double(v) => format_float(*v),
        V::Doubles(vs) => join(vs.iter().map(|v| format_float(*v))),
        V::Float(v) => format!("{}f", format_float(f64::from(*v))),
        V::Floats(vs) => join(vs.iter().map(|v| format!("{}f", format_float(f64::from(*v))))),
        V::Int(v) => v.to_string(),
        V::Ints(vs) => join(vs.iter().map(ToString::to_string)),
        V::Short(v) => format!("{v}s"),
        V::Shorts(vs) => join(vs.iter().map(|v| format!("{v}s"))),
        V::Longlong(v) => format!("{v}LL"),
        V::Longlongs(vs) => join(vs.iter().map(|v| format!("{v}LL"))),
        other => format!("{other:?}"),
    }
}

fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(", ")
}

fn escape_cdl(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}
