//! Tests for the concentration dataset handle against real NetCDF files.
//!
//! Files are generated by `test-utils` into temporary directories, so these
//! tests only need libnetcdf to be installed.

use netcdf_parser::{ConcentrationDataset, NetCdfError, CONCENTRATION_VARIABLE};
use test_utils::{
    expected_plane, require_test_file, write_garbage_file, write_rank3_dataset,
    ConcentrationFixture,
};

// ============================================================================
// open / close
// ============================================================================

#[test]
fn test_open_and_close() {
    let fixture = ConcentrationFixture::new().write();
    let dataset = ConcentrationDataset::open(fixture.path()).unwrap();
    assert_eq!(dataset.path(), fixture.path());
    dataset.close().unwrap();
}

#[test]
fn test_open_missing_file_is_io_error() {
    let dir = test_utils::temp_test_dir();
    let missing = dir.path().join("nope.nc");

    let err = ConcentrationDataset::open(&missing).unwrap_err();
    match err {
        NetCdfError::Io(msg) => assert!(msg.contains("nope.nc"), "message: {msg}"),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn test_open_garbage_is_decode_error() {
    let fixture = write_garbage_file();
    let err = ConcentrationDataset::open(fixture.path()).unwrap_err();
    assert!(matches!(err, NetCdfError::Decode(_)), "got {err:?}");
}

// ============================================================================
// Metadata
// ============================================================================

#[test]
fn test_dimensions_in_file_order() {
    let fixture = ConcentrationFixture::new().with_shape([3, 2, 4, 5]).write();
    let dataset = ConcentrationDataset::open(fixture.path()).unwrap();

    let dims: Vec<(String, usize)> = dataset
        .dimensions()
        .into_iter()
        .map(|d| (d.name, d.len))
        .collect();

    assert_eq!(
        dims,
        vec![
            ("time".to_string(), 3),
            ("z".to_string(), 2),
            ("y".to_string(), 4),
            ("x".to_string(), 5),
        ]
    );
}

#[test]
fn test_unlimited_time_dimension() {
    let fixture = ConcentrationFixture::new()
        .with_shape([2, 1, 2, 2])
        .with_unlimited_time()
        .write();
    let dataset = ConcentrationDataset::open(fixture.path()).unwrap();

    let time = dataset
        .dimensions()
        .into_iter()
        .find(|d| d.name == "time")
        .unwrap();
    assert!(time.unlimited);
    assert_eq!(time.len, 2);

    let plane = dataset.extract_plane(1, 0).unwrap();
    assert_eq!(plane.to_nested(), expected_plane(1, 0, 2, 2));
}

#[test]
fn test_variables_report_shape_and_units() {
    let fixture = ConcentrationFixture::new().write();
    let dataset = ConcentrationDataset::open(fixture.path()).unwrap();

    let vars = dataset.variables();
    assert_eq!(vars.len(), 1);

    let var = &vars[0];
    assert_eq!(var.name, CONCENTRATION_VARIABLE);
    assert_eq!(var.shape, vec![3, 2, 4, 5]);
    assert_eq!(var.dimensions, vec!["time", "z", "y", "x"]);
    assert_eq!(var.units.as_deref(), Some("kg m-3"));
}

#[test]
fn test_variable_without_units_attribute() {
    let fixture = ConcentrationFixture::new().with_units(None).write();
    let dataset = ConcentrationDataset::open(fixture.path()).unwrap();

    let var = dataset.variable(CONCENTRATION_VARIABLE).unwrap();
    assert_eq!(var.units, None);
    assert!(!dataset.detail_info().contains("concentration:units"));
}

#[test]
fn test_variable_lookup_missing() {
    let fixture = ConcentrationFixture::new().write();
    let dataset = ConcentrationDataset::open(fixture.path()).unwrap();
    assert!(matches!(
        dataset.variable("temperature"),
        Err(NetCdfError::NotFound(_))
    ));
}

#[test]
fn test_detail_info_is_cdl() {
    let fixture = ConcentrationFixture::new().write();
    let dataset = ConcentrationDataset::open(fixture.path()).unwrap();

    let info = dataset.detail_info();
    assert!(info.starts_with("netcdf concentration.timeseries {"), "{info}");
    assert!(info.contains("dimensions:"));
    assert!(info.contains("\ttime = 3 ;"));
    assert!(info.contains("variables:"));
    assert!(info.contains("\tdouble concentration(time, z, y, x) ;"), "{info}");
    assert!(info.contains("concentration:units = \"kg m-3\" ;"));
    assert!(info.trim_end().ends_with('}'));
}

// ============================================================================
// Plane extraction
// ============================================================================

#[test]
fn test_extract_plane_matches_declared_shape() {
    let fixture = ConcentrationFixture::new().with_shape([3, 2, 4, 5]).write();
    let dataset = ConcentrationDataset::open(fixture.path()).unwrap();

    for t in 0..3 {
        for z in 0..2 {
            let plane = dataset.extract_plane(t, z).unwrap();
            assert_eq!(plane.rows(), 4);
            assert_eq!(plane.cols(), 5);
            assert_eq!(plane.time_index(), t as usize);
            assert_eq!(plane.z_index(), z as usize);
            assert_eq!(plane.to_nested(), expected_plane(t as usize, z as usize, 4, 5));
        }
    }
}

#[test]
fn test_extract_plane_negative_time() {
    let fixture = ConcentrationFixture::new().write();
    let dataset = ConcentrationDataset::open(fixture.path()).unwrap();

    let err = dataset.extract_plane(-1, 0).unwrap_err();
    assert!(matches!(
        err,
        NetCdfError::OutOfRange {
            axis: "time",
            index: -1,
            ..
        }
    ));
}

#[test]
fn test_extract_plane_time_past_end() {
    let fixture = ConcentrationFixture::new().with_shape([3, 2, 4, 5]).write();
    let dataset = ConcentrationDataset::open(fixture.path()).unwrap();

    let err = dataset.extract_plane(3, 0).unwrap_err();
    assert!(matches!(
        err,
        NetCdfError::OutOfRange {
            axis: "time",
            index: 3,
            len: 3
        }
    ));

    // The handle stays usable after a rejected request
    assert!(dataset.extract_plane(2, 1).is_ok());
}

#[test]
fn test_extract_plane_z_past_end() {
    let fixture = ConcentrationFixture::new().with_shape([3, 2, 4, 5]).write();
    let dataset = ConcentrationDataset::open(fixture.path()).unwrap();

    let err = dataset.extract_plane(0, 2).unwrap_err();
    assert!(matches!(err, NetCdfError::OutOfRange { axis: "z", .. }));
}

#[test]
fn test_extract_missing_variable_names_it() {
    let fixture = ConcentrationFixture::new()
        .with_variable_name("pm25")
        .write();
    let dataset = ConcentrationDataset::open(fixture.path()).unwrap();

    let err = dataset.extract_plane(0, 0).unwrap_err();
    assert!(matches!(err, NetCdfError::NotFound(ref name) if name == "concentration"));
    assert!(err.to_string().contains("'concentration'"));

    // The data is still reachable under its actual name
    let plane = dataset.extract_variable_plane("pm25", 0, 0).unwrap();
    assert_eq!(plane.rows(), 4);
}

#[test]
fn test_extract_rank3_variable_is_shape_error() {
    let fixture = write_rank3_dataset();
    let dataset = ConcentrationDataset::open(fixture.path()).unwrap();

    let err = dataset.extract_plane(0, 0).unwrap_err();
    match err {
        NetCdfError::InvalidShape { name, rank, expected } => {
            assert_eq!(name, "concentration");
            assert_eq!(rank, 3);
            assert_eq!(expected, 4);
        }
        other => panic!("expected InvalidShape, got {other:?}"),
    }
}

#[test]
fn test_extract_preserves_raw_values() {
    let values = vec![1.5e-9, 2.25e-9, 3.125e-9, 4.0625e-9];
    let fixture = ConcentrationFixture::new()
        .with_shape([1, 1, 2, 2])
        .with_values(values.clone())
        .write();
    let dataset = ConcentrationDataset::open(fixture.path()).unwrap();

    let plane = dataset.extract_plane(0, 0).unwrap();
    assert_eq!(plane.values(), values.as_slice());
}

// ============================================================================
// Optional production dataset
// ============================================================================

#[test]
fn test_real_dataset_first_plane() {
    let path = require_test_file!("concentration.timeseries.nc");
    let dataset = ConcentrationDataset::open(&path).unwrap();

    let var = dataset.variable(CONCENTRATION_VARIABLE).unwrap();
    assert_eq!(var.shape.len(), 4);

    let plane = dataset.extract_plane(0, 0).unwrap();
    assert_eq!(plane.rows(), var.shape[2]);
    assert_eq!(plane.cols(), var.shape[3]);
}
