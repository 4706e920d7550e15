//! On-disk HDF5 fixtures shared by the store tests.
use hdf5::{Group, types::VarLenUnicode};
use ndarray::Array2;
use soft_sensing_common::Real;
use std::{path::PathBuf, str::FromStr};
use tempfile::TempDir;

pub(crate) const NUMERICAL_COLUMNS: [&str; 11] = [
    "rpm", "t_evap_ref", "t_cond_ref", "t_evap", "t_cond", "t_suc", "t_comp", "t_dis", "p_suc",
    "p_int", "p_dis",
];

fn unicode(value: &str) -> VarLenUnicode {
    VarLenUnicode::from_str(value).expect("valid unicode")
}

fn write_string_attr(group: &Group, name: &str, value: &str) {
    group
        .new_attr::<VarLenUnicode>()
        .create(name)
        .expect("create attr")
        .write_scalar(&unicode(value))
        .expect("write attr");
}

fn write_dataset(group: &Group, name: &str, data: &Array2<Real>, column_names: &[&str]) {
    let dataset = group
        .new_dataset_builder()
        .with_data(data)
        .create(name)
        .expect("create dataset");
    let names: Vec<VarLenUnicode> = column_names.iter().map(|name| unicode(name)).collect();
    dataset
        .new_attr_builder()
        .with_data(names.as_slice())
        .create("columnNames")
        .expect("create columnNames");
}

/// Deterministic vibration samples: a ramp per axis, distinct across axes.
pub(crate) fn vibration_data(rows: usize) -> Array2<Real> {
    Array2::from_shape_fn((rows, 3), |(row, axis)| {
        (row as Real) * 0.01 + axis as Real
    })
}

/// Numerical samples with fixed per-column constants so column means are
/// trivially predictable (`t_evap` = 5, `t_cond` = 45, `p_suc` = 1.2,
/// `p_dis` = 8.4, everything else = column index).
pub(crate) fn numerical_data(rows: usize) -> Array2<Real> {
    Array2::from_shape_fn((rows, 11), |(_, column)| match NUMERICAL_COLUMNS[column] {
        "t_evap" => 5.0,
        "t_cond" => 45.0,
        "p_suc" => 1.2,
        "p_dis" => 8.4,
        _ => column as Real,
    })
}

pub(crate) fn write_test_group(
    unit: &Group,
    name: &str,
    test_type: &str,
    speed: &str,
    repetition: &str,
    evap: &str,
    cond: &str,
    rows: usize,
) {
    let test = unit.create_group(name).expect("create test group");
    write_string_attr(&test, "type", test_type);
    write_string_attr(&test, "angularSpeed", speed);
    write_string_attr(&test, "repetition", repetition);
    write_string_attr(&test, "evaporatingTemperature", evap);
    write_string_attr(&test, "condensingTemperature", cond);
    write_dataset(&test, "vibrationMeasurements", &vibration_data(rows), &["x", "y", "z"]);
    write_dataset(
        &test,
        "numericalMeasurements",
        &numerical_data(rows),
        &NUMERICAL_COLUMNS,
    );
}

fn new_container() -> (TempDir, PathBuf, hdf5::File) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dataset.hdf5");
    let file = hdf5::File::create(&path).expect("create container");
    (dir, path, file)
}

/// Two units, three tests, covering both maps and a speed/temperature spread.
pub(crate) fn small_container() -> (TempDir, PathBuf) {
    let (dir, path, file) = new_container();

    let unit2 = file.create_group("2").expect("create unit");
    write_test_group(&unit2, "A2100-1-x-10,0-34,0", "A", "2100", "1", "10,0", "34,0", 20);
    write_test_group(&unit2, "A3600-1-x-15,0-40,0", "A", "3600", "1", "15,0", "40,0", 20);

    let unit3 = file.create_group("3").expect("create unit");
    write_test_group(&unit3, "B3600-2-x-30,0-54,0", "B", "3600", "2", "30,0", "54,0", 20);

    (dir, path)
}

/// One test whose `angularSpeed` attribute is not an integer.
pub(crate) fn container_with_bad_speed() -> (TempDir, PathBuf) {
    let (dir, path, file) = new_container();
    let unit = file.create_group("2").expect("create unit");
    write_test_group(&unit, "Abad-1-x-15,0-40,0", "A", "bad", "1", "15,0", "40,0", 8);
    (dir, path)
}

/// One test lacking the `condensingTemperature` attribute.
pub(crate) fn container_missing_attribute() -> (TempDir, PathBuf) {
    let (dir, path, file) = new_container();
    let unit = file.create_group("2").expect("create unit");
    let test = unit.create_group("A3600-1-x-15,0-40,0").expect("create test group");
    write_string_attr(&test, "type", "A");
    write_string_attr(&test, "angularSpeed", "3600");
    write_string_attr(&test, "repetition", "1");
    write_string_attr(&test, "evaporatingTemperature", "15,0");
    write_dataset(&test, "vibrationMeasurements", &vibration_data(8), &["x", "y", "z"]);
    write_dataset(
        &test,
        "numericalMeasurements",
        &numerical_data(8),
        &NUMERICAL_COLUMNS,
    );
    (dir, path)
}

/// One test with attributes but no vibration dataset.
pub(crate) fn container_missing_dataset() -> (TempDir, PathBuf) {
    let (dir, path, file) = new_container();
    let unit = file.create_group("2").expect("create unit");
    let test = unit.create_group("A3600-1-x-15,0-40,0").expect("create test group");
    write_string_attr(&test, "type", "A");
    write_string_attr(&test, "angularSpeed", "3600");
    write_string_attr(&test, "repetition", "1");
    write_string_attr(&test, "evaporatingTemperature", "15,0");
    write_string_attr(&test, "condensingTemperature", "40,0");
    write_dataset(
        &test,
        "numericalMeasurements",
        &numerical_data(8),
        &NUMERICAL_COLUMNS,
    );
    (dir, path)
}
