//! The hierarchical container snapshot: units, tests, and measurement tables.
use crate::error::StoreError;
use hdf5::{Group, types::VarLenUnicode};
use ndarray::Array2;
use soft_sensing_common::Real;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the per-test three-axis vibration dataset.
pub const VIBRATION_DATASET: &str = "vibrationMeasurements";
/// Name of the per-test numerical (temperature/pressure) dataset.
pub const NUMERICAL_DATASET: &str = "numericalMeasurements";

/// Column names of the measurement datasets, as written by the converter.
pub mod columns {
    pub const X: &str = "x";
    pub const Y: &str = "y";
    pub const Z: &str = "z";

    pub const RPM: &str = "rpm";
    pub const T_EVAP_REF: &str = "t_evap_ref";
    pub const T_COND_REF: &str = "t_cond_ref";
    pub const T_EVAP: &str = "t_evap";
    pub const T_COND: &str = "t_cond";
    pub const T_SUC: &str = "t_suc";
    pub const T_COMP: &str = "t_comp";
    pub const T_DIS: &str = "t_dis";
    pub const P_SUC: &str = "p_suc";
    pub const P_INT: &str = "p_int";
    pub const P_DIS: &str = "p_dis";
}

/// Immutable snapshot of a qualification container.
///
/// Units and tests are collected once at open time, in the order the file
/// yields them. Dataset payloads are read on demand through each test's
/// group handle.
#[derive(Debug)]
pub struct DatasetStore {
    path: PathBuf,
    units: Vec<Unit>,
}

impl DatasetStore {
    /// Opens the container at the given path and snapshots its hierarchy.
    ///
    /// Fails with [`StoreError::NotFound`] when the path does not resolve to
    /// a readable file, and [`StoreError::Format`] when the top-level
    /// structure cannot be decoded into units and tests, or a test is
    /// missing a required attribute or dataset.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StoreError::NotFound {
                path: path.to_owned(),
            });
        }
        let file = hdf5::File::open(path).map_err(|source| StoreError::Format {
            reason: format!("cannot open \"{}\": {source}", path.display()),
        })?;

        let mut units = Vec::new();
        for unit_name in member_names(&file, "container root")? {
            let unit_group = file.group(&unit_name).map_err(|_| StoreError::Format {
                reason: format!("top-level member \"{unit_name}\" is not a unit group"),
            })?;

            let mut tests = Vec::new();
            for test_name in member_names(&unit_group, &format!("unit \"{unit_name}\""))? {
                let test_group =
                    unit_group.group(&test_name).map_err(|_| StoreError::Format {
                        reason: format!(
                            "unit \"{unit_name}\": member \"{test_name}\" is not a test group"
                        ),
                    })?;
                tests.push(Test::read(&unit_name, test_name, test_group)?);
            }
            debug!(unit = %unit_name, tests = tests.len(), "loaded unit");
            units.push(Unit {
                id: unit_name,
                tests,
            });
        }

        Ok(Self {
            path: path.to_owned(),
            units,
        })
    }

    /// Path the container was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Iterates over units in container order.
    ///
    /// Every call returns a fresh, independent iterator over the snapshot;
    /// exhausting one has no effect on the next.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    /// Looks a unit up by its identifier.
    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id == id)
    }

    /// Number of units in the container.
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}

/// Parses the compressor index from a unit identifier: its leading digit.
pub fn compressor_index(unit_id: &str) -> Option<u32> {
    unit_id.chars().next().and_then(|c| c.to_digit(10))
}

fn member_names(group: &Group, what: &str) -> Result<Vec<String>, StoreError> {
    group.member_names().map_err(|source| StoreError::Format {
        reason: format!("cannot list members of {what}: {source}"),
    })
}

/// One physical compressor unit under test.
#[derive(Debug)]
pub struct Unit {
    id: String,
    tests: Vec<Test>,
}

impl Unit {
    /// The unit's group identifier, e.g. `"2"`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The compressor index encoded as the leading digit of the unit id.
    pub fn compressor_index(&self) -> Result<u32, StoreError> {
        compressor_index(&self.id).ok_or_else(|| StoreError::Format {
            reason: format!("unit \"{}\" does not start with a compressor digit", self.id),
        })
    }

    /// Iterates over the unit's tests in container order.
    ///
    /// As with [`DatasetStore::units`], each call yields an independent
    /// iterator.
    pub fn tests(&self) -> impl Iterator<Item = &Test> {
        self.tests.iter()
    }

    /// Number of tests recorded for this unit.
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }
}

/// One qualification run under a fixed operating profile.
#[derive(Debug)]
pub struct Test {
    name: String,
    unit_id: String,
    attributes: TestAttributes,
    group: Group,
}

impl Test {
    fn read(unit_id: &str, name: String, group: Group) -> Result<Self, StoreError> {
        let attributes = TestAttributes::read(&group, &name)?;
        for dataset in [VIBRATION_DATASET, NUMERICAL_DATASET] {
            if !group.link_exists(dataset) {
                return Err(StoreError::Format {
                    reason: format!("test \"{name}\": missing dataset \"{dataset}\""),
                });
            }
        }
        Ok(Self {
            name,
            unit_id: unit_id.to_owned(),
            attributes,
            group,
        })
    }

    /// The test's group name, e.g. `"A3600-1-x-15,0-40,0"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier of the unit this test belongs to.
    pub fn unit_id(&self) -> &str {
        &self.unit_id
    }

    /// The operating-condition attributes recorded for this test.
    pub fn attributes(&self) -> &TestAttributes {
        &self.attributes
    }

    /// Reads the N×3 vibration dataset (columns `x,y,z`).
    pub fn vibration_measurements(&self) -> Result<MeasurementTable, StoreError> {
        self.read_table(VIBRATION_DATASET)
    }

    /// Reads the N×11 numerical dataset (temperatures and pressures).
    pub fn numerical_measurements(&self) -> Result<MeasurementTable, StoreError> {
        self.read_table(NUMERICAL_DATASET)
    }

    fn read_table(&self, dataset_name: &str) -> Result<MeasurementTable, StoreError> {
        let dataset = self
            .group
            .dataset(dataset_name)
            .map_err(|_| StoreError::Format {
                reason: format!("test \"{}\": missing dataset \"{dataset_name}\"", self.name),
            })?;
        let data = dataset.read_2d::<Real>().map_err(|source| StoreError::Format {
            reason: format!(
                "test \"{}\": dataset \"{dataset_name}\" is not a 2-d float array: {source}",
                self.name
            ),
        })?;
        if data.nrows() == 0 {
            return Err(StoreError::Format {
                reason: format!("test \"{}\": dataset \"{dataset_name}\" is empty", self.name),
            });
        }

        let names = dataset
            .attr("columnNames")
            .and_then(|attr| attr.read_1d::<VarLenUnicode>())
            .map_err(|_| StoreError::Format {
                reason: format!(
                    "test \"{}\": dataset \"{dataset_name}\" lacks a columnNames attribute",
                    self.name
                ),
            })?;
        let column_names: Vec<String> = names.iter().map(|name| name.as_str().to_owned()).collect();
        if column_names.len() != data.ncols() {
            return Err(StoreError::Format {
                reason: format!(
                    "test \"{}\": dataset \"{dataset_name}\" has {} columns but {} column names",
                    self.name,
                    data.ncols(),
                    column_names.len()
                ),
            });
        }

        Ok(MeasurementTable {
            columns: column_names,
            data,
        })
    }
}

/// Operating-condition attributes of a test, kept as the raw recorded
/// strings. Typed accessors parse on demand so an unparsable value surfaces
/// as [`StoreError::Validation`] naming the test and attribute.
#[derive(Debug, Clone)]
pub struct TestAttributes {
    test: String,
    test_type: char,
    angular_speed: String,
    repetition: String,
    evaporating_temperature: String,
    condensing_temperature: String,
}

impl TestAttributes {
    const TYPE: &'static str = "type";
    const ANGULAR_SPEED: &'static str = "angularSpeed";
    const REPETITION: &'static str = "repetition";
    const EVAPORATING_TEMPERATURE: &'static str = "evaporatingTemperature";
    const CONDENSING_TEMPERATURE: &'static str = "condensingTemperature";

    fn read(group: &Group, test: &str) -> Result<Self, StoreError> {
        let type_value = read_string_attr(group, test, Self::TYPE)?;
        let test_type = type_value.chars().next().ok_or_else(|| StoreError::Format {
            reason: format!("test \"{test}\": attribute \"type\" is empty"),
        })?;
        Ok(Self {
            test: test.to_owned(),
            test_type,
            angular_speed: read_string_attr(group, test, Self::ANGULAR_SPEED)?,
            repetition: read_string_attr(group, test, Self::REPETITION)?,
            evaporating_temperature: read_string_attr(group, test, Self::EVAPORATING_TEMPERATURE)?,
            condensing_temperature: read_string_attr(group, test, Self::CONDENSING_TEMPERATURE)?,
        })
    }

    /// Test map: `A` = primary map, `B` = secondary map.
    pub fn test_type(&self) -> char {
        self.test_type
    }

    /// Target rotational speed in RPM.
    pub fn angular_speed(&self) -> Result<i64, StoreError> {
        self.angular_speed
            .trim()
            .parse()
            .map_err(|_| self.validation(Self::ANGULAR_SPEED, &self.angular_speed))
    }

    /// Repetition index of the run.
    pub fn repetition(&self) -> Result<i64, StoreError> {
        self.repetition
            .trim()
            .parse()
            .map_err(|_| self.validation(Self::REPETITION, &self.repetition))
    }

    /// Evaporating-temperature set-point magnitude in °C.
    ///
    /// The recorded value is magnitude only; by the rig's sign convention
    /// the physical set point is the negative of this value.
    pub fn evaporating_temperature(&self) -> Result<Real, StoreError> {
        soft_sensing_common::parse_decimal(&self.evaporating_temperature)
            .map_err(|_| self.validation(Self::EVAPORATING_TEMPERATURE, &self.evaporating_temperature))
    }

    /// Condensing-temperature set point in °C.
    pub fn condensing_temperature(&self) -> Result<Real, StoreError> {
        soft_sensing_common::parse_decimal(&self.condensing_temperature)
            .map_err(|_| self.validation(Self::CONDENSING_TEMPERATURE, &self.condensing_temperature))
    }

    fn validation(&self, attribute: &str, value: &str) -> StoreError {
        StoreError::Validation {
            test: self.test.clone(),
            attribute: attribute.to_owned(),
            value: value.to_owned(),
        }
    }
}

fn read_string_attr(group: &Group, test: &str, name: &str) -> Result<String, StoreError> {
    let attr = group.attr(name).map_err(|_| StoreError::Format {
        reason: format!("test \"{test}\": missing attribute \"{name}\""),
    })?;
    let value: VarLenUnicode = attr.read_scalar().map_err(|source| StoreError::Format {
        reason: format!("test \"{test}\": attribute \"{name}\" is not a string: {source}"),
    })?;
    Ok(value.as_str().to_owned())
}

/// A named-column 2-d measurement array read from a test.
#[derive(Debug, Clone)]
pub struct MeasurementTable {
    columns: Vec<String>,
    data: Array2<Real>,
}

impl MeasurementTable {
    /// Ordered column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The full measurement array, rows = samples.
    pub fn data(&self) -> &Array2<Real> {
        &self.data
    }

    /// Number of samples (rows).
    pub fn sample_count(&self) -> usize {
        self.data.nrows()
    }

    fn column_index(&self, name: &str) -> Result<usize, StoreError> {
        self.columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| StoreError::Format {
                reason: format!("unknown measurement column \"{name}\""),
            })
    }

    /// Copies one named column out as a contiguous channel.
    pub fn column(&self, name: &str) -> Result<Vec<Real>, StoreError> {
        let index = self.column_index(name)?;
        Ok(self.data.column(index).to_vec())
    }

    /// Arithmetic mean of one named column.
    pub fn column_mean(&self, name: &str) -> Result<Real, StoreError> {
        let index = self.column_index(name)?;
        let column = self.data.column(index);
        Ok(column.sum() / column.len() as Real)
    }
}
