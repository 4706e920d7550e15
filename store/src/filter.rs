//! Attribute-predicate filtering of tests: the query side of the store.
use crate::{
    container::{DatasetStore, Test, Unit},
    error::StoreError,
};
use serde::Deserialize;
use soft_sensing_common::Real;
use tracing::warn;

/// A conjunctive set of test predicates.
///
/// Deserializes from the persisted slice-configuration schema (camelCase
/// keys). An absent key imposes no constraint. `repetition` and `type` are
/// accepted for compatibility with existing slice configurations but are
/// inert; supplying one logs a warning and never changes the output.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TestFilter {
    /// Accepted target speeds in RPM.
    pub angular_speed: Option<Vec<i64>>,
    /// Closed condensing-temperature interval, °C; the interval spans the
    /// minimum and maximum of the supplied values.
    pub condensing_temperature: Option<Vec<Real>>,
    /// Closed evaporating-temperature interval, °C magnitude.
    pub evaporating_temperature: Option<Vec<Real>>,
    /// Accepted compressor indices (leading digit of the unit id).
    pub compressor: Option<Vec<u32>>,
    /// Accepted but inert.
    pub repetition: Option<Vec<i64>>,
    /// Accepted but inert.
    #[serde(rename = "type")]
    pub test_type: Option<String>,
}

impl TestFilter {
    /// True when the test satisfies every supplied constraint.
    pub fn matches(&self, unit: &Unit, test: &Test) -> Result<bool, StoreError> {
        if let Some(speeds) = &self.angular_speed
            && !speeds.contains(&test.attributes().angular_speed()?)
        {
            return Ok(false);
        }
        if let Some(values) = &self.condensing_temperature {
            let interval = Interval::from_values("condensingTemperature", values)?;
            if !interval.is_in(test.attributes().condensing_temperature()?) {
                return Ok(false);
            }
        }
        if let Some(values) = &self.evaporating_temperature {
            let interval = Interval::from_values("evaporatingTemperature", values)?;
            if !interval.is_in(test.attributes().evaporating_temperature()?) {
                return Ok(false);
            }
        }
        if let Some(compressors) = &self.compressor
            && !compressors.contains(&unit.compressor_index()?)
        {
            return Ok(false);
        }
        Ok(true)
    }

    fn warn_inert_keys(&self) {
        if self.repetition.is_some() {
            warn!("filter key \"repetition\" is accepted but never applied");
        }
        if self.test_type.is_some() {
            warn!("filter key \"type\" is accepted but never applied");
        }
    }
}

/// A closed interval built from an unordered value list.
#[derive(Debug, Clone, Copy)]
struct Interval {
    min: Real,
    max: Real,
}

impl Interval {
    fn from_values(key: &'static str, values: &[Real]) -> Result<Self, StoreError> {
        let first = *values.first().ok_or(StoreError::Constraint {
            key,
            reason: "interval has no values".to_owned(),
        })?;
        let (min, max) = values
            .iter()
            .fold((first, first), |(min, max), &value| {
                (min.min(value), max.max(value))
            });
        Ok(Self { min, max })
    }

    fn is_in(&self, value: Real) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Filters the store's tests by the given predicates.
///
/// Output preserves per-unit test order and concatenates units in the order
/// given by `selected_units`, or the container order when `None`. Fails with
/// [`StoreError::UnknownUnit`] for a selected unit that is not present, and
/// [`StoreError::Validation`] when a test attribute cannot be parsed against
/// a supplied constraint.
pub fn filter_tests<'a>(
    store: &'a DatasetStore,
    filter: &TestFilter,
    selected_units: Option<&[String]>,
) -> Result<Vec<&'a Test>, StoreError> {
    filter.warn_inert_keys();

    let units: Vec<&Unit> = match selected_units {
        Some(ids) => ids
            .iter()
            .map(|id| {
                store.unit(id).ok_or_else(|| StoreError::UnknownUnit {
                    unit: id.clone(),
                })
            })
            .collect::<Result<_, _>>()?,
        None => store.units().collect(),
    };

    let mut selected = Vec::new();
    for unit in units {
        for test in unit.tests() {
            if filter.matches(unit, test)? {
                selected.push(test);
            }
        }
    }
    Ok(selected)
}
