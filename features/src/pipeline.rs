//! Drives test and slice iteration and assembles the output table.
use crate::{
    error::FeatureError,
    extractors::{SliceContext, SliceExtractor},
    segment::segment,
    table::{FeatureRow, FeatureTable, RowMetadata},
};
use itertools::izip;
use rayon::prelude::*;
use soft_sensing_store::{Test, columns, compressor_index};
use tracing::{debug, info, instrument, warn};

/// What to do when one test fails to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Abort the batch on the first failing test.
    #[default]
    FailFast,
    /// Record the failing test and keep going; its rows are omitted.
    SkipAndRecord,
}

/// A test dropped by [`ErrorPolicy::SkipAndRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTest {
    pub test: String,
    pub reason: String,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessOutcome {
    pub table: FeatureTable,
    pub skipped: Vec<SkippedTest>,
}

/// The feature pipeline: per test, metadata extraction, three-axis
/// segmentation, and one extractor call per aligned slice triplet.
///
/// Output row order is (test order, slice order) and the pipeline performs
/// no randomization, so two runs over the same snapshot with the same
/// configuration produce row-for-row identical tables.
pub struct FeaturePipeline {
    slice_count: usize,
    extractor: Box<dyn SliceExtractor>,
    error_policy: ErrorPolicy,
}

impl FeaturePipeline {
    pub fn new(
        slice_count: usize,
        extractor: Box<dyn SliceExtractor>,
        error_policy: ErrorPolicy,
    ) -> Result<Self, FeatureError> {
        if slice_count == 0 {
            return Err(FeatureError::invalid("pipeline", "slice count is zero"));
        }
        Ok(Self {
            slice_count,
            extractor,
            error_policy,
        })
    }

    /// Processes the tests sequentially, in the order given.
    pub fn process(&self, tests: &[&Test]) -> Result<ProcessOutcome, FeatureError> {
        let mut outcome = ProcessOutcome::default();
        for test in tests {
            match self.process_test(test) {
                Ok(rows) => append_rows(&mut outcome.table, rows)?,
                Err(error) => self.handle_failure(test, error, &mut outcome.skipped)?,
            }
        }
        info!(
            rows = outcome.table.row_count(),
            skipped = outcome.skipped.len(),
            extractor = self.extractor.name(),
            "processing finished"
        );
        Ok(outcome)
    }

    /// Processes the tests in parallel across a rayon pool.
    ///
    /// Each test touches no shared mutable state, and the container layer
    /// serialises concurrent dataset reads internally. Per-test row blocks
    /// are re-assembled in test order, so the outcome is identical to
    /// [`Self::process`].
    pub fn process_parallel(&self, tests: &[&Test]) -> Result<ProcessOutcome, FeatureError> {
        let results: Vec<Result<Vec<FeatureRow>, FeatureError>> = tests
            .par_iter()
            .map(|test| self.process_test(test))
            .collect();

        let mut outcome = ProcessOutcome::default();
        for (test, result) in tests.iter().zip(results) {
            match result {
                Ok(rows) => append_rows(&mut outcome.table, rows)?,
                Err(error) => self.handle_failure(test, error, &mut outcome.skipped)?,
            }
        }
        info!(
            rows = outcome.table.row_count(),
            skipped = outcome.skipped.len(),
            extractor = self.extractor.name(),
            "parallel processing finished"
        );
        Ok(outcome)
    }

    /// Builds all of one test's rows, or fails without emitting any.
    #[instrument(skip_all, fields(test = %test.name()))]
    fn process_test(&self, test: &Test) -> Result<Vec<FeatureRow>, FeatureError> {
        self.test_rows(test)
            .map_err(|error| error.for_test(test.name()))
    }

    fn test_rows(&self, test: &Test) -> Result<Vec<FeatureRow>, FeatureError> {
        let metadata = extract_metadata(test)?;

        let vibration = test.vibration_measurements()?;
        let x = vibration.column(columns::X)?;
        let y = vibration.column(columns::Y)?;
        let z = vibration.column(columns::Z)?;
        let x_slices = segment(&x, self.slice_count)?;
        let y_slices = segment(&y, self.slice_count)?;
        let z_slices = segment(&z, self.slice_count)?;

        let mut rows = Vec::with_capacity(self.slice_count);
        for (slice_index, (x_slice, y_slice, z_slice)) in
            izip!(x_slices, y_slices, z_slices).enumerate()
        {
            let context = SliceContext {
                test_name: test.name(),
                unit_id: test.unit_id(),
                slice_index,
                slice_count: self.slice_count,
            };
            let features = self.extractor.extract(x_slice, y_slice, z_slice, &context)?;
            rows.push(FeatureRow { metadata, features });
        }
        debug!(rows = rows.len(), "test processed");
        Ok(rows)
    }

    fn handle_failure(
        &self,
        test: &Test,
        error: FeatureError,
        skipped: &mut Vec<SkippedTest>,
    ) -> Result<(), FeatureError> {
        match self.error_policy {
            ErrorPolicy::FailFast => Err(error),
            ErrorPolicy::SkipAndRecord => {
                warn!(test = %test.name(), %error, "skipping test");
                skipped.push(SkippedTest {
                    test: test.name().to_owned(),
                    reason: error.to_string(),
                });
                Ok(())
            }
        }
    }
}

fn append_rows(table: &mut FeatureTable, rows: Vec<FeatureRow>) -> Result<(), FeatureError> {
    for row in rows {
        table.push(row)?;
    }
    Ok(())
}

/// Extracts the per-test metadata replicated onto each of its rows.
///
/// Set points come from the test attributes (the evaporating magnitude is
/// negated per the rig's sign convention); measured values are column means
/// of the numerical table.
fn extract_metadata(test: &Test) -> Result<RowMetadata, FeatureError> {
    let unit = compressor_index(test.unit_id()).ok_or_else(|| {
        FeatureError::invalid(
            "metadata",
            format!("unit \"{}\" has no compressor digit", test.unit_id()),
        )
    })?;
    let attributes = test.attributes();
    let numerical = test.numerical_measurements()?;
    Ok(RowMetadata {
        unit,
        rpm: attributes.angular_speed()?,
        t_evap_ref: -attributes.evaporating_temperature()?,
        t_cond_ref: attributes.condensing_temperature()?,
        t_evap: numerical.column_mean(columns::T_EVAP)?,
        t_cond: numerical.column_mean(columns::T_COND)?,
        p_suc: numerical.column_mean(columns::P_SUC)?,
        p_dis: numerical.column_mean(columns::P_DIS)?,
    })
}
