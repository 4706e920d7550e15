//! The production extractor: banded spectral energies per axis.
use super::{SliceContext, SliceExtractor};
use crate::{
    error::FeatureError,
    options::ProcessingOptions,
    spectrum::{BandSettings, MAX_FREQUENCY_HZ, banded_filter_feature},
    table::{FeatureSet, FeatureValue},
};
use soft_sensing_common::Real;

/// Computes one banded energy vector per vibration axis.
///
/// The slice period fed to the spectral chain is the nominal recording
/// duration divided by the slice count, so the feature-vector length is
/// fixed for a given configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BandedFftExtractor {
    sample_rate: Real,
    recording_seconds: Real,
    band_width_hz: Real,
    overlap_fraction: Real,
    db_reference: Option<Real>,
}

impl BandedFftExtractor {
    pub fn new(options: &ProcessingOptions) -> Self {
        Self {
            sample_rate: options.sample_rate,
            recording_seconds: options.recording_seconds,
            band_width_hz: options.band_width_hz,
            overlap_fraction: options.overlap_fraction,
            db_reference: options.db_reference,
        }
    }

    fn settings(&self, slice_count: usize) -> BandSettings {
        BandSettings {
            sample_period_seconds: self.recording_seconds / slice_count as Real,
            band_width_hz: self.band_width_hz,
            overlap_fraction: self.overlap_fraction,
            max_frequency_hz: MAX_FREQUENCY_HZ,
            db_reference: self.db_reference,
        }
    }
}

impl SliceExtractor for BandedFftExtractor {
    fn name(&self) -> &'static str {
        "banded_fft"
    }

    fn extract(
        &self,
        x: &[Real],
        y: &[Real],
        z: &[Real],
        context: &SliceContext,
    ) -> Result<FeatureSet, FeatureError> {
        let settings = self.settings(context.slice_count);
        Ok(vec![
            (
                "x".to_owned(),
                FeatureValue::Vector(banded_filter_feature(x, self.sample_rate, &settings)?),
            ),
            (
                "y".to_owned(),
                FeatureValue::Vector(banded_filter_feature(y, self.sample_rate, &settings)?),
            ),
            (
                "z".to_owned(),
                FeatureValue::Vector(banded_filter_feature(z, self.sample_rate, &settings)?),
            ),
        ])
    }
}
