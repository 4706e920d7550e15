//! The closed set of slice extractors and the registry that resolves a
//! configuration key to one of them.
pub(crate) mod banded;
pub(crate) mod raw_spectrum;
pub(crate) mod time_stats;

use crate::{error::FeatureError, options::ProcessingOptions, table::FeatureSet};
use soft_sensing_common::Real;
use strum::{Display, EnumIter, EnumString};

pub use banded::BandedFftExtractor;
pub use raw_spectrum::RawSpectrumExtractor;
pub use time_stats::TimeStatsExtractor;

/// Context handed to an extractor alongside the slice data.
#[derive(Debug, Clone, Copy)]
pub struct SliceContext<'a> {
    /// Name of the test the slice belongs to.
    pub test_name: &'a str,
    /// Identifier of the owning unit.
    pub unit_id: &'a str,
    /// Index of this slice within the test, `0..slice_count`.
    pub slice_index: usize,
    /// Total number of slices each channel was split into.
    pub slice_count: usize,
}

/// Computes one slice's features from its three aligned axis slices.
///
/// Implementations are pure: identical inputs always produce an identical
/// feature set, with stable names, order, and vector widths. `Send + Sync`
/// lets the pipeline fan extraction out across tests.
pub trait SliceExtractor: Send + Sync {
    /// The registry key this extractor is published under.
    fn name(&self) -> &'static str;

    fn extract(
        &self,
        x: &[Real],
        y: &[Real],
        z: &[Real],
        context: &SliceContext,
    ) -> Result<FeatureSet, FeatureError>;
}

/// Registry of the available extractors, keyed by configuration name.
///
/// The set is closed: a configuration key resolves here or the run fails
/// before any processing starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ExtractorKind {
    /// Per-axis banded spectral energy vectors; the production feature set.
    BandedFft,
    /// Per-axis full one-sided amplitude spectra.
    RawSpectrum,
    /// Per-axis RMS, skewness, and kurtosis.
    TimeStats,
}

impl ExtractorKind {
    /// Builds the extractor this key names, configured from the options.
    pub fn build(self, options: &ProcessingOptions) -> Box<dyn SliceExtractor> {
        match self {
            Self::BandedFft => Box::new(BandedFftExtractor::new(options)),
            Self::RawSpectrum => Box::new(RawSpectrumExtractor),
            Self::TimeStats => Box::new(TimeStatsExtractor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn keys_round_trip_through_the_registry() {
        assert_eq!(
            ExtractorKind::from_str("banded_fft").unwrap(),
            ExtractorKind::BandedFft
        );
        assert_eq!(
            ExtractorKind::from_str("time_stats").unwrap(),
            ExtractorKind::TimeStats
        );
        assert!(ExtractorKind::from_str("bandas_fft").is_err());
    }

    #[test]
    fn built_extractors_report_their_key() {
        let options: crate::ProcessingOptions =
            serde_json::from_str(r#"{"num_slices": 10}"#).unwrap();
        for kind in ExtractorKind::iter() {
            let extractor = kind.build(&options);
            assert_eq!(extractor.name(), kind.to_string());
        }
    }
}
