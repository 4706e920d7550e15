//! # Soft-Sensing Features
//!
//! Turns filtered qualification tests into a tabular feature set:
//! * Splits each test's vibration channels into equal-length slices.
//! * Applies a configured slice extractor (banded spectral energies, raw
//!   one-sided spectra, or time-domain statistics) to each aligned
//!   three-axis slice triplet.
//! * Merges the per-slice features with the test's operating-condition
//!   metadata into one row per slice, preserving (test, slice) order.
//!
//! The extractor set is closed and resolved from a configuration key; the
//! pipeline itself is extractor-agnostic and fully deterministic.
mod error;
mod extractors;
mod options;
mod pipeline;
mod segment;
mod spectrum;
mod table;

pub use error::FeatureError;
pub use extractors::{
    BandedFftExtractor, ExtractorKind, RawSpectrumExtractor, SliceContext, SliceExtractor,
    TimeStatsExtractor,
};
pub use options::ProcessingOptions;
pub use pipeline::{ErrorPolicy, FeaturePipeline, ProcessOutcome, SkippedTest};
pub use segment::{segment, segment_axes};
pub use spectrum::{
    BandSettings, MAX_FREQUENCY_HZ, band_energies, banded_filter_feature, single_sided_spectrum,
};
pub use table::{FeatureRow, FeatureSet, FeatureTable, FeatureValue, RowMetadata};
