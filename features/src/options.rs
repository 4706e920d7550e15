//! Processing configuration passed explicitly to the pipeline.
use serde::Deserialize;
use soft_sensing_common::Real;

fn default_sample_rate() -> Real {
    51_200.0
}

fn default_recording_seconds() -> Real {
    10.0
}

fn default_band_width_hz() -> Real {
    200.0
}

fn default_overlap_fraction() -> Real {
    0.1
}

/// One named entry of the processing configuration file.
///
/// Everything the extractors need is carried here and handed to the pipeline
/// at construction; nothing is read from the environment at processing time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessingOptions {
    /// Number of equal-length slices each vibration channel is split into.
    pub num_slices: usize,

    /// Acquisition sample rate of the vibration channels, Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: Real,

    /// Nominal duration of one full test recording, seconds. The slice
    /// period handed to the spectral extractors is this divided by
    /// `num_slices`.
    #[serde(default = "default_recording_seconds")]
    pub recording_seconds: Real,

    /// Nominal spectral band width, Hz.
    #[serde(default = "default_band_width_hz")]
    pub band_width_hz: Real,

    /// Fraction of each band shared with its predecessor.
    #[serde(default = "default_overlap_fraction")]
    pub overlap_fraction: Real,

    /// Optional dB reference amplitude; raw energies when absent.
    #[serde(default)]
    pub db_reference: Option<Real>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_the_optional_fields() {
        let options: ProcessingOptions = serde_json::from_str(r#"{"num_slices": 10}"#).unwrap();
        assert_eq!(options.num_slices, 10);
        assert_eq!(options.sample_rate, 51_200.0);
        assert_eq!(options.recording_seconds, 10.0);
        assert_eq!(options.band_width_hz, 200.0);
        assert_eq!(options.overlap_fraction, 0.1);
        assert_eq!(options.db_reference, None);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<ProcessingOptions, _> =
            serde_json::from_str(r#"{"num_slices": 10, "dur": 200}"#);
        assert!(result.is_err());
    }
}
