//! Alternative extractor: full one-sided spectra, no banding.
use super::{SliceContext, SliceExtractor};
use crate::{
    error::FeatureError,
    spectrum::single_sided_spectrum,
    table::{FeatureSet, FeatureValue},
};
use soft_sensing_common::Real;

/// Emits each axis slice's single-sided amplitude spectrum unchanged.
///
/// Useful when a downstream model wants to learn its own frequency
/// weighting; the vector width is `slice_len / 2 + 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawSpectrumExtractor;

impl SliceExtractor for RawSpectrumExtractor {
    fn name(&self) -> &'static str {
        "raw_spectrum"
    }

    fn extract(
        &self,
        x: &[Real],
        y: &[Real],
        z: &[Real],
        _context: &SliceContext,
    ) -> Result<FeatureSet, FeatureError> {
        Ok(vec![
            (
                "x".to_owned(),
                FeatureValue::Vector(single_sided_spectrum(x, x.len())?),
            ),
            (
                "y".to_owned(),
                FeatureValue::Vector(single_sided_spectrum(y, y.len())?),
            ),
            (
                "z".to_owned(),
                FeatureValue::Vector(single_sided_spectrum(z, z.len())?),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_width_follows_the_slice_length() {
        let context = SliceContext {
            test_name: "A3600-1-x-15,0-40,0",
            unit_id: "2",
            slice_index: 0,
            slice_count: 2,
        };
        let signal = vec![1.0; 16];
        let features = RawSpectrumExtractor
            .extract(&signal, &signal, &signal, &context)
            .unwrap();
        for (_, value) in &features {
            assert_eq!(value.width(), 9);
        }
    }
}
