//! Alternative extractor: time-domain statistics per axis.
use super::{SliceContext, SliceExtractor};
use crate::{
    error::FeatureError,
    table::{FeatureSet, FeatureValue},
};
use soft_sensing_common::Real;

/// RMS, skewness, and excess kurtosis for each axis slice.
///
/// Population moments throughout: skewness is `m3 / m2^(3/2)` and kurtosis
/// is `m4 / m2^2 - 3`, both defined as zero for a constant slice.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeStatsExtractor;

fn rms(values: &[Real]) -> Real {
    let sum_of_squares: Real = values.iter().map(|value| value * value).sum();
    (sum_of_squares / values.len() as Real).sqrt()
}

fn central_moments(values: &[Real]) -> (Real, Real, Real) {
    let n = values.len() as Real;
    let mean = values.iter().sum::<Real>() / n;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for value in values {
        let d = value - mean;
        m2 += d * d;
        m3 += d * d * d;
        m4 += d * d * d * d;
    }
    (m2 / n, m3 / n, m4 / n)
}

fn skewness(values: &[Real]) -> Real {
    let (m2, m3, _) = central_moments(values);
    if m2 > 0.0 { m3 / m2.powf(1.5) } else { 0.0 }
}

fn kurtosis(values: &[Real]) -> Real {
    let (m2, _, m4) = central_moments(values);
    if m2 > 0.0 { m4 / (m2 * m2) - 3.0 } else { 0.0 }
}

impl SliceExtractor for TimeStatsExtractor {
    fn name(&self) -> &'static str {
        "time_stats"
    }

    fn extract(
        &self,
        x: &[Real],
        y: &[Real],
        z: &[Real],
        _context: &SliceContext,
    ) -> Result<FeatureSet, FeatureError> {
        for (axis, slice) in [("x", x), ("y", y), ("z", z)] {
            if slice.is_empty() {
                return Err(FeatureError::invalid(
                    "time_stats",
                    format!("axis \"{axis}\" slice is empty"),
                ));
            }
        }
        Ok(vec![
            ("rms_x".to_owned(), FeatureValue::Scalar(rms(x))),
            ("rms_y".to_owned(), FeatureValue::Scalar(rms(y))),
            ("rms_z".to_owned(), FeatureValue::Scalar(rms(z))),
            ("skew_x".to_owned(), FeatureValue::Scalar(skewness(x))),
            ("skew_y".to_owned(), FeatureValue::Scalar(skewness(y))),
            ("skew_z".to_owned(), FeatureValue::Scalar(skewness(z))),
            ("kurt_x".to_owned(), FeatureValue::Scalar(kurtosis(x))),
            ("kurt_y".to_owned(), FeatureValue::Scalar(kurtosis(y))),
            ("kurt_z".to_owned(), FeatureValue::Scalar(kurtosis(z))),
        ])
    }
}
