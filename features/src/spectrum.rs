//! Single-sided amplitude spectra and banded energy summation.
//!
//! The banded layout reproduces the qualification rig's historical analysis
//! chain exactly: point counts are rounded from the frequency resolution,
//! the band count is `1 + ceil((total - band) / (band - overlap))`, windows
//! slide by `band - overlap` points, and the final band runs to the end of
//! the analysis range and may be narrower than the rest. Downstream models
//! were trained against vectors of this exact length, so the arithmetic here
//! is load-bearing.
use crate::error::FeatureError;
use rustfft::{FftPlanner, num_complex::Complex};
use soft_sensing_common::Real;

/// Upper bound of the banded analysis range.
///
/// The acquisition chain low-passes at half the 51.2 kHz sample rate, and
/// every historical feature set was produced against this fixed 25.6 kHz
/// range. [`band_energies`] pins its analysis range to this value even
/// though its settings carry a `max_frequency_hz` field; see there.
pub const MAX_FREQUENCY_HZ: Real = 25_600.0;

/// Computes the single-sided amplitude spectrum of a signal.
///
/// The transform magnitude is normalised by `sample_count` and truncated to
/// the first `sample_count / 2 + 1` bins (clamped to the bins available);
/// every kept bin except the first and the last is doubled to fold the
/// negative-frequency energy into the one-sided spectrum.
///
/// `sample_count` is normally the signal length; the banded extractor
/// derives it from the nominal sample rate and slice period instead, which
/// matches the historical analysis when the two coincide.
pub fn single_sided_spectrum(
    signal: &[Real],
    sample_count: usize,
) -> Result<Vec<Real>, FeatureError> {
    if signal.is_empty() {
        return Err(FeatureError::invalid("single_sided_spectrum", "empty signal"));
    }
    if sample_count == 0 {
        return Err(FeatureError::invalid(
            "single_sided_spectrum",
            "sample count is zero",
        ));
    }

    let mut buffer: Vec<Complex<Real>> = signal
        .iter()
        .map(|&value| Complex::new(value, 0.0))
        .collect();
    FftPlanner::new()
        .plan_fft_forward(buffer.len())
        .process(&mut buffer);

    let kept = (sample_count / 2 + 1).min(buffer.len());
    let mut spectrum: Vec<Real> = buffer
        .iter()
        .take(kept)
        .map(|bin| bin.norm() / sample_count as Real)
        .collect();
    if let Some(interior) = spectrum.get_mut(1..kept.saturating_sub(1)) {
        for bin in interior {
            *bin *= 2.0;
        }
    }
    Ok(spectrum)
}

/// Parameters of the banded energy summation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandSettings {
    /// Duration of the analysed slice in seconds; the spectrum's frequency
    /// resolution is its reciprocal.
    pub sample_period_seconds: Real,
    /// Nominal band width in Hz.
    pub band_width_hz: Real,
    /// Fraction of the band width shared with the preceding band.
    pub overlap_fraction: Real,
    /// Upper bound of the analysis range in Hz.
    ///
    /// Accepted for interface compatibility but **ignored**: the analysis
    /// range is always [`MAX_FREQUENCY_HZ`]. The historical implementation
    /// overrode the caller's value the same way, and the feature-vector
    /// length consumed downstream depends on it staying fixed.
    pub max_frequency_hz: Real,
    /// When set, energies are reported as `20 * log10(energy / reference)`.
    pub db_reference: Option<Real>,
}

/// Derived band layout; `band_count` is a pure function of the settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BandLayout {
    band_points: usize,
    step_points: usize,
    total_points: usize,
    band_count: usize,
}

fn layout(settings: &BandSettings) -> Result<BandLayout, FeatureError> {
    if settings.sample_period_seconds <= 0.0 {
        return Err(FeatureError::invalid(
            "band_energies",
            "sample period must be positive",
        ));
    }
    if settings.band_width_hz <= 0.0 {
        return Err(FeatureError::invalid(
            "band_energies",
            "band width must be positive",
        ));
    }
    if !(0.0..1.0).contains(&settings.overlap_fraction) {
        return Err(FeatureError::invalid(
            "band_energies",
            format!(
                "overlap fraction {} outside [0, 1)",
                settings.overlap_fraction
            ),
        ));
    }

    let frequency_resolution = 1.0 / settings.sample_period_seconds;
    let band_points = (settings.band_width_hz / frequency_resolution).round() as usize;
    let overlap_points =
        ((settings.band_width_hz * settings.overlap_fraction) / frequency_resolution).round()
            as usize;
    let total_points = (MAX_FREQUENCY_HZ / frequency_resolution).round() as usize;

    if band_points == 0 {
        return Err(FeatureError::invalid(
            "band_energies",
            "band width rounds to zero points at this resolution",
        ));
    }
    if overlap_points >= band_points {
        return Err(FeatureError::invalid(
            "band_energies",
            "overlap spans the whole band",
        ));
    }
    if band_points > total_points {
        return Err(FeatureError::invalid(
            "band_energies",
            "band is wider than the analysis range",
        ));
    }

    let step_points = band_points - overlap_points;
    let band_count = 1 + (total_points - band_points).div_ceil(step_points);
    Ok(BandLayout {
        band_points,
        step_points,
        total_points,
        band_count,
    })
}

/// Sum of squares over a clamped window of the spectrum.
fn window_energy(spectrum: &[Real], start: usize, end: usize) -> Real {
    let lo = start.min(spectrum.len());
    let hi = end.min(spectrum.len()).max(lo);
    spectrum
        .get(lo..hi)
        .unwrap_or_default()
        .iter()
        .map(|amplitude| amplitude * amplitude)
        .sum()
}

/// Sums the spectrum's squared amplitudes over overlapping bands.
///
/// Band `i` covers `band_points` spectrum bins starting at
/// `i * (band_points - overlap_points)`; the final band runs from its start
/// to the end of the analysis range and may be narrower. The output length
/// is a pure function of the settings and never depends on the spectrum's
/// contents.
pub fn band_energies(
    spectrum: &[Real],
    settings: &BandSettings,
) -> Result<Vec<Real>, FeatureError> {
    let layout = layout(settings)?;

    let mut energies = Vec::with_capacity(layout.band_count);
    let mut start = 0usize;
    for _ in 0..layout.band_count - 1 {
        energies.push(window_energy(spectrum, start, start + layout.band_points));
        start += layout.step_points;
    }
    energies.push(window_energy(spectrum, start, layout.total_points));

    Ok(match settings.db_reference {
        Some(reference) => energies
            .iter()
            .map(|energy| 20.0 * (energy / reference).log10())
            .collect(),
        None => energies,
    })
}

/// The production banded feature: single-sided spectrum over
/// `round(sample_rate * sample_period)` samples, then [`band_energies`].
pub fn banded_filter_feature(
    signal: &[Real],
    sample_rate: Real,
    settings: &BandSettings,
) -> Result<Vec<Real>, FeatureError> {
    let sample_count = (sample_rate * settings.sample_period_seconds).round() as usize;
    if sample_count == 0 {
        return Err(FeatureError::invalid(
            "banded_filter_feature",
            "sample rate and period give zero samples",
        ));
    }
    let spectrum = single_sided_spectrum(signal, sample_count)?;
    band_energies(&spectrum, settings)
}
