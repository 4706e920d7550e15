//! Deterministic equal-length segmentation of waveform channels.
use crate::error::FeatureError;
use soft_sensing_common::Real;
use std::collections::BTreeMap;

/// Splits a channel into `count` contiguous equal-length slices.
///
/// When the channel length is not divisible by `count`, the remainder is
/// trimmed from the tail before splitting; the trim is never distributed
/// across slices. The returned slices preserve sample order and together
/// cover exactly the first `len - (len mod count)` samples.
///
/// Fails with [`FeatureError::InvalidArgument`] when `count` is zero or
/// exceeds the channel length.
pub fn segment(channel: &[Real], count: usize) -> Result<Vec<&[Real]>, FeatureError> {
    if count == 0 {
        return Err(FeatureError::invalid("segment", "slice count is zero"));
    }
    if count > channel.len() {
        return Err(FeatureError::invalid(
            "segment",
            format!(
                "slice count {count} exceeds channel length {}",
                channel.len()
            ),
        ));
    }
    let usable = channel.len() - channel.len() % count;
    let slice_len = usable / count;
    Ok(channel
        .get(..usable)
        .unwrap_or_default()
        .chunks_exact(slice_len)
        .collect())
}

/// Applies [`segment`] independently to each requested axis.
///
/// Fails with [`FeatureError::InvalidArgument`] when a requested axis is not
/// present among the channels.
pub fn segment_axes<'a>(
    channels: &'a BTreeMap<String, Vec<Real>>,
    axes: &[&str],
    count: usize,
) -> Result<BTreeMap<String, Vec<&'a [Real]>>, FeatureError> {
    axes.iter()
        .map(|&axis| {
            let channel = channels.get(axis).ok_or_else(|| {
                FeatureError::invalid("segment_axes", format!("unknown axis \"{axis}\""))
            })?;
            Ok((axis.to_owned(), segment(channel, count)?))
        })
        .collect()
}
