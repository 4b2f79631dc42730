// Bound value at an arbitrary instant
use super::series::DataPoint;

/// Value of a bound series at `t`.
///
/// Takes the newest valued sample at or before `t` and the oldest valued
/// sample at or after `t` and returns their mean. Bound series are usually
/// coarser than the metric they guard, so the anchors are not assumed to be
/// evenly spaced around `t`. Returns `None` when either anchor is missing.
pub fn interpolate(datapoints: &[DataPoint], t: i64) -> Option<f64> {
    let left = datapoints
        .iter()
        .rev()
        .filter(|p| p.timestamp <= t)
        .find_map(|p| p.value)?;
    let right = datapoints
        .iter()
        .filter(|p| p.timestamp >= t)
        .find_map(|p| p.value)?;

    Some((left + right) / 2.0)
}
