//! Scalar statistics over small slices.

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
///
/// `None` with fewer than two values. NaN inputs propagate.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Bound `value` to `[lo, hi]`.
///
/// Unlike `f64::clamp` this never panics: with `lo > hi` the upper bound
/// wins. NaN passes through unchanged.
pub fn clip(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        return value;
    }
    value.max(lo).min(hi)
}
