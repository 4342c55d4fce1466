//! Trailing-window statistics over an ordered series.

use super::stats::mean;

/// Trailing mean over `window` values ending at (and including) each index.
///
/// The first `window - 1` positions have no full window and are `None`;
/// they are never filled with a partial average or zero.
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    assert!(window >= 1, "trailing window must be >= 1");
    let n = values.len();
    let mut result = vec![None; n];
    if n < window {
        return result;
    }
    for (end, slot) in result.iter_mut().enumerate().skip(window - 1) {
        *slot = mean(&values[end + 1 - window..=end]);
    }
    result
}
