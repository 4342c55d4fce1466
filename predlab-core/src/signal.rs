//! Signal derivation — blended signal, volatility and momentum per row.
//!
//! `signal`, `entry_signal` and `volatility` are pure functions of one row's
//! nine predictions. `momentum` depends on the pair's time order, so the
//! deriver groups rows by pair and sorts each group before computing it.

use std::collections::BTreeMap;

use crate::domain::{PairSeries, PredictionRow, Row, PREDICTION_COUNT};
use crate::indicators::{sample_std_dev, trailing_mean};

/// Trailing window for momentum, inclusive of the current row.
pub const MOMENTUM_WINDOW: usize = 5;

/// Number of leading predictions that feed the volatility estimate.
pub const VOLATILITY_COLUMNS: usize = 5;

/// Weights of the near (1-3), mid (4-6) and far (7-9) prediction groups.
pub const BLEND_WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];

/// Weighted blend of the three prediction-group means.
pub fn blended_signal(predictions: &[f64; PREDICTION_COUNT]) -> f64 {
    predictions
        .chunks(3)
        .zip(BLEND_WEIGHTS)
        .map(|(group, weight)| group.iter().sum::<f64>() / 3.0 * weight)
        .sum()
}

/// Cross-sectional sample standard deviation of predictions 1-5.
pub fn cross_sectional_volatility(predictions: &[f64; PREDICTION_COUNT]) -> f64 {
    sample_std_dev(&predictions[..VOLATILITY_COLUMNS]).unwrap_or(f64::NAN)
}

/// Derive the per-row fields. Momentum is left unset; it needs the pair's
/// ordered history.
pub fn derive_row(raw: PredictionRow) -> Row {
    let signal = blended_signal(&raw.predictions);
    Row {
        volatility: cross_sectional_volatility(&raw.predictions),
        pair_id: raw.pair_id,
        minutes_since_start: raw.minutes_since_start,
        predictions: raw.predictions,
        signal,
        // Predictions are inversely correlated with realized profit.
        entry_signal: -signal,
        momentum: None,
    }
}

/// Turns raw prediction rows into ordered per-pair series of derived rows.
#[derive(Debug, Clone)]
pub struct SignalDeriver {
    momentum_window: usize,
}

impl SignalDeriver {
    pub fn new(momentum_window: usize) -> Self {
        assert!(momentum_window >= 1, "momentum window must be >= 1");
        Self { momentum_window }
    }

    pub fn momentum_window(&self) -> usize {
        self.momentum_window
    }

    /// Group rows by pair (ascending pair id), sort each group stably by
    /// time and compute every derived field.
    ///
    /// Input order is irrelevant except as the tie-break for rows sharing
    /// a timestamp within a pair.
    pub fn derive(&self, rows: Vec<PredictionRow>) -> Vec<PairSeries> {
        let mut groups: BTreeMap<String, Vec<PredictionRow>> = BTreeMap::new();
        for row in rows {
            groups.entry(row.pair_id.clone()).or_default().push(row);
        }

        groups
            .into_iter()
            .map(|(pair_id, mut raw)| {
                raw.sort_by_key(|r| r.minutes_since_start);
                let mut derived: Vec<Row> = raw.into_iter().map(derive_row).collect();
                let entry_signals: Vec<f64> = derived.iter().map(|r| r.entry_signal).collect();
                let momentum = trailing_mean(&entry_signals, self.momentum_window);
                for (row, m) in derived.iter_mut().zip(momentum) {
                    row.momentum = m;
                }
                PairSeries::new(pair_id, derived)
            })
            .collect()
    }
}

impl Default for SignalDeriver {
    fn default() -> Self {
        Self::new(MOMENTUM_WINDOW)
    }
}
