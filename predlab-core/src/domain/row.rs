//! Prediction rows — raw per-timestamp observations and their derived form.

use serde::{Deserialize, Serialize};

/// Number of raw prediction scores per row (`Lpred1b..Lpred9b`).
pub const PREDICTION_COUNT: usize = 9;

/// One raw observation for one pair at one point in time.
///
/// The nine scores are the already sign-adjusted "b" variants. Missing
/// values are carried as NaN and never satisfy an entry condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    pub pair_id: String,
    pub minutes_since_start: i64,
    pub predictions: [f64; PREDICTION_COUNT],
}

impl PredictionRow {
    pub fn new(
        pair_id: impl Into<String>,
        minutes_since_start: i64,
        predictions: [f64; PREDICTION_COUNT],
    ) -> Self {
        Self {
            pair_id: pair_id.into(),
            minutes_since_start,
            predictions,
        }
    }

    /// Row with every prediction set to the same score.
    pub fn uniform(pair_id: impl Into<String>, minutes_since_start: i64, score: f64) -> Self {
        Self::new(pair_id, minutes_since_start, [score; PREDICTION_COUNT])
    }
}

/// A prediction row with its derived fields.
///
/// Built once by the signal deriver and never mutated afterwards.
/// `momentum` is `None` for the first rows of a pair, where the trailing
/// window is not yet full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub pair_id: String,
    pub minutes_since_start: i64,
    pub predictions: [f64; PREDICTION_COUNT],
    pub signal: f64,
    pub entry_signal: f64,
    pub volatility: f64,
    pub momentum: Option<f64>,
}

impl Row {
    pub fn has_momentum(&self) -> bool {
        self.momentum.is_some()
    }
}
