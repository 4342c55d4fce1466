//! Per-pair ordered series.

use serde::{Deserialize, Serialize};

use super::row::Row;

/// All derived rows of one pair, ascending by `minutes_since_start`.
///
/// Construction sorts stably, so rows sharing a timestamp keep their
/// input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSeries {
    pair_id: String,
    rows: Vec<Row>,
}

impl PairSeries {
    pub fn new(pair_id: impl Into<String>, mut rows: Vec<Row>) -> Self {
        rows.sort_by_key(|r| r.minutes_since_start);
        Self {
            pair_id: pair_id.into(),
            rows,
        }
    }

    pub fn pair_id(&self) -> &str {
        &self.pair_id
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Timestamp of the row at `index`, if any.
    pub fn time_at(&self, index: usize) -> Option<i64> {
        self.rows.get(index).map(|r| r.minutes_since_start)
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}
