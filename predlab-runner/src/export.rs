//! Export — the normalized submission record set and JSON artifacts.
//!
//! The submission table is the contract with the output collaborator:
//! exactly `keys_pair, enterTime, exitTime, direction, percentPair,
//! strategyName`, in that order. The header is written even when there are
//! no trades.

use std::path::Path;

use anyhow::{Context, Result};
use predlab_core::domain::TradeRecord;
use serde::{Deserialize, Serialize};

use crate::metrics::TradeSummary;

pub const SUBMISSION_COLUMNS: [&str; 6] = [
    "keys_pair",
    "enterTime",
    "exitTime",
    "direction",
    "percentPair",
    "strategyName",
];

/// One row of the normalized trade table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    #[serde(rename = "keys_pair")]
    pub pair_id: String,
    #[serde(rename = "enterTime")]
    pub enter_time: i64,
    #[serde(rename = "exitTime")]
    pub exit_time: i64,
    pub direction: i32,
    #[serde(rename = "percentPair")]
    pub percent_pair: f64,
    #[serde(rename = "strategyName")]
    pub strategy_name: String,
}

impl From<&TradeRecord> for SubmissionRecord {
    fn from(t: &TradeRecord) -> Self {
        Self {
            pair_id: t.pair_id.clone(),
            enter_time: t.enter_time,
            exit_time: t.exit_time,
            direction: t.direction,
            percent_pair: t.size_fraction,
            strategy_name: t.policy.as_str().to_string(),
        }
    }
}

pub fn submission_records(trades: &[TradeRecord]) -> Vec<SubmissionRecord> {
    trades.iter().map(SubmissionRecord::from).collect()
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Render the submission table as CSV.
pub fn export_submission_csv(trades: &[TradeRecord]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    wtr.write_record(SUBMISSION_COLUMNS)?;
    for record in submission_records(trades) {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().context("failed to flush submission CSV")?;
    String::from_utf8(bytes).context("submission CSV is not valid UTF-8")
}

pub fn write_submission_csv(path: &Path, trades: &[TradeRecord]) -> Result<()> {
    let csv = export_submission_csv(trades)?;
    std::fs::write(path, csv)
        .with_context(|| format!("failed to write submission CSV {}", path.display()))
}

/// Parse a submission table back into records.
pub fn import_submission_csv(csv: &str) -> Result<Vec<SubmissionRecord>> {
    let mut rdr = csv::Reader::from_reader(csv.as_bytes());
    let headers = rdr.headers().context("failed to read submission header")?;
    if headers.iter().ne(SUBMISSION_COLUMNS) {
        anyhow::bail!("unexpected submission columns: {:?}", headers);
    }
    rdr.deserialize()
        .collect::<Result<Vec<SubmissionRecord>, _>>()
        .context("failed to parse submission rows")
}

// ─── JSON ───────────────────────────────────────────────────────────

/// Full trade records, including the estimated return.
pub fn export_trades_json(trades: &[TradeRecord]) -> Result<String> {
    serde_json::to_string_pretty(trades).context("failed to serialize trades to JSON")
}

pub fn import_trades_json(json: &str) -> Result<Vec<TradeRecord>> {
    serde_json::from_str(json).context("failed to deserialize trades from JSON")
}

pub fn write_trades_json(path: &Path, trades: &[TradeRecord]) -> Result<()> {
    let json = export_trades_json(trades)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write trades JSON {}", path.display()))
}

/// `null` when there were no trades.
pub fn write_summary_json(path: &Path, summary: Option<&TradeSummary>) -> Result<()> {
    let json = serde_json::to_string_pretty(&summary).context("failed to serialize summary")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write summary JSON {}", path.display()))
}
