//! End-to-end engine run: derive → group → scan → aggregate.

use std::path::Path;

use predlab_core::domain::{PairSeries, PolicyName, PredictionRow, TradeRecord};
use predlab_core::policy::{truncate_to_cap, TradePolicy};
use predlab_core::signal::SignalDeriver;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, EngineConfig, ScanMode};
use crate::data_loader::{load_prediction_rows, LoadError};
use crate::metrics::{summarize, TradeSummary};

/// Errors from a file-backed run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("load error: {0}")]
    Load(#[from] LoadError),
}

/// Trades emitted by one policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyTrades {
    pub policy: PolicyName,
    pub trades: Vec<TradeRecord>,
}

/// Complete result of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineRun {
    pub row_count: usize,
    pub pair_count: usize,
    /// Per-policy lists, in canonical policy order.
    pub policy_trades: Vec<PolicyTrades>,
    /// All trades, concatenated in canonical policy order.
    pub trades: Vec<TradeRecord>,
    /// `None` when no trade was generated.
    pub summary: Option<TradeSummary>,
}

impl EngineRun {
    pub fn trades_for(&self, policy: PolicyName) -> &[TradeRecord] {
        self.policy_trades
            .iter()
            .find(|p| p.policy == policy)
            .map(|p| p.trades.as_slice())
            .unwrap_or(&[])
    }
}

/// Run every enabled policy over `rows` and aggregate the result.
///
/// Infallible: degenerate inputs (no rows, pairs too short for a policy's
/// window) simply produce fewer trades.
pub fn run_engine(rows: Vec<PredictionRow>, config: &EngineConfig) -> EngineRun {
    let row_count = rows.len();
    let series = SignalDeriver::default().derive(rows);
    info!(rows = row_count, pairs = series.len(), "derived pair series");

    let policy_trades: Vec<PolicyTrades> = config
        .policies()
        .iter()
        .map(|policy| {
            let trades = scan_policy(policy.as_ref(), &series, config.fee_rate, config.scan_mode);
            info!(policy = %policy.name(), trades = trades.len(), "policy scan complete");
            PolicyTrades {
                policy: policy.name(),
                trades,
            }
        })
        .collect();

    let trades: Vec<TradeRecord> = policy_trades
        .iter()
        .flat_map(|p| p.trades.iter().cloned())
        .collect();
    let summary = summarize(&trades);

    EngineRun {
        row_count,
        pair_count: series.len(),
        policy_trades,
        trades,
        summary,
    }
}

/// Scan all pairs with one policy.
///
/// `Parallel` scans each pair uncapped on the rayon pool, concatenates the
/// per-pair lists in pair order and truncates to the cap. Either cap style
/// keeps the first `max_trades` trades in scan order, so both modes return
/// the same list.
pub fn scan_policy(
    policy: &dyn TradePolicy,
    series: &[PairSeries],
    fee_rate: f64,
    mode: ScanMode,
) -> Vec<TradeRecord> {
    match mode {
        ScanMode::Sequential => policy.run(series, fee_rate),
        ScanMode::Parallel => {
            let per_pair: Vec<Vec<TradeRecord>> = series
                .par_iter()
                .map(|s| {
                    let mut out = Vec::new();
                    policy.scan_pair(s, fee_rate, &mut out, None);
                    out
                })
                .collect();
            let mut trades: Vec<TradeRecord> = per_pair.into_iter().flatten().collect();
            truncate_to_cap(policy.name(), &mut trades, policy.max_trades());
            trades
        }
    }
}

/// Validate `config`, load the table at `input` and run the engine.
pub fn run_from_path(input: &Path, config: &EngineConfig) -> Result<EngineRun, RunError> {
    config.validate()?;
    let rows = load_prediction_rows(input, &config.input)?;
    Ok(run_engine(rows, config))
}
