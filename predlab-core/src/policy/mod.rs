//! Trade policies — scan ordered pair series and emit trade records.
//!
//! Policies see only derived rows and the fee rate; they hold no state
//! across pairs. The only cross-pair coupling is the trade cap, whose
//! enforcement style is part of each policy's observable behavior:
//! - `TruncateAfterScan`: every pair is scanned, then the list is cut.
//! - `StopWhenFull`: scanning ends the moment the running total hits the cap.
//!
//! Both styles keep the first `max_trades` trades in scan order.

pub mod momentum_scalping;
pub mod safe_arbitrage;
pub mod ultra_selective;

pub use momentum_scalping::{MomentumScalping, MomentumScalpingParams};
pub use safe_arbitrage::{SafeArbitrage, SafeArbitrageParams};
pub use ultra_selective::{UltraSelective, UltraSelectiveParams};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{PairSeries, PolicyName, TradeRecord};

/// Flat per-side transaction cost.
pub const DEFAULT_FEE_RATE: f64 = 0.0015;

/// How a policy's global trade cap is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapStyle {
    TruncateAfterScan,
    StopWhenFull,
}

/// Trait for trade-generation policies.
pub trait TradePolicy: Send + Sync {
    fn name(&self) -> PolicyName;

    /// Global cap on the number of trades this policy returns.
    fn max_trades(&self) -> usize;

    fn cap_style(&self) -> CapStyle;

    /// Scan one pair in time order, appending trades to `out`.
    ///
    /// With `limit = Some(n)` the scan returns as soon as `out` holds `n`
    /// trades; `out` may already contain trades from earlier pairs.
    fn scan_pair(
        &self,
        series: &PairSeries,
        fee_rate: f64,
        out: &mut Vec<TradeRecord>,
        limit: Option<usize>,
    );

    /// Scan all pairs in order and apply the cap in this policy's style.
    fn run(&self, series: &[PairSeries], fee_rate: f64) -> Vec<TradeRecord> {
        let cap = self.max_trades();
        let mut trades = Vec::new();
        match self.cap_style() {
            CapStyle::TruncateAfterScan => {
                for s in series {
                    self.scan_pair(s, fee_rate, &mut trades, None);
                }
                truncate_to_cap(self.name(), &mut trades, cap);
            }
            CapStyle::StopWhenFull => {
                for s in series {
                    if trades.len() >= cap {
                        debug!(policy = %self.name(), cap, "trade cap reached, scan stopped");
                        break;
                    }
                    self.scan_pair(s, fee_rate, &mut trades, Some(cap));
                }
            }
        }
        trades
    }
}

/// Cut `trades` to `cap`, logging when anything is discarded.
pub fn truncate_to_cap(policy: PolicyName, trades: &mut Vec<TradeRecord>, cap: usize) {
    if trades.len() > cap {
        warn!(
            policy = %policy,
            found = trades.len(),
            cap,
            "trade list truncated to cap"
        );
        trades.truncate(cap);
    }
}

pub(crate) fn limit_reached(out: &[TradeRecord], limit: Option<usize>) -> bool {
    limit.is_some_and(|l| out.len() >= l)
}

/// Append a trade if its exit is strictly after its entry.
///
/// Only duplicate timestamps within a pair can break the ordering; such
/// trades are dropped.
pub(crate) fn push_trade(out: &mut Vec<TradeRecord>, trade: TradeRecord) {
    if trade.exit_time > trade.enter_time {
        out.push(trade);
    } else {
        warn!(
            pair = %trade.pair_id,
            policy = %trade.policy,
            enter_time = trade.enter_time,
            exit_time = trade.exit_time,
            "trade without positive holding time dropped"
        );
    }
}

/// Build the default set of policies in canonical order.
pub fn default_policies() -> Vec<Box<dyn TradePolicy>> {
    vec![
        Box::new(UltraSelective::default()),
        Box::new(MomentumScalping::default()),
        Box::new(SafeArbitrage::default()),
    ]
}

/// Test fixtures shared by the policy modules.
#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{PairSeries, Row, PREDICTION_COUNT};

    /// Row with explicit derived fields.
    pub fn row(pair: &str, time: i64, entry_signal: f64, volatility: f64, momentum: Option<f64>) -> Row {
        Row {
            pair_id: pair.to_string(),
            minutes_since_start: time,
            predictions: [-entry_signal; PREDICTION_COUNT],
            signal: -entry_signal,
            entry_signal,
            volatility,
            momentum,
        }
    }

    /// Series with rows every `step` minutes from explicit
    /// `(entry_signal, volatility, momentum)` triples.
    pub fn series(pair: &str, step: i64, fields: &[(f64, f64, Option<f64>)]) -> PairSeries {
        let rows = fields
            .iter()
            .enumerate()
            .map(|(i, &(s, v, m))| row(pair, i as i64 * step, s, v, m))
            .collect();
        PairSeries::new(pair, rows)
    }

    /// `n` quiet rows that never trigger any policy.
    pub fn quiet(n: usize) -> Vec<(f64, f64, Option<f64>)> {
        vec![(0.0, 0.01, Some(0.0)); n]
    }
}
