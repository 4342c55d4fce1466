//! Trade aggregation — pure functions that summarize a trade list.
//!
//! Every statistic skips trades whose estimated return is undefined (NaN).
//! Empty inputs short-circuit instead of dividing by zero: `summarize`
//! returns `None` ("no trades") and the helpers return 0.0 or `None`.

use std::collections::BTreeMap;

use predlab_core::domain::{PolicyName, TradeRecord};
use serde::{Deserialize, Serialize};

/// Per-policy slice of a `TradeSummary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyBreakdown {
    pub policy: PolicyName,
    pub trade_count: usize,
    pub total_return: f64,
    pub win_rate: f64,
}

/// Summary statistics over a combined trade list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub trade_count: usize,
    pub total_return: f64,
    pub average_return: f64,
    pub win_rate: f64,
    pub average_winner: Option<f64>,
    pub best_trade: Option<f64>,
    pub average_loser: Option<f64>,
    pub worst_trade: Option<f64>,
    /// Ordered by trade count descending, ties in canonical policy order.
    pub by_policy: Vec<PolicyBreakdown>,
}

/// Summarize `trades`, or `None` when no trade has a defined return.
pub fn summarize(trades: &[TradeRecord]) -> Option<TradeSummary> {
    let returns = defined_returns(trades);
    if returns.is_empty() {
        return None;
    }

    let winners: Vec<f64> = returns.iter().copied().filter(|r| *r > 0.0).collect();
    let losers: Vec<f64> = returns.iter().copied().filter(|r| *r <= 0.0).collect();

    Some(TradeSummary {
        trade_count: trades.len(),
        total_return: total_return(&returns),
        average_return: average(&returns)?,
        win_rate: win_rate(&returns),
        average_winner: average(&winners),
        best_trade: max_value(&winners),
        average_loser: average(&losers),
        worst_trade: min_value(&losers),
        by_policy: policy_breakdown(trades),
    })
}

/// Per-policy trade count, subtotal and win rate.
pub fn policy_breakdown(trades: &[TradeRecord]) -> Vec<PolicyBreakdown> {
    let mut groups: BTreeMap<PolicyName, Vec<&TradeRecord>> = BTreeMap::new();
    for trade in trades {
        groups.entry(trade.policy).or_default().push(trade);
    }

    let mut breakdown: Vec<PolicyBreakdown> = groups
        .into_iter()
        .map(|(policy, group)| {
            let returns: Vec<f64> = group
                .iter()
                .filter(|t| t.has_return())
                .map(|t| t.estimated_return)
                .collect();
            PolicyBreakdown {
                policy,
                trade_count: group.len(),
                total_return: total_return(&returns),
                win_rate: win_rate(&returns),
            }
        })
        .collect();
    // Stable: equal counts keep canonical order from the BTreeMap.
    breakdown.sort_by(|a, b| b.trade_count.cmp(&a.trade_count));
    breakdown
}

// ─── Individual statistics ──────────────────────────────────────────

/// Estimated returns of trades whose return is defined, in list order.
pub fn defined_returns(trades: &[TradeRecord]) -> Vec<f64> {
    trades
        .iter()
        .filter(|t| t.has_return())
        .map(|t| t.estimated_return)
        .collect()
}

pub fn total_return(returns: &[f64]) -> f64 {
    returns.iter().sum()
}

/// Fraction of strictly positive returns; zero counts as non-winning.
pub fn win_rate(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    returns.iter().filter(|r| **r > 0.0).count() as f64 / returns.len() as f64
}

pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn max_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

pub fn min_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}
