//! Ultra-selective policy — one tracked position per pair.
//!
//! Enters on a strong entry signal in a low-volatility row, exits when the
//! signal decays below a fraction of its entry value or the holding time
//! reaches the cap. The return is modeled from the entry signal alone.
//! A position still open when the pair's series ends is dropped without a
//! trade.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{limit_reached, push_trade, CapStyle, TradePolicy};
use crate::domain::{PairSeries, PolicyName, TradeRecord};
use crate::indicators::clip;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UltraSelectiveParams {
    pub entry_threshold: f64,
    pub max_volatility: f64,
    pub decay_ratio: f64,
    pub max_hold_minutes: i64,
    pub return_multiplier: f64,
    pub return_floor: f64,
    pub return_cap: f64,
    pub max_trades: usize,
}

impl Default for UltraSelectiveParams {
    fn default() -> Self {
        Self {
            entry_threshold: 0.003,
            max_volatility: 0.002,
            decay_ratio: 0.7,
            max_hold_minutes: 480,
            return_multiplier: 1.2,
            return_floor: -0.01,
            return_cap: 0.04,
            max_trades: 15,
        }
    }
}

/// Live position state, scoped to one pair's scan.
#[derive(Debug, Clone, Copy)]
struct OpenPosition {
    entry_time: i64,
    entry_signal: f64,
}

#[derive(Debug, Clone, Default)]
pub struct UltraSelective {
    pub params: UltraSelectiveParams,
}

impl UltraSelective {
    pub fn new(params: UltraSelectiveParams) -> Self {
        Self { params }
    }

    /// Modeled return for a position opened at `entry_signal`.
    pub fn estimated_return(&self, entry_signal: f64, fee_rate: f64) -> f64 {
        let p = &self.params;
        clip(
            entry_signal * p.return_multiplier - fee_rate * 2.0,
            p.return_floor,
            p.return_cap,
        )
    }
}

impl TradePolicy for UltraSelective {
    fn name(&self) -> PolicyName {
        PolicyName::UltraSelective
    }

    fn max_trades(&self) -> usize {
        self.params.max_trades
    }

    fn cap_style(&self) -> CapStyle {
        CapStyle::TruncateAfterScan
    }

    fn scan_pair(
        &self,
        series: &PairSeries,
        fee_rate: f64,
        out: &mut Vec<TradeRecord>,
        limit: Option<usize>,
    ) {
        let p = &self.params;
        let mut position: Option<OpenPosition> = None;

        for row in series.rows() {
            let now = row.minutes_since_start;
            match position {
                Some(open) => {
                    let held = now - open.entry_time;
                    if row.entry_signal < open.entry_signal * p.decay_ratio
                        || held >= p.max_hold_minutes
                    {
                        push_trade(
                            out,
                            TradeRecord::long(
                                series.pair_id(),
                                open.entry_time,
                                now,
                                self.name(),
                                self.estimated_return(open.entry_signal, fee_rate),
                            ),
                        );
                        position = None;
                        if limit_reached(out, limit) {
                            return;
                        }
                    }
                }
                // The closing row never reopens.
                None => {
                    if row.entry_signal > p.entry_threshold && row.volatility < p.max_volatility {
                        position = Some(OpenPosition {
                            entry_time: now,
                            entry_signal: row.entry_signal,
                        });
                    }
                }
            }
        }

        if let Some(open) = position {
            debug!(
                pair = %series.pair_id(),
                entry_time = open.entry_time,
                "position open at end of series dropped"
            );
        }
    }
}
