//! Momentum-scalping policy — fixed-horizon entries on momentum + signal.
//!
//! Stateless forward scan over `warmup .. len - tail`. Each qualifying row
//! opens a trade that exits `hold_steps` rows later. Scanning stops for
//! good once the running total across pairs reaches the cap.

use serde::{Deserialize, Serialize};

use super::{limit_reached, push_trade, CapStyle, TradePolicy};
use crate::domain::{PairSeries, PolicyName, TradeRecord};
use crate::indicators::clip;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumScalpingParams {
    /// First scanned index.
    pub warmup: usize,
    /// Rows left unscanned at the end of the series.
    pub tail: usize,
    pub hold_steps: usize,
    pub entry_threshold: f64,
    pub momentum_threshold: f64,
    pub return_multiplier: f64,
    pub return_floor: f64,
    pub return_cap: f64,
    /// Trades at or below this estimated return are not emitted.
    pub min_return: f64,
    pub max_trades: usize,
}

impl Default for MomentumScalpingParams {
    fn default() -> Self {
        Self {
            warmup: 10,
            tail: 5,
            hold_steps: 3,
            entry_threshold: 0.002,
            momentum_threshold: 0.001,
            return_multiplier: 1.5,
            return_floor: -0.005,
            return_cap: 0.02,
            min_return: -0.002,
            max_trades: 20,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MomentumScalping {
    pub params: MomentumScalpingParams,
}

impl MomentumScalping {
    pub fn new(params: MomentumScalpingParams) -> Self {
        Self { params }
    }

    pub fn estimated_return(&self, momentum: f64, fee_rate: f64) -> f64 {
        let p = &self.params;
        clip(
            momentum * p.return_multiplier - fee_rate * 2.0,
            p.return_floor,
            p.return_cap,
        )
    }
}

impl TradePolicy for MomentumScalping {
    fn name(&self) -> PolicyName {
        PolicyName::MomentumScalping
    }

    fn max_trades(&self) -> usize {
        self.params.max_trades
    }

    fn cap_style(&self) -> CapStyle {
        CapStyle::StopWhenFull
    }

    fn scan_pair(
        &self,
        series: &PairSeries,
        fee_rate: f64,
        out: &mut Vec<TradeRecord>,
        limit: Option<usize>,
    ) {
        let p = &self.params;
        let rows = series.rows();

        for i in p.warmup..rows.len().saturating_sub(p.tail) {
            let row = &rows[i];
            let Some(momentum) = row.momentum else {
                continue;
            };
            if !(row.entry_signal > p.entry_threshold && momentum > p.momentum_threshold) {
                continue;
            }
            let Some(exit_time) = series.time_at(i + p.hold_steps) else {
                break;
            };

            let estimated_return = self.estimated_return(momentum, fee_rate);
            if estimated_return > p.min_return {
                push_trade(
                    out,
                    TradeRecord::long(
                        series.pair_id(),
                        row.minutes_since_start,
                        exit_time,
                        self.name(),
                        estimated_return,
                    ),
                );
            }
            if limit_reached(out, limit) {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};
    use crate::policy::fixtures::{quiet, series};
    use crate::policy::DEFAULT_FEE_RATE;

    const HOT: (f64, f64, Option<f64>) = (0.004, 0.01, Some(0.003));

    fn scan(fields: &[(f64, f64, Option<f64>)]) -> Vec<TradeRecord> {
        let mut out = Vec::new();
        MomentumScalping::default().scan_pair(
            &series("EURUSD", 5, fields),
            DEFAULT_FEE_RATE,
            &mut out,
            None,
        );
        out
    }

    #[test]
    fn emits_fixed_three_step_trade() {
        let mut fields = quiet(20);
        fields[12] = HOT;
        let trades = scan(&fields);
        assert_eq!(trades.len(), 1);
        let t = &trades[0];
        assert_eq!((t.enter_time, t.exit_time), (60, 75));
        assert_eq!(t.policy, PolicyName::MomentumScalping);
        // 0.003 * 1.5 - 0.003
        assert_approx(t.estimated_return, 0.0015, DEFAULT_EPSILON);
    }

    #[test]
    fn scan_bounds_are_warmup_to_len_minus_six() {
        let fields = vec![HOT; 20];
        let trades = scan(&fields);
        let enters: Vec<i64> = trades.iter().map(|t| t.enter_time / 5).collect();
        assert_eq!(enters, (10..=14).collect::<Vec<i64>>());
        assert!(trades.iter().all(|t| t.exit_time / 5 <= 17));
    }

    #[test]
    fn short_series_yields_nothing() {
        assert!(scan(&vec![HOT; 15]).is_empty());
        assert!(scan(&vec![HOT; 3]).is_empty());
        assert!(scan(&[]).is_empty());
    }

    #[test]
    fn missing_momentum_is_skipped() {
        let mut fields = quiet(20);
        fields[11] = (0.004, 0.01, None);
        assert!(scan(&fields).is_empty());
    }

    #[test]
    fn return_filter_drops_heavy_losers() {
        let policy = MomentumScalping::default();
        // 0.0011 * 1.5 - 0.003 = -0.00135 -> kept
        assert!(policy.estimated_return(0.0011, DEFAULT_FEE_RATE) > -0.002);
        let mut fields = quiet(20);
        fields[10] = (0.004, 0.01, Some(0.0011));
        assert_eq!(scan(&fields).len(), 1);
        // A policy with a stricter filter drops it.
        let strict = MomentumScalping::new(MomentumScalpingParams {
            min_return: 0.0,
            ..Default::default()
        });
        let mut out = Vec::new();
        strict.scan_pair(&series("EURUSD", 5, &fields), DEFAULT_FEE_RATE, &mut out, None);
        assert!(out.is_empty());
    }

    #[test]
    fn return_is_clipped() {
        let policy = MomentumScalping::default();
        assert_eq!(policy.estimated_return(1.0, DEFAULT_FEE_RATE), 0.02);
        assert_eq!(policy.estimated_return(-1.0, DEFAULT_FEE_RATE), -0.005);
    }

    #[test]
    fn run_stops_for_good_at_cap() {
        // 5 qualifying rows per pair; cap 20 is reached inside the 4th pair.
        let fields = vec![HOT; 20];
        let all: Vec<PairSeries> = (0..6).map(|p| series(&format!("P{p}"), 5, &fields)).collect();
        let trades = MomentumScalping::default().run(&all, DEFAULT_FEE_RATE);
        assert_eq!(trades.len(), 20);
        assert_eq!(trades.last().unwrap().pair_id, "P3");
        assert!(trades.iter().all(|t| t.pair_id != "P4" && t.pair_id != "P5"));
    }
}
