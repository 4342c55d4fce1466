//! Safe-arbitrage policy — fixed-horizon entries on a stable signal.
//!
//! Like momentum scalping but gated on low volatility and on the sample
//! standard deviation of the entry signal over the rows strictly before
//! the candidate (its "stability"). A steadier signal earns a larger
//! return multiplier, bounded by `max_stability_bonus`.

use serde::{Deserialize, Serialize};

use super::{limit_reached, push_trade, CapStyle, TradePolicy};
use crate::domain::{PairSeries, PolicyName, TradeRecord};
use crate::indicators::{clip, sample_std_dev};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeArbitrageParams {
    pub warmup: usize,
    pub tail: usize,
    pub hold_steps: usize,
    pub stability_window: usize,
    pub entry_threshold: f64,
    pub max_volatility: f64,
    pub max_stability: f64,
    /// Added to the stability before inverting it.
    pub stability_epsilon: f64,
    pub max_stability_bonus: f64,
    pub return_multiplier: f64,
    pub return_floor: f64,
    pub return_cap: f64,
    pub min_return: f64,
    pub max_trades: usize,
}

impl Default for SafeArbitrageParams {
    fn default() -> Self {
        Self {
            warmup: 20,
            tail: 10,
            hold_steps: 6,
            stability_window: 5,
            entry_threshold: 0.0015,
            max_volatility: 0.001,
            max_stability: 0.0005,
            stability_epsilon: 0.0001,
            max_stability_bonus: 2.0,
            return_multiplier: 0.8,
            return_floor: -0.003,
            return_cap: 0.015,
            min_return: -0.001,
            max_trades: 15,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SafeArbitrage {
    pub params: SafeArbitrageParams,
}

impl SafeArbitrage {
    pub fn new(params: SafeArbitrageParams) -> Self {
        Self { params }
    }

    pub fn stability_bonus(&self, stability: f64) -> f64 {
        let p = &self.params;
        (1.0 / (stability + p.stability_epsilon)).min(p.max_stability_bonus)
    }

    pub fn estimated_return(&self, entry_signal: f64, stability: f64, fee_rate: f64) -> f64 {
        let p = &self.params;
        clip(
            entry_signal * p.return_multiplier * self.stability_bonus(stability) - fee_rate * 2.0,
            p.return_floor,
            p.return_cap,
        )
    }

    /// Sample std of the entry signal over the `stability_window` rows
    /// before `index`.
    fn stability_at(&self, series: &PairSeries, index: usize) -> Option<f64> {
        let start = index.checked_sub(self.params.stability_window)?;
        let window: Vec<f64> = series.rows()[start..index]
            .iter()
            .map(|r| r.entry_signal)
            .collect();
        sample_std_dev(&window)
    }
}

impl TradePolicy for SafeArbitrage {
    fn name(&self) -> PolicyName {
        PolicyName::SafeArbitrage
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
            let Some(stability) = self.stability_at(series, i) else {
                continue;
            };
            if !(row.entry_signal > p.entry_threshold
                && row.volatility < p.max_volatility
                && stability < p.max_stability)
            {
                continue;
            }
            let Some(exit_time) = series.time_at(i + p.hold_steps) else {
                break;
            };

            let estimated_return = self.estimated_return(row.entry_signal, stability, fee_rate);
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

    const STEADY: (f64, f64, Option<f64>) = (0.002, 0.0005, None);

    fn scan(fields: &[(f64, f64, Option<f64>)]) -> Vec<TradeRecord> {
        let mut out = Vec::new();
        SafeArbitrage::default().scan_pair(
            &series("USDCHF", 1, fields),
            DEFAULT_FEE_RATE,
            &mut out,
            None,
        );
        out
    }

    #[test]
    fn constant_window_gives_max_bonus_and_small_positive_return() {
        // Rows 15-19 steady at 0.002, row 20 qualifies.
        let mut fields = quiet(40);
        for f in fields.iter_mut().take(21).skip(15) {
            *f = STEADY;
        }
        let trades = scan(&fields);
        assert_eq!(trades.len(), 1);
        let t = &trades[0];
        assert_eq!((t.enter_time, t.exit_time), (20, 26));
        assert_eq!(SafeArbitrage::default().stability_bonus(0.0), 2.0);
        // clip(0.002 * 0.8 * 2 - 0.003) = 0.0002 > -0.001, so emitted
        assert_approx(t.estimated_return, 0.0002, DEFAULT_EPSILON);
    }

    #[test]
    fn twenty_five_rows_leave_an_empty_scan_range() {
        let mut fields = quiet(25);
        for f in fields.iter_mut().skip(14).take(6) {
            *f = STEADY;
        }
        assert!(scan(&fields).is_empty());
    }

    #[test]
    fn scan_bounds_are_warmup_to_len_minus_eleven() {
        let fields = vec![STEADY; 40];
        let trades = scan(&fields);
        let enters: Vec<i64> = trades.iter().map(|t| t.enter_time).collect();
        assert_eq!(enters, (20..=29).collect::<Vec<i64>>());
    }

    #[test]
    fn unstable_history_blocks_entry() {
        let mut fields = quiet(40);
        fields[20] = STEADY;
        // Window 15..20 holds 0.0 and 0.002 alternating -> std > 0.0005
        for (k, f) in fields.iter_mut().enumerate().take(20).skip(15) {
            *f = if k % 2 == 0 { STEADY } else { (0.0, 0.0005, None) };
        }
        assert!(scan(&fields).is_empty());
    }

    #[test]
    fn stability_excludes_current_row() {
        let mut fields = quiet(40);
        for f in fields.iter_mut().take(20).skip(15) {
            *f = STEADY;
        }
        // Current row differs from its history; stability is still zero.
        fields[20] = (0.004, 0.0005, None);
        let trades = scan(&fields);
        assert_eq!(trades.len(), 1);
        // 0.004 * 0.8 * 2 - 0.003 = 0.0034
        assert_approx(trades[0].estimated_return, 0.0034, DEFAULT_EPSILON);
    }

    #[test]
    fn volatility_gate_is_strict() {
        let mut fields = vec![STEADY; 40];
        for f in fields.iter_mut() {
            f.1 = 0.001;
        }
        assert!(scan(&fields).is_empty());
    }

    #[test]
    fn bonus_uses_epsilon_guard() {
        let policy = SafeArbitrage::default();
        // 1 / (0.0004 + 0.0001) = 2000 -> capped at 2
        assert_eq!(policy.stability_bonus(0.0004), 2.0);
        assert!(policy.stability_bonus(0.0).is_finite());
    }

    #[test]
    fn return_is_clipped() {
        let policy = SafeArbitrage::default();
        assert_eq!(policy.estimated_return(1.0, 0.0, DEFAULT_FEE_RATE), 0.015);
        assert_eq!(policy.estimated_return(-1.0, 0.0, DEFAULT_FEE_RATE), -0.003);
    }

    #[test]
    fn run_stops_for_good_at_cap() {
        let fields = vec![STEADY; 40];
        let all: Vec<PairSeries> = (0..4).map(|p| series(&format!("P{p}"), 1, &fields)).collect();
        let trades = SafeArbitrage::default().run(&all, DEFAULT_FEE_RATE);
        assert_eq!(trades.len(), 15);
        assert_eq!(trades.iter().filter(|t| t.pair_id == "P0").count(), 10);
        assert_eq!(trades.iter().filter(|t| t.pair_id == "P1").count(), 5);
        assert!(trades.iter().all(|t| t.pair_id == "P0" || t.pair_id == "P1"));
    }
}
