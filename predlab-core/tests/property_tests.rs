//! Property tests for decision-engine invariants.
//!
//! Uses proptest to verify:
//! 1. Momentum is absent for the first four rows of each pair and a
//!    five-row trailing mean afterwards
//! 2. Every emitted trade exits strictly after it enters
//! 3. Returns stay inside each policy's clip range and filter threshold
//! 4. Caps bound each policy's list

use proptest::prelude::*;
use predlab_core::domain::{PairSeries, PolicyName, PredictionRow, TradeRecord};
use predlab_core::policy::{
    default_policies, MomentumScalping, SafeArbitrage, TradePolicy, UltraSelective,
    DEFAULT_FEE_RATE,
};
use predlab_core::signal::SignalDeriver;

// ── Strategies (proptest) ────────────────────────────────────────────

/// Scores centered near the policies' thresholds, negative-leaning so
/// entry signals are often positive.
fn arb_score() -> impl Strategy<Value = f64> {
    -0.008..0.003_f64
}

/// Rows for up to three pairs, in reverse time order and interleaved.
fn arb_rows() -> impl Strategy<Value = Vec<PredictionRow>> {
    prop::collection::vec((0usize..3, prop::array::uniform9(arb_score())), 0..240).prop_map(
        |items| {
            let n = items.len() as i64;
            items
                .into_iter()
                .enumerate()
                .map(|(i, (pair, predictions))| {
                    PredictionRow::new(format!("PAIR{pair}"), (n - i as i64) * 5, predictions)
                })
                .collect()
        },
    )
}

fn derive(rows: Vec<PredictionRow>) -> Vec<PairSeries> {
    SignalDeriver::default().derive(rows)
}

fn all_trades(series: &[PairSeries]) -> Vec<TradeRecord> {
    default_policies()
        .iter()
        .flat_map(|p| p.run(series, DEFAULT_FEE_RATE))
        .collect()
}

// ── 1. Momentum definedness ──────────────────────────────────────────

proptest! {
    #[test]
    fn momentum_defined_from_fifth_row(rows in arb_rows()) {
        for s in derive(rows) {
            let rs = s.rows();
            for (i, row) in rs.iter().enumerate() {
                match row.momentum {
                    None => prop_assert!(i < 4),
                    Some(m) => {
                        prop_assert!(i >= 4);
                        let expected = rs[i - 4..=i].iter().map(|r| r.entry_signal).sum::<f64>() / 5.0;
                        prop_assert!((m - expected).abs() < 1e-12);
                    }
                }
            }
        }
    }

    #[test]
    fn series_are_time_ordered(rows in arb_rows()) {
        for s in derive(rows) {
            prop_assert!(s.rows().windows(2).all(|w| w[0].minutes_since_start < w[1].minutes_since_start));
            prop_assert!(s.rows().iter().all(|r| r.pair_id == s.pair_id()));
        }
    }
}

// ── 2. Trade ordering and naming ─────────────────────────────────────

proptest! {
    #[test]
    fn trades_exit_after_entry(rows in arb_rows()) {
        for t in all_trades(&derive(rows)) {
            prop_assert!(t.enter_time < t.exit_time);
            prop_assert!(PolicyName::ALL.contains(&t.policy));
            prop_assert_eq!(t.direction, 1);
            prop_assert_eq!(t.size_fraction, 1.0);
        }
    }
}

// ── 3. Return bounds ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn returns_respect_policy_bounds(rows in arb_rows()) {
        let series = derive(rows);

        for t in UltraSelective::default().run(&series, DEFAULT_FEE_RATE) {
            prop_assert!((-0.01..=0.04).contains(&t.estimated_return));
        }
        for t in MomentumScalping::default().run(&series, DEFAULT_FEE_RATE) {
            prop_assert!(t.estimated_return > -0.002 && t.estimated_return <= 0.02);
        }
        for t in SafeArbitrage::default().run(&series, DEFAULT_FEE_RATE) {
            prop_assert!(t.estimated_return > -0.001 && t.estimated_return <= 0.015);
        }
    }

    #[test]
    fn ultra_selective_return_follows_entry_signal(rows in arb_rows()) {
        let series = derive(rows);
        for t in UltraSelective::default().run(&series, DEFAULT_FEE_RATE) {
            let s = series.iter().find(|s| s.pair_id() == t.pair_id).unwrap();
            let entry = s.rows().iter().find(|r| r.minutes_since_start == t.enter_time).unwrap();
            let expected = (entry.entry_signal * 1.2 - 0.003).clamp(-0.01, 0.04);
            prop_assert_eq!(t.estimated_return, expected);
        }
    }
}

// ── 4. Caps ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn caps_bound_every_policy(rows in arb_rows()) {
        let series = derive(rows);
        for policy in default_policies() {
            prop_assert!(policy.run(&series, DEFAULT_FEE_RATE).len() <= policy.max_trades());
        }
    }
}
