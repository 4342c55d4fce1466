//! Plain-text run report.

use crate::metrics::TradeSummary;
use crate::runner::EngineRun;

/// Human-readable summary of a run: per-policy counts, overall
/// statistics, per-policy performance and a final verdict.
pub fn render_report(run: &EngineRun) -> String {
    let mut report = format!(
        "Loaded {} rows across {} pairs\n\n",
        run.row_count, run.pair_count
    );

    for (i, p) in run.policy_trades.iter().enumerate() {
        report.push_str(&format!(
            "{}. {}: {} trades\n",
            i + 1,
            p.policy,
            p.trades.len()
        ));
    }
    report.push_str(&format!("\nTotal trades generated: {}\n", run.trades.len()));

    match &run.summary {
        Some(summary) => report.push_str(&render_summary(summary)),
        None => report.push_str("\nNo trades generated.\n"),
    }
    report
}

fn render_summary(s: &TradeSummary) -> String {
    let mut out = format!(
        "\nFinal Strategy Results:\n\
Total return: {:.4} ({:+.2}%)\n\
Average return per trade: {:.4} ({:+.2}%)\n\
Win rate: {:.1}%\n",
        s.total_return,
        s.total_return * 100.0,
        s.average_return,
        s.average_return * 100.0,
        s.win_rate * 100.0,
    );

    if let (Some(avg), Some(best)) = (s.average_winner, s.best_trade) {
        out.push_str(&format!("Average winning trade: {:+.2}%\n", avg * 100.0));
        out.push_str(&format!("Best trade: {:+.2}%\n", best * 100.0));
    }
    if let (Some(avg), Some(worst)) = (s.average_loser, s.worst_trade) {
        out.push_str(&format!("Average losing trade: {:+.2}%\n", avg * 100.0));
        out.push_str(&format!("Worst trade: {:+.2}%\n", worst * 100.0));
    }
    out.push_str(&format!("Total trades: {}\n", s.trade_count));

    out.push_str("\nStrategy performance:\n");
    for b in &s.by_policy {
        out.push_str(&format!(
            "  {}: {} trades, {:+.2}% return, {:.1}% win rate\n",
            b.policy,
            b.trade_count,
            b.total_return * 100.0,
            b.win_rate * 100.0
        ));
    }

    if s.total_return > 0.0 {
        out.push_str(&format!(
            "\nSuccess: Generated positive returns of {:+.2}%\n",
            s.total_return * 100.0
        ));
    } else {
        out.push_str(&format!(
            "\nResult: Negative returns of {:+.2}%\n",
            s.total_return * 100.0
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::summarize;
    use crate::runner::PolicyTrades;
    use predlab_core::domain::{PolicyName, TradeRecord};

    fn run_with(trades: Vec<TradeRecord>) -> EngineRun {
        EngineRun {
            row_count: 100,
            pair_count: 2,
            policy_trades: vec![PolicyTrades {
                policy: PolicyName::UltraSelective,
                trades: trades.clone(),
            }],
            summary: summarize(&trades),
            trades,
        }
    }

    #[test]
    fn report_lists_statistics() {
        let report = run_with(vec![
            TradeRecord::long("EURUSD", 0, 10, PolicyName::UltraSelective, 0.02),
            TradeRecord::long("EURUSD", 20, 30, PolicyName::UltraSelective, -0.01),
        ]);
        let text = render_report(&report);
        assert!(text.contains("Loaded 100 rows across 2 pairs"));
        assert!(text.contains("1. UltraSelective: 2 trades"));
        assert!(text.contains("Total return: 0.0100 (+1.00%)"));
        assert!(text.contains("Win rate: 50.0%"));
        assert!(text.contains("Best trade: +2.00%"));
        assert!(text.contains("Worst trade: -1.00%"));
        assert!(text.contains("  UltraSelective: 2 trades, +1.00% return, 50.0% win rate"));
        assert!(text.contains("Success: Generated positive returns of +1.00%"));
    }

    #[test]
    fn report_handles_no_trades() {
        let text = render_report(&run_with(Vec::new()));
        assert!(text.contains("Total trades generated: 0"));
        assert!(text.contains("No trades generated."));
        assert!(!text.contains("Win rate"));
    }

    #[test]
    fn report_flags_negative_total() {
        let text = render_report(&run_with(vec![TradeRecord::long(
            "EURUSD",
            0,
            10,
            PolicyName::UltraSelective,
            -0.003,
        )]));
        assert!(text.contains("Result: Negative returns of -0.30%"));
        assert!(!text.contains("Best trade"));
    }
}
