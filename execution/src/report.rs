//! Labelled histograms and bankroll progression for a finished batch.

use crate::statistics::{average_progression, histogram};
use martingale_types::{
    BatchReport, BatchSummary, HistogramBin, DRAWDOWN_BINS, PROFIT_BINS, SHARPE_BINS,
    WIN_RATE_BINS,
};

/// Bin `xs` over `[range_min, range_max]` and label each bin with `label(lower, upper)`.
pub fn labelled_histogram<L>(
    xs: &[f64],
    bin_count: usize,
    range_min: f64,
    range_max: f64,
    label: L,
) -> Vec<HistogramBin>
where
    L: Fn(f64, f64) -> String,
{
    let width = if bin_count == 0 {
        0.0
    } else {
        (range_max - range_min) / bin_count as f64
    };
    histogram(xs, bin_count, range_min, range_max)
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let lower = range_min + i as f64 * width;
            let upper = range_min + (i + 1) as f64 * width;
            HistogramBin {
                range: label(lower, upper),
                lower,
                upper,
                count,
            }
        })
        .collect()
}

fn percent_range(lower: f64, upper: f64) -> String {
    format!("{:.0}-{:.0}%", lower * 100.0, upper * 100.0)
}

pub fn win_rate_histogram(summary: &BatchSummary) -> Vec<HistogramBin> {
    labelled_histogram(&summary.win_rates, WIN_RATE_BINS, 0.0, 1.0, percent_range)
}

pub fn profit_histogram(summary: &BatchSummary) -> Vec<HistogramBin> {
    labelled_histogram(
        &summary.profits,
        PROFIT_BINS,
        summary.min_profit,
        summary.max_profit,
        |lower, _| format!("${lower:.0}"),
    )
}

pub fn drawdown_histogram(summary: &BatchSummary) -> Vec<HistogramBin> {
    labelled_histogram(
        &summary.max_drawdowns,
        DRAWDOWN_BINS,
        0.0,
        summary.max_max_drawdown,
        percent_range,
    )
}

pub fn sharpe_histogram(summary: &BatchSummary) -> Vec<HistogramBin> {
    labelled_histogram(
        &summary.sharpe_ratios,
        SHARPE_BINS,
        summary.min_sharpe_ratio,
        summary.max_sharpe_ratio,
        |lower, _| format!("{lower:.2}"),
    )
}

/// Bundle a summary with every derived view.
pub fn build_report(summary: BatchSummary) -> BatchReport {
    BatchReport {
        win_rate_histogram: win_rate_histogram(&summary),
        profit_histogram: profit_histogram(&summary),
        drawdown_histogram: drawdown_histogram(&summary),
        sharpe_histogram: sharpe_histogram(&summary),
        progression: average_progression(&summary.results),
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::summarize;
    use martingale_types::SimulationResult;

    fn result(profit: f64, win_rate: f64, max_drawdown: f64, sharpe: f64) -> SimulationResult {
        SimulationResult {
            bankroll_history: vec![1000.0, 1000.0 + profit],
            final_bankroll: 1000.0 + profit,
            profit,
            win_count: 0,
            loss_count: 0,
            win_rate,
            max_drawdown,
            peak_bankroll: 1000.0_f64.max(1000.0 + profit),
            bet_amounts_used: vec![],
            sharpe_ratio: sharpe,
        }
    }

    fn summary() -> BatchSummary {
        summarize(vec![
            result(-200.0, 0.26, 0.3, -1.5),
            result(0.0, 0.51, 0.0, 0.0),
            result(200.0, 1.0, 0.1, 1.5),
        ])
        .unwrap()
    }

    #[test]
    fn test_win_rate_bins() {
        let bins = win_rate_histogram(&summary());
        assert_eq!(bins.len(), WIN_RATE_BINS);
        assert_eq!(bins[0].range, "0-5%");
        assert_eq!(bins[19].range, "95-100%");
        assert_eq!(bins[5].count, 1);
        assert_eq!(bins[10].count, 1);
        // A perfect win rate lands in the last bin
        assert_eq!(bins[19].count, 1);
    }

    #[test]
    fn test_profit_bins_span_min_to_max() {
        let bins = profit_histogram(&summary());
        assert_eq!(bins.len(), PROFIT_BINS);
        assert_eq!(bins[0].range, "$-200");
        assert_eq!(bins[0].lower, -200.0);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[10].count, 1);
        assert_eq!(bins[19].count, 1);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_drawdown_and_sharpe_bins() {
        let summary = summary();
        let drawdown = drawdown_histogram(&summary);
        assert_eq!(drawdown.len(), DRAWDOWN_BINS);
        assert_eq!(drawdown.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_eq!(drawdown[0].count, 1);
        assert_eq!(drawdown[14].count, 1);

        let sharpe = sharpe_histogram(&summary);
        assert_eq!(sharpe.len(), SHARPE_BINS);
        assert_eq!(sharpe[0].range, "-1.50");
        assert_eq!(sharpe.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_degenerate_ranges_do_not_divide_by_zero() {
        let summary = summarize(vec![result(0.0, 0.0, 0.0, 0.0), result(0.0, 0.0, 0.0, 0.0)]).unwrap();
        let report = build_report(summary);
        assert_eq!(report.profit_histogram[0].count, 2);
        assert_eq!(report.drawdown_histogram[0].count, 2);
        assert_eq!(report.sharpe_histogram[0].count, 2);
        for bin in report
            .profit_histogram
            .iter()
            .chain(&report.drawdown_histogram)
            .chain(&report.sharpe_histogram)
        {
            assert!(bin.lower.is_finite() && bin.upper.is_finite());
        }
    }

    #[test]
    fn test_report_progression() {
        let report = build_report(summary());
        assert_eq!(report.progression.len(), 2);
        assert_eq!(report.progression[0].avg, 1000.0);
        assert_eq!(report.progression[1].avg, 1000.0);
        assert_eq!(report.progression[1].p25, 900.0);
        assert_eq!(report.progression[1].p75, 1100.0);
        assert_eq!(report.summary.num_simulations, 3);
    }

    #[test]
    fn test_report_json_shape() {
        let json = serde_json::to_value(build_report(summary())).expect("serialize");
        assert!(json["winRateHistogram"].is_array());
        assert!(json["drawdownHistogram"].is_array());
        let avg_drawdown = json["summary"]["avgMaxDrawdown"].as_f64().expect("number");
        assert!((avg_drawdown - 0.4 / 3.0).abs() < 1e-12);
        assert_eq!(json["summary"]["positiveProfitRate"], 1.0 / 3.0);
        assert_eq!(json["summary"]["cancelled"], false);
        assert!(json["summary"]["seed"].is_null());
        assert_eq!(json["progression"][1]["p25"], 900.0);
    }
}
