//! Distribution primitives and batch summary assembly.
//!
//! Primitives over an empty slice return `None`; summary assembly only ever
//! feeds them the per-run arrays of a batch with at least one completed run.

use martingale_types::{
    BatchSummary, ProgressionPoint, SimulationResult, PROGRESSION_LOWER_PERCENTILE,
    PROGRESSION_UPPER_PERCENTILE,
};

fn sorted(xs: &[f64]) -> Vec<f64> {
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    Some(xs.iter().sum::<f64>() / xs.len() as f64)
}

pub fn min(xs: &[f64]) -> Option<f64> {
    xs.iter().copied().reduce(f64::min)
}

pub fn max(xs: &[f64]) -> Option<f64> {
    xs.iter().copied().reduce(f64::max)
}

/// Middle element, or the average of the two middle elements for even lengths.
pub fn median(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    let sorted = sorted(xs);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Linearly interpolated percentile, `p` in `[0, 100]`.
///
/// Uses `index = p / 100 * (n - 1)` and blends the neighbours around it.
pub fn percentile(xs: &[f64], p: f64) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    let sorted = sorted(xs);
    let index = p.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    let weight = index.fract();
    Some(sorted[lower] * (1.0 - weight) + sorted[upper] * weight)
}

/// Index of the equal-width bin `x` falls into, if any.
///
/// Values at or above `range_max` land in the last bin. Values below
/// `range_min` and NaN are not binned. A degenerate range (zero width) sends
/// every value to bin 0.
pub fn bin_index(x: f64, bin_count: usize, range_min: f64, range_max: f64) -> Option<usize> {
    if bin_count == 0 || x.is_nan() || x < range_min {
        return None;
    }
    let width = (range_max - range_min) / bin_count as f64;
    if !(width > 0.0 && width.is_finite()) {
        return Some(0);
    }
    let idx = ((x - range_min) / width).floor() as usize;
    Some(idx.min(bin_count - 1))
}

/// Counts of `xs` over `bin_count` equal-width bins on `[range_min, range_max]`.
pub fn histogram(xs: &[f64], bin_count: usize, range_min: f64, range_max: f64) -> Vec<usize> {
    let mut counts = vec![0; bin_count];
    for &x in xs {
        if let Some(idx) = bin_index(x, bin_count, range_min, range_max) {
            counts[idx] += 1;
        }
    }
    counts
}

/// Mean and interquartile band of the bankroll at every round index.
///
/// Histories may have different lengths; each index only uses the runs that
/// reached it.
pub fn average_progression(results: &[SimulationResult]) -> Vec<ProgressionPoint> {
    let max_len = results
        .iter()
        .map(|r| r.bankroll_history.len())
        .max()
        .unwrap_or(0);
    let mut points = Vec::with_capacity(max_len);
    let mut values: Vec<f64> = Vec::with_capacity(results.len());
    for round in 0..max_len {
        values.clear();
        values.extend(
            results
                .iter()
                .filter_map(|r| r.bankroll_history.get(round).copied()),
        );
        let (Some(avg), Some(p25), Some(p75)) = (
            mean(&values),
            percentile(&values, PROGRESSION_LOWER_PERCENTILE),
            percentile(&values, PROGRESSION_UPPER_PERCENTILE),
        ) else {
            continue;
        };
        points.push(ProgressionPoint {
            round,
            avg,
            p25,
            p75,
        });
    }
    points
}

struct Distribution {
    avg: f64,
    median: f64,
    min: f64,
    max: f64,
}

impl Distribution {
    fn of(xs: &[f64]) -> Option<Self> {
        Some(Self {
            avg: mean(xs)?,
            median: median(xs)?,
            min: min(xs)?,
            max: max(xs)?,
        })
    }
}

/// Aggregate completed runs into a summary. Returns `None` for an empty batch.
///
/// Every statistic is order-independent, so runs may be merged in any order.
pub fn summarize(results: Vec<SimulationResult>) -> Option<BatchSummary> {
    let win_rates: Vec<f64> = results.iter().map(|r| r.win_rate).collect();
    let profits: Vec<f64> = results.iter().map(|r| r.profit).collect();
    let max_drawdowns: Vec<f64> = results.iter().map(|r| r.max_drawdown).collect();
    let sharpe_ratios: Vec<f64> = results.iter().map(|r| r.sharpe_ratio).collect();

    let win_rate = Distribution::of(&win_rates)?;
    let profit = Distribution::of(&profits)?;
    let drawdown = Distribution::of(&max_drawdowns)?;
    let sharpe = Distribution::of(&sharpe_ratios)?;
    let positive = profits.iter().filter(|&&p| p > 0.0).count();

    Some(BatchSummary {
        avg_win_rate: win_rate.avg,
        median_win_rate: win_rate.median,
        min_win_rate: win_rate.min,
        max_win_rate: win_rate.max,
        avg_profit: profit.avg,
        median_profit: profit.median,
        min_profit: profit.min,
        max_profit: profit.max,
        positive_profit_rate: positive as f64 / results.len() as f64,
        avg_max_drawdown: drawdown.avg,
        median_max_drawdown: drawdown.median,
        min_max_drawdown: drawdown.min,
        max_max_drawdown: drawdown.max,
        avg_sharpe_ratio: sharpe.avg,
        median_sharpe_ratio: sharpe.median,
        min_sharpe_ratio: sharpe.min,
        max_sharpe_ratio: sharpe.max,
        win_rates,
        profits,
        max_drawdowns,
        sharpe_ratios,
        num_simulations: results.len(),
        cancelled: false,
        seed: None,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn result(history: Vec<f64>, win_rate: f64, max_drawdown: f64, sharpe: f64) -> SimulationResult {
        let initial = history[0];
        let last = *history.last().unwrap();
        SimulationResult {
            peak_bankroll: history.iter().copied().fold(f64::MIN, f64::max),
            bankroll_history: history,
            final_bankroll: last,
            profit: last - initial,
            win_count: 0,
            loss_count: 0,
            win_rate,
            max_drawdown,
            bet_amounts_used: vec![],
            sharpe_ratio: sharpe,
        }
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(mean(&[]), None);
        assert_eq!(min(&[]), None);
        assert_eq!(max(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(percentile(&[], 50.0), None);
        assert!(summarize(vec![]).is_none());
        assert!(average_progression(&[]).is_empty());
    }

    #[test]
    fn test_basic_statistics() {
        let xs = [4.0, -1.0, 7.5, 2.0];
        assert_eq!(mean(&xs), Some(3.125));
        assert_eq!(min(&xs), Some(-1.0));
        assert_eq!(max(&xs), Some(7.5));
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[1.0, 3.0]), Some(2.0));
        assert_eq!(median(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[9.0, 1.0, 4.0, 2.0]), Some(3.0));
        assert_eq!(median(&[5.0]), Some(5.0));
    }

    #[test]
    fn test_percentile() {
        let xs = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(&xs, 50.0), Some(25.0));
        assert_eq!(percentile(&xs, 0.0), Some(10.0));
        assert_eq!(percentile(&xs, 100.0), Some(40.0));
        // index = 0.25 * 3 = 0.75
        assert!((percentile(&xs, 25.0).unwrap() - 17.5).abs() < EPS);
        // Unsorted input
        assert_eq!(percentile(&[40.0, 10.0, 30.0, 20.0], 50.0), Some(25.0));
        // Single element
        assert_eq!(percentile(&[7.0], 75.0), Some(7.0));
    }

    #[test]
    fn test_histogram_clamps_max_into_last_bin() {
        let counts = histogram(&[0.0, 0.5, 0.999, 1.0], 20, 0.0, 1.0);
        assert_eq!(counts.len(), 20);
        assert_eq!(counts[0], 1);
        assert_eq!(counts.iter().sum::<usize>(), 4);
        assert_eq!(bin_index(1.0, 20, 0.0, 1.0), Some(19));
    }

    #[test]
    fn test_histogram_clamps_above_max_into_last_bin() {
        assert_eq!(histogram(&[0.25, 1.5], 4, 0.0, 1.0), vec![0, 1, 0, 1]);
        assert_eq!(bin_index(1.1, 10, 0.0, 1.0), Some(9));
        assert_eq!(bin_index(f64::INFINITY, 10, 0.0, 1.0), Some(9));
    }

    #[test]
    fn test_histogram_out_of_range_and_degenerate() {
        assert_eq!(bin_index(-0.1, 10, 0.0, 1.0), None);
        assert_eq!(bin_index(f64::NAN, 10, 0.0, 1.0), None);
        assert!(histogram(&[1.0], 0, 0.0, 1.0).is_empty());

        // All values identical => zero-width range, everything in bin 0
        let counts = histogram(&[3.0, 3.0, 3.0], 5, 3.0, 3.0);
        assert_eq!(counts, vec![3, 0, 0, 0, 0]);
    }

    #[test]
    fn test_histogram_negative_range() {
        let counts = histogram(&[-100.0, -50.0, 0.0, 50.0, 100.0], 4, -100.0, 100.0);
        assert_eq!(counts, vec![1, 1, 1, 2]);
    }

    #[test]
    fn test_average_progression_ragged() {
        let results = vec![
            result(vec![100.0, 110.0, 120.0], 0.0, 0.0, 0.0),
            result(vec![100.0, 90.0], 0.0, 0.1, 0.0),
            result(vec![100.0], 0.0, 0.0, 0.0),
        ];
        let points = average_progression(&results);
        assert_eq!(points.len(), 3);

        assert_eq!(points[0].round, 0);
        assert_eq!(points[0].avg, 100.0);
        assert_eq!(points[0].p25, 100.0);
        assert_eq!(points[0].p75, 100.0);

        assert_eq!(points[1].round, 1);
        assert_eq!(points[1].avg, 100.0);
        // [90, 110]: index 0.25 and 0.75
        assert_eq!(points[1].p25, 95.0);
        assert_eq!(points[1].p75, 105.0);

        assert_eq!(points[2].round, 2);
        assert_eq!(points[2].avg, 120.0);
    }

    #[test]
    fn test_summarize() {
        let results = vec![
            result(vec![1000.0, 1100.0], 0.6, 0.1, 1.0),
            result(vec![1000.0, 900.0], 0.4, 0.3, -1.0),
            result(vec![1000.0, 1000.0], 0.0, 0.0, 0.0),
            result(vec![1000.0, 1300.0], 0.8, 0.2, 2.0),
        ];
        let summary = summarize(results.clone()).expect("non-empty");

        assert_eq!(summary.num_simulations, 4);
        assert!(!summary.cancelled);
        assert_eq!(summary.results, results);

        assert!((summary.avg_win_rate - 0.45).abs() < EPS);
        assert!((summary.median_win_rate - 0.5).abs() < EPS);
        assert_eq!(summary.min_win_rate, 0.0);
        assert_eq!(summary.max_win_rate, 0.8);

        assert_eq!(summary.profits, vec![100.0, -100.0, 0.0, 300.0]);
        assert_eq!(summary.avg_profit, 75.0);
        assert_eq!(summary.median_profit, 50.0);
        assert_eq!(summary.min_profit, -100.0);
        assert_eq!(summary.max_profit, 300.0);
        // Zero profit does not count as positive
        assert_eq!(summary.positive_profit_rate, 0.5);

        assert!((summary.avg_max_drawdown - 0.15).abs() < EPS);
        assert!((summary.median_max_drawdown - 0.15).abs() < EPS);
        assert_eq!(summary.min_max_drawdown, 0.0);
        assert_eq!(summary.max_max_drawdown, 0.3);

        assert_eq!(summary.avg_sharpe_ratio, 0.5);
        assert_eq!(summary.median_sharpe_ratio, 0.5);
        assert_eq!(summary.min_sharpe_ratio, -1.0);
        assert_eq!(summary.max_sharpe_ratio, 2.0);
    }

    #[test]
    fn test_summarize_is_order_independent() {
        let mut results = vec![
            result(vec![1000.0, 1250.0], 0.7, 0.05, 0.9),
            result(vec![1000.0, 640.0], 0.2, 0.5, -0.3),
            result(vec![1000.0, 1010.0], 0.5, 0.01, 0.1),
        ];
        let forward = summarize(results.clone()).unwrap();
        results.reverse();
        let backward = summarize(results).unwrap();
        assert_eq!(forward.median_profit, backward.median_profit);
        assert_eq!(forward.min_win_rate, backward.min_win_rate);
        assert_eq!(forward.max_max_drawdown, backward.max_max_drawdown);
        assert_eq!(forward.positive_profit_rate, backward.positive_profit_rate);
        assert!((forward.avg_profit - backward.avg_profit).abs() < EPS);
    }
}
