//! Per-run metrics.
//!
//! Every ratio here is guarded: a zero denominator yields 0 instead of a
//! non-finite value.

/// Running peak and maximum proportional drawdown of a bankroll series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawdownTracker {
    peak: f64,
    max_drawdown: f64,
}

impl DrawdownTracker {
    pub fn new(initial: f64) -> Self {
        Self {
            peak: initial,
            max_drawdown: 0.0,
        }
    }

    /// Record a bankroll observation. Peak and max drawdown never decrease.
    pub fn observe(&mut self, bankroll: f64) {
        if bankroll > self.peak {
            self.peak = bankroll;
        }
        let drawdown = if self.peak > 0.0 {
            (self.peak - bankroll) / self.peak
        } else {
            0.0
        };
        if drawdown > self.max_drawdown {
            self.max_drawdown = drawdown;
        }
    }

    pub fn peak(&self) -> f64 {
        self.peak
    }

    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }
}

/// `wins / (wins + losses)`, or 0 when no bet was settled.
pub fn win_rate(wins: u32, losses: u32) -> f64 {
    let decided = wins as u64 + losses as u64;
    if decided == 0 {
        0.0
    } else {
        wins as f64 / decided as f64
    }
}

/// Simple returns between consecutive bankroll values, skipping steps whose
/// starting bankroll is not positive.
pub fn step_returns(history: &[f64]) -> Vec<f64> {
    history
        .windows(2)
        .filter(|pair| pair[0] > 0.0)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect()
}

/// Sharpe-like ratio of a bankroll series.
///
/// Mean of the step returns over their population standard deviation, scaled by
/// `sqrt(n)`. No risk-free rate, no annualization.
pub fn sharpe_ratio(history: &[f64]) -> f64 {
    let returns = step_returns(history);
    if returns.is_empty() {
        return 0.0;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();
    if std > 0.0 {
        mean / std * n.sqrt()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_drawdown_monotone_decline() {
        let mut tracker = DrawdownTracker::new(100.0);
        for bankroll in [90.0, 80.0, 70.0, 60.0] {
            tracker.observe(bankroll);
        }
        assert_eq!(tracker.peak(), 100.0);
        assert!((tracker.max_drawdown() - 0.4).abs() < EPS);
    }

    #[test]
    fn test_drawdown_recovers_but_max_holds() {
        let mut tracker = DrawdownTracker::new(100.0);
        tracker.observe(50.0);
        tracker.observe(200.0);
        tracker.observe(180.0);
        assert_eq!(tracker.peak(), 200.0);
        assert!((tracker.max_drawdown() - 0.5).abs() < EPS);
    }

    #[test]
    fn test_drawdown_non_positive_peak() {
        let mut tracker = DrawdownTracker::new(0.0);
        tracker.observe(-10.0);
        assert_eq!(tracker.peak(), 0.0);
        assert_eq!(tracker.max_drawdown(), 0.0);
    }

    #[test]
    fn test_drawdown_below_zero_bankroll() {
        // Bankroll is not clamped, so the drawdown can exceed 1
        let mut tracker = DrawdownTracker::new(100.0);
        tracker.observe(-50.0);
        assert!((tracker.max_drawdown() - 1.5).abs() < EPS);
    }

    #[test]
    fn test_win_rate() {
        assert_eq!(win_rate(0, 0), 0.0);
        assert_eq!(win_rate(3, 1), 0.75);
        assert_eq!(win_rate(0, 5), 0.0);
        assert_eq!(win_rate(2, 0), 1.0);
        assert_eq!(win_rate(u32::MAX, u32::MAX), 0.5);
    }

    #[test]
    fn test_step_returns_skip_non_positive_base() {
        let returns = step_returns(&[100.0, 110.0, 0.0, 10.0, -5.0, 5.0]);
        // 100->110 (+0.1), 110->0 (-1.0); bases 0 and -5 skipped; 10->-5 (-1.5)
        assert_eq!(returns.len(), 3);
        assert!((returns[0] - 0.1).abs() < EPS);
        assert!((returns[1] + 1.0).abs() < EPS);
        assert!((returns[2] + 1.5).abs() < EPS);
    }

    #[test]
    fn test_sharpe_degenerate_inputs() {
        assert_eq!(sharpe_ratio(&[]), 0.0);
        assert_eq!(sharpe_ratio(&[1000.0]), 0.0);
        // Flat bankroll: zero variance
        assert_eq!(sharpe_ratio(&[1000.0, 1000.0, 1000.0]), 0.0);
        // Constant positive return: still zero variance
        assert_eq!(sharpe_ratio(&[100.0, 200.0, 400.0]), 0.0);
    }

    #[test]
    fn test_sharpe_matches_formula() {
        // returns: +0.1, -0.5
        let history = [100.0, 110.0, 55.0];
        let mean: f64 = (0.1 - 0.5) / 2.0;
        let variance = ((0.1 - mean).powi(2) + (-0.5 - mean).powi(2)) / 2.0;
        let expected = mean / variance.sqrt() * 2f64.sqrt();
        assert!((sharpe_ratio(&history) - expected).abs() < EPS);
    }
}
