use serde::{Deserialize, Serialize};

/// Snapshot emitted at the end of a single run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Initial bankroll followed by one entry per round.
    pub bankroll_history: Vec<f64>,
    pub final_bankroll: f64,
    /// `final_bankroll - initial_bankroll`.
    pub profit: f64,
    pub win_count: u32,
    pub loss_count: u32,
    /// Wins over settled bets, 0 when nothing was settled.
    pub win_rate: f64,
    pub max_drawdown: f64,
    pub peak_bankroll: f64,
    /// Bet amount after each settlement, one entry per settled bet.
    pub bet_amounts_used: Vec<f64>,
    pub sharpe_ratio: f64,
}

/// Aggregate view over every completed run in a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub avg_win_rate: f64,
    pub median_win_rate: f64,
    pub min_win_rate: f64,
    pub max_win_rate: f64,

    pub avg_profit: f64,
    pub median_profit: f64,
    pub min_profit: f64,
    pub max_profit: f64,
    /// Share of runs that finished with strictly positive profit.
    pub positive_profit_rate: f64,

    pub avg_max_drawdown: f64,
    pub median_max_drawdown: f64,
    pub min_max_drawdown: f64,
    pub max_max_drawdown: f64,

    pub avg_sharpe_ratio: f64,
    pub median_sharpe_ratio: f64,
    pub min_sharpe_ratio: f64,
    pub max_sharpe_ratio: f64,

    // Raw per-run metrics, in run order, for downstream histogramming.
    pub win_rates: Vec<f64>,
    pub profits: Vec<f64>,
    pub max_drawdowns: Vec<f64>,
    pub sharpe_ratios: Vec<f64>,

    /// Every completed run, in run order.
    pub results: Vec<SimulationResult>,

    /// Number of runs that completed (fewer than requested if cancelled).
    pub num_simulations: usize,
    /// True if the batch was stopped before every requested run finished.
    pub cancelled: bool,
    /// Master seed the batch was derived from, when seeded generation was used.
    pub seed: Option<u64>,
}

/// Bankroll distribution at one round index across runs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionPoint {
    pub round: usize,
    pub avg: f64,
    pub p25: f64,
    pub p75: f64,
}

/// One labelled histogram bucket covering `[lower, upper)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    pub range: String,
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Everything a host needs to render a finished batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub win_rate_histogram: Vec<HistogramBin>,
    pub profit_histogram: Vec<HistogramBin>,
    pub drawdown_histogram: Vec<HistogramBin>,
    pub sharpe_histogram: Vec<HistogramBin>,
    pub progression: Vec<ProgressionPoint>,
}
