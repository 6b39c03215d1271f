/// Highest score a hand can reach (scores are drawn from `0..=MAX_SCORE`).
pub const MAX_SCORE: u8 = 9;

/// Default starting bankroll for every run.
pub const DEFAULT_INITIAL_BANKROLL: f64 = 1_000.0;
/// Default base wager (the amount a martingale resets to after a win).
pub const DEFAULT_INITIAL_BET: f64 = 10.0;
/// Default number of independent runs in a batch.
pub const DEFAULT_NUM_SIMULATIONS: usize = 100;
/// Default number of rounds played per run.
pub const DEFAULT_NUM_ROUNDS: usize = 200;
/// Default number of pattern successes required before betting starts.
pub const DEFAULT_PATTERN_VERIFICATION: usize = 4;

/// The orchestrator yields to the host scheduler after this many completed runs.
pub const PROGRESS_YIELD_INTERVAL: usize = 10;

/// Bin counts used by the batch report.
pub const WIN_RATE_BINS: usize = 20;
pub const PROFIT_BINS: usize = 20;
pub const DRAWDOWN_BINS: usize = 15;
pub const SHARPE_BINS: usize = 15;

/// Percentiles reported alongside the average bankroll progression.
pub const PROGRESSION_LOWER_PERCENTILE: f64 = 25.0;
pub const PROGRESSION_UPPER_PERCENTILE: f64 = 75.0;
