//! Batch orchestration.
//!
//! Runs `num_simulations` independent simulations, reports progress after each
//! one, and aggregates the results. Runs never share state: each gets a fresh
//! [`Simulation`](crate::simulation::Simulation) and its own round source.
//!
//! The sequential path yields to the host scheduler after every
//! [`PROGRESS_YIELD_INTERVAL`] completed runs and checks the cancellation flag
//! before starting each run. A cancelled batch still summarizes whatever
//! completed; only a batch cancelled before its first run fails.

use crate::rng::{entropy_seed, RoundGenerator, RoundSource};
use crate::simulation::run_simulation;
use crate::statistics::summarize;
use martingale_types::{
    BatchSummary, ConfigError, SimulationConfig, SimulationResult, PROGRESS_YIELD_INTERVAL,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigError),
    #[error("batch cancelled before any simulation completed")]
    Cancelled,
}

/// A validated batch, ready to run.
#[derive(Clone, Debug)]
pub struct Batch {
    config: SimulationConfig,
    seed: u64,
    cancel: Option<Arc<AtomicBool>>,
}

impl Batch {
    /// Validate `config`. The master seed defaults to fresh OS entropy.
    pub fn new(config: SimulationConfig) -> Result<Self, BatchError> {
        config.validate()?;
        Ok(Self {
            config,
            seed: entropy_seed(),
            cancel: None,
        })
    }

    /// Use a fixed master seed so the batch can be replayed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Stop early once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Run every simulation sequentially with seeded round generators.
    pub fn run<P: FnMut(f64)>(&self, on_progress: P) -> Result<BatchSummary, BatchError> {
        let seed = self.seed;
        let mut summary = self.run_with(|run| RoundGenerator::for_run(seed, run), on_progress)?;
        summary.seed = Some(seed);
        Ok(summary)
    }

    /// Run every simulation sequentially, building one round source per run.
    pub fn run_with<S, F, P>(&self, mut sources: F, mut on_progress: P) -> Result<BatchSummary, BatchError>
    where
        S: RoundSource,
        F: FnMut(usize) -> S,
        P: FnMut(f64),
    {
        let total = self.config.num_simulations;
        info!(
            num_simulations = total,
            num_rounds = self.config.num_rounds,
            initial_bankroll = self.config.initial_bankroll,
            initial_bet = self.config.initial_bet,
            pattern_verification = self.config.pattern_verification,
            seed = self.seed,
            "Starting batch"
        );
        let start = Instant::now();

        let mut results = Vec::with_capacity(total);
        for run in 0..total {
            if self.is_cancelled() {
                break;
            }
            let result = run_simulation(&self.config, sources(run));
            debug!(run, profit = result.profit, win_rate = result.win_rate, "Simulation complete");
            results.push(result);

            let completed = run + 1;
            on_progress(completed as f64 / total as f64);
            if completed % PROGRESS_YIELD_INTERVAL == 0 {
                std::thread::yield_now();
            }
        }
        self.finish(results, start)
    }

    /// Run every simulation on the current rayon pool.
    ///
    /// Results are identical to [`Batch::run`] with the same seed.
    #[cfg(feature = "parallel")]
    pub fn run_parallel<P>(&self, on_progress: P) -> Result<BatchSummary, BatchError>
    where
        P: Fn(f64) + Sync,
    {
        use rayon::prelude::*;
        use std::sync::atomic::AtomicUsize;

        let total = self.config.num_simulations;
        let seed = self.seed;
        info!(
            num_simulations = total,
            num_rounds = self.config.num_rounds,
            threads = rayon::current_num_threads(),
            seed,
            "Starting parallel batch"
        );
        let start = Instant::now();

        let completed = AtomicUsize::new(0);
        let results: Vec<SimulationResult> = (0..total)
            .into_par_iter()
            .filter_map(|run| {
                if self.is_cancelled() {
                    return None;
                }
                let result = run_simulation(&self.config, RoundGenerator::for_run(seed, run));
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                on_progress(done as f64 / total as f64);
                Some(result)
            })
            .collect();

        let mut summary = self.finish(results, start)?;
        summary.seed = Some(seed);
        Ok(summary)
    }

    /// Run in parallel on a dedicated pool.
    #[cfg(feature = "parallel")]
    pub fn run_in_pool<P>(
        &self,
        pool: &rayon::ThreadPool,
        on_progress: P,
    ) -> Result<BatchSummary, BatchError>
    where
        P: Fn(f64) + Sync + Send,
    {
        pool.install(|| self.run_parallel(on_progress))
    }

    fn finish(&self, results: Vec<SimulationResult>, start: Instant) -> Result<BatchSummary, BatchError> {
        let requested = self.config.num_simulations;
        let completed = results.len();
        let Some(mut summary) = summarize(results) else {
            warn!(requested, "Batch cancelled before any simulation completed");
            return Err(BatchError::Cancelled);
        };
        summary.cancelled = completed < requested;
        if summary.cancelled {
            warn!(completed, requested, "Batch cancelled");
        }
        info!(
            completed,
            elapsed = ?start.elapsed(),
            avg_profit = summary.avg_profit,
            avg_win_rate = summary.avg_win_rate,
            positive_profit_rate = summary.positive_profit_rate,
            "Batch complete"
        );
        Ok(summary)
    }
}

/// Validate `config` and run a full batch with a fresh entropy seed.
pub fn run_batch(
    config: &SimulationConfig,
    on_progress: Option<&mut dyn FnMut(f64)>,
) -> Result<BatchSummary, BatchError> {
    let batch = Batch::new(config.clone())?;
    match on_progress {
        Some(callback) => batch.run(callback),
        None => batch.run(|_| {}),
    }
}
