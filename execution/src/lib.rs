//! Martingale simulator execution layer.
//!
//! This crate contains the round generator, the alternation/repetition pattern
//! engine, the single-run martingale state machine, the batch orchestrator and
//! the statistics that turn per-run metrics into distributional summaries.
//!
//! ## Data flow
//! `RoundGenerator` -> `pattern` -> `Simulation` (per round) -> `Batch` (per run)
//! -> `statistics` / `report` (per batch).
//!
//! ## Determinism
//! - Nothing in a run depends on wall-clock time or global state.
//! - Randomness only comes from the [`RoundSource`] handed to a run. Seeded
//!   batches derive one ChaCha20 stream per run index, so the same seed yields
//!   the same summary whether runs execute sequentially or in parallel.
//!
//! ## Division guards
//! Win rate with no settled bets, drawdown with a non-positive peak and the
//! Sharpe ratio with no returns or zero variance all evaluate to 0.
//!
//! ## Minimal batch (example)
//! ```rust
//! use martingale_execution::Batch;
//! use martingale_types::SimulationConfig;
//!
//! let config = SimulationConfig {
//!     num_simulations: 20,
//!     num_rounds: 50,
//!     ..SimulationConfig::default()
//! };
//! let summary = Batch::new(config)?
//!     .with_seed(7)
//!     .run(|progress| assert!((0.0..=1.0).contains(&progress)))?;
//! assert_eq!(summary.num_simulations, 20);
//! assert_eq!(summary.results[0].bankroll_history.len(), 51);
//! # Ok::<(), martingale_execution::BatchError>(())
//! ```

pub mod batch;
pub mod metrics;
pub mod pattern;
pub mod report;
pub mod rng;
pub mod simulation;
pub mod statistics;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;


pub use batch::{run_batch, Batch, BatchError};
pub use metrics::DrawdownTracker;
pub use pattern::{is_pattern_confirmed_step, suggest_bet};
pub use report::build_report;
pub use rng::{RoundGenerator, RoundSource};
pub use simulation::{run_simulation, Phase, Settlement, Simulation, SimulationState};
pub use statistics::{average_progression, histogram, mean, median, percentile, summarize};
