//! Host-side helpers for the `martingale-sim` binary.
//!
//! Configuration is resolved in three layers: built-in defaults, an optional
//! YAML file, then command-line overrides. The merged result is validated
//! before any simulation runs.

use anyhow::{Context, Result};
use martingale_execution::Batch;
use martingale_types::{BatchReport, BatchSummary, SimulationConfig};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// Command-line overrides for individual configuration fields.
#[derive(clap::Args, Clone, Debug, Default, PartialEq)]
pub struct ConfigOverrides {
    /// Starting bankroll for every run.
    #[arg(long)]
    pub initial_bankroll: Option<f64>,

    /// Base stake; the stake resets to this after every win.
    #[arg(long)]
    pub initial_bet: Option<f64>,

    /// Number of independent runs in the batch.
    #[arg(long)]
    pub num_simulations: Option<usize>,

    /// Rounds played per run.
    #[arg(long)]
    pub num_rounds: Option<usize>,

    /// Pattern successes required before betting starts.
    #[arg(long)]
    pub pattern_verification: Option<usize>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut SimulationConfig) {
        if let Some(value) = self.initial_bankroll {
            config.initial_bankroll = value;
        }
        if let Some(value) = self.initial_bet {
            config.initial_bet = value;
        }
        if let Some(value) = self.num_simulations {
            config.num_simulations = value;
        }
        if let Some(value) = self.num_rounds {
            config.num_rounds = value;
        }
        if let Some(value) = self.pattern_verification {
            config.pattern_verification = value;
        }
    }
}

/// Read a (possibly partial) configuration from a YAML file.
pub fn load_config(path: &Path) -> Result<SimulationConfig> {
    let file = File::open(path)
        .with_context(|| format!("failed to open config file {}", path.display()))?;
    serde_yaml::from_reader(file)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

/// Merge defaults, the optional config file and `overrides`, then validate.
pub fn resolve_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<SimulationConfig> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => SimulationConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Logs batch progress once per completed 10%.
///
/// Safe to share across rayon workers.
#[derive(Debug, Default)]
pub struct ProgressLogger {
    last_decile: AtomicUsize,
}

impl ProgressLogger {
    /// Returns true if this call crossed a new 10% boundary.
    pub fn observe(&self, progress: f64) -> bool {
        let decile = (progress.clamp(0.0, 1.0) * 10.0).floor() as usize;
        let previous = self.last_decile.fetch_max(decile, Ordering::Relaxed);
        if decile <= previous {
            return false;
        }
        info!(percent = decile * 10, "Batch progress");
        true
    }
}

/// Run `batch` on the current thread, the global rayon pool, or a pool with
/// `threads` workers.
pub fn execute(batch: &Batch, parallel: bool, threads: Option<usize>) -> Result<BatchSummary> {
    let progress = ProgressLogger::default();
    let on_progress = |p: f64| {
        progress.observe(p);
    };
    let summary = match (parallel, threads) {
        (false, _) => batch.run(on_progress)?,
        (true, None) => batch.run_parallel(on_progress)?,
        (true, Some(threads)) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("martingale-worker-{i}"))
                .build()
                .context("failed to create simulation pool")?;
            batch.run_in_pool(&pool, on_progress)?
        }
    };
    Ok(summary)
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn dollars(value: f64) -> String {
    format!("${value:.2}")
}

fn ratio(value: f64) -> String {
    format!("{value:.3}")
}

fn row(label: &str, values: [f64; 4], format: fn(f64) -> String) -> String {
    let [avg, median, min, max] = values.map(format);
    format!("{label:<16}{avg:>14}{median:>14}{min:>14}{max:>14}\n")
}

/// Render a plain-text summary table.
pub fn render_summary(summary: &BatchSummary) -> String {
    let mut out = format!("Simulations: {}", summary.num_simulations);
    if summary.cancelled {
        out.push_str(" (cancelled)");
    }
    out.push('\n');
    if let Some(seed) = summary.seed {
        out.push_str(&format!("Seed: {seed}\n"));
    }
    out.push('\n');
    out.push_str(&format!(
        "{:<16}{:>14}{:>14}{:>14}{:>14}\n",
        "", "avg", "median", "min", "max"
    ));
    out.push_str(&row(
        "win rate",
        [
            summary.avg_win_rate,
            summary.median_win_rate,
            summary.min_win_rate,
            summary.max_win_rate,
        ],
        percent,
    ));
    out.push_str(&row(
        "profit",
        [
            summary.avg_profit,
            summary.median_profit,
            summary.min_profit,
            summary.max_profit,
        ],
        dollars,
    ));
    out.push_str(&row(
        "max drawdown",
        [
            summary.avg_max_drawdown,
            summary.median_max_drawdown,
            summary.min_max_drawdown,
            summary.max_max_drawdown,
        ],
        percent,
    ));
    out.push_str(&row(
        "sharpe ratio",
        [
            summary.avg_sharpe_ratio,
            summary.median_sharpe_ratio,
            summary.min_sharpe_ratio,
            summary.max_sharpe_ratio,
        ],
        ratio,
    ));
    out.push('\n');
    out.push_str(&format!(
        "Positive profit rate: {}\n",
        percent(summary.positive_profit_rate)
    ));
    out
}

/// Write `report` as pretty-printed JSON.
pub fn write_report(path: &Path, report: &BatchReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create report file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("failed to flush report to {}", path.display()))
}
