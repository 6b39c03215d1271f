use anyhow::{Context, Result};
use clap::Parser;
use martingale_execution::{build_report, Batch};
use martingale_simulator::{execute, render_summary, resolve_config, write_report, ConfigOverrides};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn, Level};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML file with configuration fields (camelCase keys, all optional).
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: ConfigOverrides,

    /// Master seed for reproducible batches (random when omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// Run simulations on a rayon pool.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Worker threads for --parallel (defaults to logical cores).
    #[arg(long, requires = "parallel")]
    threads: Option<usize>,

    /// Write the full report (summary, histograms, progression) as JSON.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = Level::from_str(log_level).context("invalid log level")?;
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse args
    let args = Args::parse();

    // Create logger
    init_tracing(&args.log_level, args.json_logs)?;

    let config = resolve_config(args.config.as_deref(), &args.overrides)?;
    let mut batch = Batch::new(config)?;
    if let Some(seed) = args.seed {
        batch = batch.with_seed(seed);
    }

    let cancel = Arc::new(AtomicBool::new(false));
    let batch = batch.with_cancel(cancel.clone());
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after in-flight simulations");
            cancel.store(true, Ordering::Relaxed);
        }
    });

    let (parallel, threads) = (args.parallel, args.threads);
    let summary = tokio::task::spawn_blocking(move || execute(&batch, parallel, threads))
        .await
        .context("simulation task panicked")??;
    interrupt.abort();

    println!("{}", render_summary(&summary));

    if let Some(path) = &args.output {
        let report = build_report(summary);
        write_report(path, &report)?;
        info!(path = %path.display(), "Report written");
    }
    Ok(())
}
