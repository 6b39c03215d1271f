//! Sweep the pattern-verification threshold and compare batch outcomes.
//!
//! Every threshold uses the same master seed, so each row sees identical
//! round sequences and differs only in when betting starts.

use martingale_execution::Batch;
use martingale_types::SimulationConfig;

const SEED: u64 = 0x5eed;
const RUNS: usize = 2_000;
const ROUNDS: usize = 200;
const THRESHOLDS: [usize; 8] = [1, 2, 3, 4, 5, 6, 8, 10];

#[derive(Clone)]
struct ResultRow {
    threshold: usize,
    avg_profit: f64,
    median_profit: f64,
    positive_rate: f64,
    avg_drawdown: f64,
    avg_win_rate: f64,
}

fn main() {
    let mut rows = Vec::with_capacity(THRESHOLDS.len());
    for threshold in THRESHOLDS {
        let config = SimulationConfig {
            num_simulations: RUNS,
            num_rounds: ROUNDS,
            pattern_verification: threshold,
            ..SimulationConfig::default()
        };
        let summary = match Batch::new(config).and_then(|b| b.with_seed(SEED).run_parallel(|_| {})) {
            Ok(summary) => summary,
            Err(err) => {
                eprintln!("threshold {threshold}: {err}");
                continue;
            }
        };
        rows.push(ResultRow {
            threshold,
            avg_profit: summary.avg_profit,
            median_profit: summary.median_profit,
            positive_rate: summary.positive_profit_rate,
            avg_drawdown: summary.avg_max_drawdown,
            avg_win_rate: summary.avg_win_rate,
        });
    }

    println!("runs={RUNS} rounds={ROUNDS} seed={SEED:#x}");
    println!(
        "{:>9} {:>12} {:>12} {:>10} {:>10} {:>10}",
        "threshold", "avg_profit", "med_profit", "positive", "drawdown", "win_rate"
    );
    for row in &rows {
        println!(
            "{:>9} {:>12.2} {:>12.2} {:>9.2}% {:>9.2}% {:>9.2}%",
            row.threshold,
            row.avg_profit,
            row.median_profit,
            row.positive_rate * 100.0,
            row.avg_drawdown * 100.0,
            row.avg_win_rate * 100.0,
        );
    }
}
