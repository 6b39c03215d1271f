//! Single-run state machine.
//!
//! A run starts **Unconfirmed** and watches decided rounds for the pattern rule.
//! Once `pattern_verification` successes have been counted the run becomes
//! **Confirmed** and stays there for the rest of the run, even if later rounds
//! break the pattern. From then on it wagers on the side [`suggest_bet`] picks,
//! doubling the stake after each loss and resetting it to the base bet after
//! each win (martingale). There is no stake cap and no bankroll floor: the
//! bankroll may go negative.
//!
//! Per round, in order:
//! 1. Append the outcome to the history.
//! 2. On a decided round, count a pattern success and confirm once the
//!    threshold is reached.
//! 3. If the run was already confirmed when the round started, a bet is
//!    pending and the round is decided, settle the bet.
//! 4. If confirmed, pick the bet for the next round.
//! 5. Update peak bankroll and max drawdown.
//! 6. Snapshot the bankroll.
//!
//! Ties only reach steps 1, 5 and 6.

use crate::metrics::{self, DrawdownTracker};
use crate::pattern::{is_pattern_confirmed_step, suggest_bet};
use crate::rng::RoundSource;
use martingale_types::{RoundHistory, RoundOutcome, Side, SimulationConfig, SimulationResult};
use tracing::{debug, trace};

/// Upper bound on rounds preallocated per run; longer runs grow on demand.
const MAX_PREALLOCATED_ROUNDS: usize = 1 << 16;

/// Whether the pattern has been verified for this run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Unconfirmed,
    Confirmed,
}

/// A resolved wager.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settlement {
    pub side: Side,
    pub won: bool,
    /// Stake that was won or lost.
    pub stake: f64,
    /// Stake for the next bet.
    pub next_stake: f64,
}

/// Mutable bookkeeping for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationState {
    bankroll: f64,
    bet_amount: f64,
    current_bet: Option<Side>,
    phase: Phase,
    verification_count: usize,
    consecutive_losses: u32,
    win_count: u32,
    loss_count: u32,
    drawdown: DrawdownTracker,
    bankroll_history: Vec<f64>,
    bet_amounts_used: Vec<f64>,
}

impl SimulationState {
    fn new(initial_bankroll: f64, initial_bet: f64, num_rounds: usize) -> Self {
        let mut bankroll_history =
            Vec::with_capacity(num_rounds.min(MAX_PREALLOCATED_ROUNDS).saturating_add(1));
        bankroll_history.push(initial_bankroll);
        Self {
            bankroll: initial_bankroll,
            bet_amount: initial_bet,
            current_bet: None,
            phase: Phase::Unconfirmed,
            verification_count: 0,
            consecutive_losses: 0,
            win_count: 0,
            loss_count: 0,
            drawdown: DrawdownTracker::new(initial_bankroll),
            bankroll_history,
            bet_amounts_used: Vec::new(),
        }
    }

    pub fn bankroll(&self) -> f64 {
        self.bankroll
    }

    pub fn bet_amount(&self) -> f64 {
        self.bet_amount
    }

    pub fn current_bet(&self) -> Option<Side> {
        self.current_bet
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pattern_verified(&self) -> bool {
        self.phase == Phase::Confirmed
    }

    pub fn verification_count(&self) -> usize {
        self.verification_count
    }

    pub fn consecutive_losses(&self) -> u32 {
        self.consecutive_losses
    }

    pub fn win_count(&self) -> u32 {
        self.win_count
    }

    pub fn loss_count(&self) -> u32 {
        self.loss_count
    }

    pub fn peak_bankroll(&self) -> f64 {
        self.drawdown.peak()
    }

    pub fn max_drawdown(&self) -> f64 {
        self.drawdown.max_drawdown()
    }

    pub fn bankroll_history(&self) -> &[f64] {
        &self.bankroll_history
    }

    pub fn bet_amounts_used(&self) -> &[f64] {
        &self.bet_amounts_used
    }
}

/// One run of the strategy.
#[derive(Clone, Debug)]
pub struct Simulation {
    initial_bankroll: f64,
    initial_bet: f64,
    threshold: usize,
    history: RoundHistory,
    state: SimulationState,
}

impl Simulation {
    /// Fresh run state seeded from `config`. The config is not validated here.
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            initial_bankroll: config.initial_bankroll,
            initial_bet: config.initial_bet,
            threshold: config.pattern_verification,
            history: RoundHistory::with_capacity(config.num_rounds.min(MAX_PREALLOCATED_ROUNDS)),
            state: SimulationState::new(
                config.initial_bankroll,
                config.initial_bet,
                config.num_rounds,
            ),
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn history(&self) -> &RoundHistory {
        &self.history
    }

    /// Apply one round, returning the settlement if a bet was resolved.
    pub fn play_round(&mut self, outcome: RoundOutcome) -> Option<Settlement> {
        let round = self.history.len();
        let confirmed_at_entry = self.state.phase == Phase::Confirmed;
        self.history.push(outcome);

        let mut settlement = None;
        if let Some(winner) = outcome.winner().side() {
            if is_pattern_confirmed_step(&self.history) {
                self.state.verification_count += 1;
                if self.state.phase == Phase::Unconfirmed
                    && self.state.verification_count >= self.threshold
                {
                    self.state.phase = Phase::Confirmed;
                    debug!(
                        round,
                        verification_count = self.state.verification_count,
                        "Pattern confirmed"
                    );
                }
            }

            if confirmed_at_entry {
                if let Some(side) = self.state.current_bet {
                    settlement = Some(self.settle(side, side == winner));
                }
            }

            if self.state.phase == Phase::Confirmed {
                self.state.current_bet = suggest_bet(&self.history);
            }
        }

        self.state.drawdown.observe(self.state.bankroll);
        self.state.bankroll_history.push(self.state.bankroll);
        settlement
    }

    fn settle(&mut self, side: Side, won: bool) -> Settlement {
        let state = &mut self.state;
        let stake = state.bet_amount;
        if won {
            state.bankroll += stake;
            state.bet_amount = self.initial_bet;
            state.consecutive_losses = 0;
            state.win_count += 1;
        } else {
            state.bankroll -= stake;
            state.bet_amount *= 2.0;
            state.consecutive_losses += 1;
            state.loss_count += 1;
        }
        state.bet_amounts_used.push(state.bet_amount);
        trace!(
            %side,
            won,
            stake,
            bankroll = state.bankroll,
            consecutive_losses = state.consecutive_losses,
            "Settled bet"
        );
        Settlement {
            side,
            won,
            stake,
            next_stake: state.bet_amount,
        }
    }

    /// Close the run and derive its metrics.
    pub fn finish(self) -> SimulationResult {
        let state = self.state;
        let sharpe_ratio = metrics::sharpe_ratio(&state.bankroll_history);
        SimulationResult {
            final_bankroll: state.bankroll,
            profit: state.bankroll - self.initial_bankroll,
            win_count: state.win_count,
            loss_count: state.loss_count,
            win_rate: metrics::win_rate(state.win_count, state.loss_count),
            max_drawdown: state.drawdown.max_drawdown(),
            peak_bankroll: state.drawdown.peak(),
            sharpe_ratio,
            bankroll_history: state.bankroll_history,
            bet_amounts_used: state.bet_amounts_used,
        }
    }
}

/// Play `config.num_rounds` rounds drawn from `source` and return the result.
pub fn run_simulation<S: RoundSource>(config: &SimulationConfig, mut source: S) -> SimulationResult {
    let mut simulation = Simulation::new(config);
    for _ in 0..config.num_rounds {
        simulation.play_round(source.next_round());
    }
    simulation.finish()
}
