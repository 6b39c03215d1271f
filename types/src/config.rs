use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    DEFAULT_INITIAL_BANKROLL, DEFAULT_INITIAL_BET, DEFAULT_NUM_ROUNDS, DEFAULT_NUM_SIMULATIONS,
    DEFAULT_PATTERN_VERIFICATION,
};

/// Rejected configuration. Every variant is an invalid-configuration condition
/// raised before any run starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid configuration: initial_bankroll must be a finite value > 0 (got {0})")]
    InitialBankroll(f64),
    #[error("invalid configuration: initial_bet must be a finite value > 0 (got {0})")]
    InitialBet(f64),
    #[error("invalid configuration: num_simulations must be greater than zero")]
    NumSimulations,
    #[error("invalid configuration: num_rounds must be greater than zero")]
    NumRounds,
    #[error("invalid configuration: pattern_verification must be at least 1")]
    PatternVerification,
}

/// Parameters shared by every run in a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Bankroll each run starts with.
    pub initial_bankroll: f64,
    /// Base wager; the bet resets to this after every win.
    pub initial_bet: f64,
    /// Number of independent runs.
    pub num_simulations: usize,
    /// Rounds played per run.
    pub num_rounds: usize,
    /// Consecutive pattern successes required before betting starts.
    pub pattern_verification: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_bankroll: DEFAULT_INITIAL_BANKROLL,
            initial_bet: DEFAULT_INITIAL_BET,
            num_simulations: DEFAULT_NUM_SIMULATIONS,
            num_rounds: DEFAULT_NUM_ROUNDS,
            pattern_verification: DEFAULT_PATTERN_VERIFICATION,
        }
    }
}

impl SimulationConfig {
    /// Check every field, reporting the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_bankroll.is_finite() && self.initial_bankroll > 0.0) {
            return Err(ConfigError::InitialBankroll(self.initial_bankroll));
        }
        if !(self.initial_bet.is_finite() && self.initial_bet > 0.0) {
            return Err(ConfigError::InitialBet(self.initial_bet));
        }
        if self.num_simulations == 0 {
            return Err(ConfigError::NumSimulations);
        }
        if self.num_rounds == 0 {
            return Err(ConfigError::NumRounds);
        }
        if self.pattern_verification == 0 {
            return Err(ConfigError::PatternVerification);
        }
        Ok(())
    }
}
