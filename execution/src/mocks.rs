//! Scripted round sources for deterministic tests.

use crate::rng::RoundSource;
use martingale_types::RoundOutcome;

/// Creates a round from two scores, panicking on out-of-range input.
pub fn round(player: u8, banker: u8) -> RoundOutcome {
    RoundOutcome::new(player, banker).expect("scores must be in 0..=9")
}

/// Creates a sequence of rounds from `(player, banker)` score pairs.
pub fn rounds(scores: &[(u8, u8)]) -> Vec<RoundOutcome> {
    scores.iter().map(|&(p, b)| round(p, b)).collect()
}

/// Replays a fixed list of rounds, wrapping around when exhausted.
#[derive(Clone, Debug)]
pub struct ScriptedRounds {
    rounds: Vec<RoundOutcome>,
    next: usize,
}

impl ScriptedRounds {
    pub fn new(rounds: Vec<RoundOutcome>) -> Self {
        assert!(!rounds.is_empty(), "script must contain at least one round");
        Self { rounds, next: 0 }
    }

    pub fn from_scores(scores: &[(u8, u8)]) -> Self {
        Self::new(rounds(scores))
    }

    /// Number of rounds served so far.
    pub fn served(&self) -> usize {
        self.next
    }
}

impl RoundSource for ScriptedRounds {
    fn next_round(&mut self) -> RoundOutcome {
        let outcome = self.rounds[self.next % self.rounds.len()];
        self.next += 1;
        outcome
    }
}
