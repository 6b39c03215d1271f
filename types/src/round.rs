//! Round outcomes and the per-run history they accumulate into.
//!
//! A round is abstracted as two independent scores in `0..=9`. The winner is the
//! strictly higher score (equal scores tie) and the differential is the parity of
//! the absolute score difference. Both are derived once at construction and never
//! change afterwards.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::MAX_SCORE;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeError {
    #[error("score out of range (got={got}, max={max})")]
    ScoreOutOfRange { got: u8, max: u8 },
}

/// Who took the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Winner {
    Player,
    Banker,
    Tie,
}

impl Winner {
    /// Derive the winner from the two scores (higher wins, equal ties).
    pub fn from_scores(player: u8, banker: u8) -> Self {
        match player.cmp(&banker) {
            std::cmp::Ordering::Greater => Winner::Player,
            std::cmp::Ordering::Less => Winner::Banker,
            std::cmp::Ordering::Equal => Winner::Tie,
        }
    }

    /// The side that won, or `None` for a tie.
    pub fn side(self) -> Option<Side> {
        match self {
            Winner::Player => Some(Side::Player),
            Winner::Banker => Some(Side::Banker),
            Winner::Tie => None,
        }
    }

    pub fn is_tie(self) -> bool {
        self == Winner::Tie
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Player => f.write_str("Player"),
            Winner::Banker => f.write_str("Banker"),
            Winner::Tie => f.write_str("Tie"),
        }
    }
}

/// A side that can be wagered on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Player,
    Banker,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Player => Side::Banker,
            Side::Banker => Side::Player,
        }
    }

    /// Returns true if this side took the round.
    pub fn won(self, winner: Winner) -> bool {
        winner.side() == Some(self)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("Player"),
            Side::Banker => f.write_str("Banker"),
        }
    }
}

/// Parity of `|player - banker|`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiffType {
    Even,
    Odd,
}

impl DiffType {
    pub fn from_scores(player: u8, banker: u8) -> Self {
        if player.abs_diff(banker) % 2 == 0 {
            DiffType::Even
        } else {
            DiffType::Odd
        }
    }
}

/// One resolved round. Immutable once created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundOutcome {
    player_score: u8,
    banker_score: u8,
    winner: Winner,
    diff_type: DiffType,
}

impl RoundOutcome {
    /// Build an outcome from two scores, deriving winner and differential.
    pub fn new(player_score: u8, banker_score: u8) -> Result<Self, OutcomeError> {
        for got in [player_score, banker_score] {
            if got > MAX_SCORE {
                return Err(OutcomeError::ScoreOutOfRange {
                    got,
                    max: MAX_SCORE,
                });
            }
        }
        Ok(Self::derive(player_score, banker_score))
    }

    /// Build an outcome, saturating each score at [`MAX_SCORE`].
    ///
    /// For sources that already draw scores from `0..=MAX_SCORE`.
    pub fn saturating(player_score: u8, banker_score: u8) -> Self {
        Self::derive(player_score.min(MAX_SCORE), banker_score.min(MAX_SCORE))
    }

    fn derive(player_score: u8, banker_score: u8) -> Self {
        Self {
            player_score,
            banker_score,
            winner: Winner::from_scores(player_score, banker_score),
            diff_type: DiffType::from_scores(player_score, banker_score),
        }
    }

    pub fn player_score(&self) -> u8 {
        self.player_score
    }

    pub fn banker_score(&self) -> u8 {
        self.banker_score
    }

    pub fn winner(&self) -> Winner {
        self.winner
    }

    pub fn diff_type(&self) -> DiffType {
        self.diff_type
    }

    pub fn is_tie(&self) -> bool {
        self.winner.is_tie()
    }
}

/// Append-only sequence of outcomes for a single run.
///
/// Indices of decided (non-tie) rounds are tracked on push so pattern lookups
/// never rescan the full history.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoundHistory {
    rounds: Vec<RoundOutcome>,
    decided: Vec<usize>,
}

impl RoundHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rounds: Vec::with_capacity(capacity),
            decided: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, outcome: RoundOutcome) {
        if !outcome.is_tie() {
            self.decided.push(self.rounds.len());
        }
        self.rounds.push(outcome);
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Every round in play order, ties included.
    pub fn rounds(&self) -> &[RoundOutcome] {
        &self.rounds
    }

    /// Number of non-tie rounds.
    pub fn decided_len(&self) -> usize {
        self.decided.len()
    }

    /// Non-tie rounds in play order.
    pub fn decided(&self) -> impl DoubleEndedIterator<Item = &RoundOutcome> + '_ {
        self.decided.iter().map(|&idx| &self.rounds[idx])
    }

    /// The `n`-th most recent non-tie round (`0` is the latest).
    pub fn recent_decided(&self, n: usize) -> Option<&RoundOutcome> {
        let pos = self.decided.len().checked_sub(n + 1)?;
        self.decided.get(pos).map(|&idx| &self.rounds[idx])
    }
}

impl FromIterator<RoundOutcome> for RoundHistory {
    fn from_iter<I: IntoIterator<Item = RoundOutcome>>(iter: I) -> Self {
        let mut history = RoundHistory::new();
        for outcome in iter {
            history.push(outcome);
        }
        history
    }
}
