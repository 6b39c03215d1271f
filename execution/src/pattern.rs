//! Alternation/repetition pattern rules.
//!
//! Only decided (non-tie) rounds take part; ties are invisible to the pattern.
//! The differential of a round predicts the next decided round:
//! - **Even**: the winner should alternate.
//! - **Odd**: the winner should repeat.
//!
//! [`is_pattern_confirmed_step`] checks whether the latest decided round honoured
//! the prediction of the one before it, and [`suggest_bet`] turns the latest
//! decided round into a prediction for the next one.

use martingale_types::{DiffType, RoundHistory, RoundOutcome, Side};

/// Side the rule predicts will win the round after `round`.
fn predicted_after(round: &RoundOutcome) -> Option<Side> {
    let side = round.winner().side()?;
    Some(match round.diff_type() {
        DiffType::Even => side.opposite(),
        DiffType::Odd => side,
    })
}

/// Returns true if the two most recent decided rounds satisfy the rule.
///
/// Requires at least two decided rounds.
pub fn is_pattern_confirmed_step(history: &RoundHistory) -> bool {
    let (Some(prior), Some(current)) = (history.recent_decided(1), history.recent_decided(0))
    else {
        return false;
    };
    match prior.diff_type() {
        DiffType::Even => prior.winner() != current.winner(),
        DiffType::Odd => prior.winner() == current.winner(),
    }
}

/// Side to wager on next, based on the most recent decided round.
pub fn suggest_bet(history: &RoundHistory) -> Option<Side> {
    history.recent_decided(0).and_then(predicted_after)
}
