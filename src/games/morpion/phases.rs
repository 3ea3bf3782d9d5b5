//! Match lifecycle states.
//!
//! A match only ever moves forward: `Waiting` → `Active` → `Finished`.

use super::Mark;
use serde::{Deserialize, Serialize};

/// How a finished match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// A seat completed a winning run.
    Winner(Mark),
    /// The grid filled up without a winner.
    Draw,
    /// The match went idle or every player left before a result.
    Abandoned,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Winner(mark) => Some(*mark),
            Outcome::Draw | Outcome::Abandoned => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(mark) => write!(f, "{} wins", mark),
            Outcome::Draw => write!(f, "Draw"),
            Outcome::Abandoned => write!(f, "Abandoned"),
        }
    }
}

/// Lifecycle state of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchState {
    /// Seats are still open.
    Waiting,
    /// Every seat is filled and moves are accepted.
    Active,
    /// Terminal; no further moves are accepted.
    Finished(Outcome),
}

impl MatchState {
    /// Whether the match has reached its terminal state.
    pub fn is_finished(&self) -> bool {
        matches!(self, MatchState::Finished(_))
    }
}
