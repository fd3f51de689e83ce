//! Terminal outcome of a round.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// A seat emptied its hand after making its initial meld.
    Winner(PlayerId),
    /// Both piles ran out; nobody wins.
    Draw,
}

impl RoundOutcome {
    /// Check if a seat won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, RoundOutcome::Winner(p) if *p == player)
    }
}
