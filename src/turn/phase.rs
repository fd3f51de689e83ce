//! Turn state machine phases and transition results.

use serde::{Deserialize, Serialize};

use super::clock::TurnTicket;
use crate::core::{PlayerId, Tile};
use crate::rules::RoundOutcome;

/// Where the round is in the draw → act → discard cycle.
///
/// ```text
/// Dealt ─start_turn→ AwaitDraw ─draw→ Acting ─commit→ AwaitDiscard ─discard→ TurnComplete
///                       ▲                       └─commit (hand empty)──────────────┘ │
///                       └──────────────────────── end_turn ◄──────────────────────────┘
/// terminal: Won(seat), Drawn
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Tiles are dealt; the first turn has not started.
    Dealt,
    AwaitDraw,
    Acting,
    AwaitDiscard,
    /// The active seat is done; `end_turn` runs the win check.
    TurnComplete,
    Won(PlayerId),
    Drawn,
}

impl TurnPhase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, TurnPhase::Won(_) | TurnPhase::Drawn)
    }

    /// Phases during which the turn clock runs.
    #[must_use]
    pub fn is_timed(self) -> bool {
        matches!(
            self,
            TurnPhase::AwaitDraw | TurnPhase::Acting | TurnPhase::AwaitDiscard
        )
    }

    #[must_use]
    pub fn outcome(self) -> Option<RoundOutcome> {
        match self {
            TurnPhase::Won(p) => Some(RoundOutcome::Winner(p)),
            TurnPhase::Drawn => Some(RoundOutcome::Draw),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TurnPhase::Dealt => "dealt",
            TurnPhase::AwaitDraw => "awaiting draw",
            TurnPhase::Acting => "acting",
            TurnPhase::AwaitDiscard => "awaiting discard",
            TurnPhase::TurnComplete => "turn complete",
            TurnPhase::Won(_) => "won",
            TurnPhase::Drawn => "drawn",
        }
    }
}

/// What `end_turn` led to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnAdvance {
    /// The next seat's turn has started.
    Next(TurnTicket),
    Won(PlayerId),
    Drawn,
}

impl TurnAdvance {
    /// Ticket for the next turn, if the round goes on.
    #[must_use]
    pub fn ticket(self) -> Option<TurnTicket> {
        match self {
            TurnAdvance::Next(ticket) => Some(ticket),
            _ => None,
        }
    }
}

/// What the engine did when a turn ran out of time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutReport {
    pub player: PlayerId,
    /// Tile drawn on the seat's behalf if it had not drawn yet.
    pub drawn: Option<Tile>,
    /// Tile discarded on the seat's behalf.
    pub discarded: Option<Tile>,
    /// Number of staged actions dropped.
    pub dropped_actions: usize,
    pub advance: TurnAdvance,
}

/// Result of a successful commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub new_melds: Vec<crate::table::MeldId>,
    pub appended: usize,
    /// Value of the new melds toward the first-meld threshold.
    pub meld_value: u32,
    /// True if this commit was the seat's initial meld.
    pub initial: bool,
}
