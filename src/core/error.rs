//! Rule violations returned by round commands.
//!
//! Every command returns `Result<_, RuleViolation>`. All violations except
//! `EmptySupply` are local rejections: the round is left exactly as it was
//! and the caller may retry. `EmptySupply` is reported after the round has
//! moved to its terminal drawn state.

use thiserror::Error;

use super::action::{ActionId, DrawSource};
use super::player::PlayerId;
use crate::table::MeldId;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuleViolation {
    /// A round needs exactly four seats.
    #[error("configuration error: Okey 101 needs exactly 4 players, got {players}")]
    Configuration { players: usize },

    /// Too few tiles to fill every hand.
    #[error("cannot deal {found} tiles, need at least {needed}")]
    ShortDeal { found: usize, needed: usize },

    /// The command came from a seat that is not active.
    #[error("{player} is not the active seat ({active} is)")]
    OutOfTurn { player: PlayerId, active: PlayerId },

    /// The command is not legal in the current phase.
    #[error("{command} is not allowed while {phase}")]
    InvalidState {
        command: &'static str,
        phase: &'static str,
    },

    /// A proposed meld or append does not form a valid combination.
    #[error("tiles do not form a valid set or run")]
    InvalidCombination,

    /// First meld below the threshold.
    #[error("initial meld is worth {value}, needs at least {required}")]
    InsufficientMeldValue { value: u32, required: u32 },

    /// Both piles are exhausted; the round is drawn.
    #[error("reserve and discard piles are both empty")]
    EmptySupply,

    /// The ticket belongs to a turn that has already ended.
    #[error("turn {generation} is no longer current")]
    NoLongerCurrentTurn { generation: u64 },

    /// The requested pile is empty but the other one is not.
    #[error("the {0} pile is empty")]
    SourceEmpty(DrawSource),

    #[error("hand index {index} out of range for hand of {len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("hand index {index} is already used by a staged action")]
    TileAlreadyStaged { index: usize },

    #[error("no meld with id {0}")]
    UnknownMeld(MeldId),

    #[error("no staged action with id {0}")]
    UnknownAction(ActionId),
}

impl RuleViolation {
    /// True for violations that end the round instead of only rejecting the command.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, RuleViolation::EmptySupply)
    }
}
