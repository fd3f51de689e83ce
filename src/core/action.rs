//! Staged actions and the round event history.
//!
//! During `Acting` the active seat stages `PendingAction`s against its own
//! hand. Staging never touches the hand or the table; `commit_turn` applies
//! everything at once, and any turn-ending path that bypasses the commit
//! drops the staged actions wholesale.
//!
//! ```
//! use okey_engine::core::PendingAction;
//!
//! let meld = PendingAction::new_meld(&[0, 3, 4]);
//! assert_eq!(meld.hand_indices(), &[0, 3, 4]);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::PlayerId;
use super::tile::Tile;
use crate::table::MeldId;

/// Where a draw takes its tile from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawSource {
    Reserve,
    Discard,
}

impl std::fmt::Display for DrawSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawSource::Reserve => f.write_str("reserve"),
            DrawSource::Discard => f.write_str("discard"),
        }
    }
}

/// Identifier of a staged action, unique within a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub u32);

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Target of an append.
///
/// Appends are applied after every new meld of the same commit, so they may
/// target a meld that is only staged so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeldRef {
    /// A meld already on the table.
    Placed(MeldId),
    /// The meld a staged `NewMeld` action will create.
    Staged(ActionId),
}

impl From<MeldId> for MeldRef {
    fn from(id: MeldId) -> Self {
        MeldRef::Placed(id)
    }
}

impl From<ActionId> for MeldRef {
    fn from(id: ActionId) -> Self {
        MeldRef::Staged(id)
    }
}

/// An uncommitted intention of the active seat.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PendingAction {
    /// Lay the tiles at these hand indices down as a new meld.
    /// SmallVec avoids a heap allocation for typical 3-4 tile melds.
    NewMeld { hand_indices: SmallVec<[usize; 4]> },

    /// Append the tile at `hand_index` to a meld.
    Append { hand_index: usize, target: MeldRef },
}

impl PendingAction {
    #[must_use]
    pub fn new_meld(hand_indices: &[usize]) -> Self {
        PendingAction::NewMeld {
            hand_indices: SmallVec::from_slice(hand_indices),
        }
    }

    #[must_use]
    pub fn append(hand_index: usize, target: impl Into<MeldRef>) -> Self {
        PendingAction::Append {
            hand_index,
            target: target.into(),
        }
    }

    /// Hand indices this action consumes.
    #[must_use]
    pub fn hand_indices(&self) -> &[usize] {
        match self {
            PendingAction::NewMeld { hand_indices } => hand_indices,
            PendingAction::Append { hand_index, .. } => std::slice::from_ref(hand_index),
        }
    }
}

/// A staged action with its id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedAction {
    pub id: ActionId,
    pub action: PendingAction,
}

/// Something that happened in the round, recorded in order.
///
/// Used for replay, debugging and by presentation layers that animate
/// state changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    TurnStarted {
        player: PlayerId,
        generation: u64,
    },
    Drew {
        player: PlayerId,
        source: DrawSource,
        tile: Tile,
    },
    Committed {
        player: PlayerId,
        new_melds: Vec<MeldId>,
        appended: Vec<(MeldId, Tile)>,
        initial: bool,
    },
    Discarded {
        player: PlayerId,
        tile: Tile,
    },
    TimedOut {
        player: PlayerId,
        generation: u64,
    },
    Won {
        player: PlayerId,
    },
    Drawn,
}
