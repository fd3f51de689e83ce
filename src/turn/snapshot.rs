//! Binary round snapshots.
//!
//! A snapshot captures every field of a `Round`, including the RNG stream
//! position, so a restored round continues exactly where the original was.
//! Restoring rejects snapshots that no sequence of commands could produce:
//! a seat out of range, an invalid meld, tiles that are not exactly the
//! 106-tile set, or staged actions that point outside the hand or table.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::clock::TurnClock;
use super::phase::TurnPhase;
use super::round::{PlayerState, Round};
use crate::core::{
    ActionId, GameRng, GameRngState, MeldRef, PendingAction, PlayerId, PlayerMap, RoundConfig,
    RoundEvent, StagedAction, Tile, PLAYER_COUNT,
};
use crate::deck::{create_tiles, OpenTile, TILE_COUNT};
use crate::table::{MeldId, Table};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("snapshot holds {found} tiles, expected 106")]
    TileCount { found: usize },

    #[error("snapshot holds the wrong number of {tile} tiles")]
    TileSet { tile: Tile },

    #[error("snapshot seat {seat} out of range")]
    Seat { seat: u8 },

    #[error("snapshot meld {0} breaks the table invariants")]
    InvalidMeld(MeldId),

    #[error("snapshot staged action {0} does not fit the hand or table")]
    InvalidStaged(ActionId),
}

/// Owned, serializable image of a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub config: RoundConfig,
    pub rng: GameRngState,
    pub open_tile: OpenTile,
    pub players: PlayerMap<PlayerState>,
    pub reserve: Vec<Tile>,
    pub discard: Vec<Tile>,
    pub table: Table,
    pub current: PlayerId,
    pub phase: TurnPhase,
    pub staged: Vec<StagedAction>,
    pub next_action_id: u32,
    pub clock: TurnClock,
    pub generation: u64,
    pub history: Vector<RoundEvent>,
}

impl RoundSnapshot {
    /// Check that the snapshot describes a round the engine could reach.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.current.index() >= PLAYER_COUNT {
            return Err(SnapshotError::Seat { seat: self.current.0 });
        }
        if let Some(id) = self.table.invalid_meld() {
            return Err(SnapshotError::InvalidMeld(id));
        }
        self.check_tiles()?;
        self.check_staged()
    }

    fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.players
            .values()
            .flat_map(|p| p.hand.iter().copied())
            .chain(self.table.melds().flat_map(|m| m.tiles().iter().copied()))
            .chain(self.reserve.iter().copied())
            .chain(self.discard.iter().copied())
    }

    /// Every tile of the set appears exactly as often as in `create_tiles`.
    fn check_tiles(&self) -> Result<(), SnapshotError> {
        let found = self.tiles().count();
        if found != TILE_COUNT {
            return Err(SnapshotError::TileCount { found });
        }

        let mut balance: FxHashMap<Tile, i32> = FxHashMap::default();
        for tile in create_tiles() {
            *balance.entry(tile).or_default() += 1;
        }
        for tile in self.tiles() {
            *balance.entry(tile).or_default() -= 1;
        }
        match balance.into_iter().find(|&(_, n)| n != 0) {
            Some((tile, _)) => Err(SnapshotError::TileSet { tile }),
            None => Ok(()),
        }
    }

    /// Staged indices are distinct and inside the active hand; append
    /// targets exist.
    fn check_staged(&self) -> Result<(), SnapshotError> {
        let len = self.players[self.current].hand.len();
        let mut claimed: Vec<usize> = Vec::new();

        for (k, staged) in self.staged.iter().enumerate() {
            let target_ok = match staged.action {
                PendingAction::NewMeld { .. } => true,
                PendingAction::Append {
                    target: MeldRef::Placed(id),
                    ..
                } => self.table.contains(id),
                PendingAction::Append {
                    target: MeldRef::Staged(id),
                    ..
                } => self.staged[..k]
                    .iter()
                    .any(|s| s.id == id && matches!(s.action, PendingAction::NewMeld { .. })),
            };
            if !target_ok {
                return Err(SnapshotError::InvalidStaged(staged.id));
            }
            for &index in staged.action.hand_indices() {
                if index >= len || claimed.contains(&index) {
                    return Err(SnapshotError::InvalidStaged(staged.id));
                }
                claimed.push(index);
            }
        }
        Ok(())
    }
}

impl Round {
    #[must_use]
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            config: self.config.clone(),
            rng: self.rng.state(),
            open_tile: self.open_tile,
            players: self.players.clone(),
            reserve: self.reserve.clone(),
            discard: self.discard.clone(),
            table: self.table.clone(),
            current: self.current,
            phase: self.phase,
            staged: self.staged.clone(),
            next_action_id: self.next_action_id,
            clock: self.clock,
            generation: self.generation,
            history: self.history.clone(),
        }
    }

    /// Rebuild a round from a snapshot after `RoundSnapshot::validate`.
    /// Hand scores are recomputed.
    pub fn restore(snapshot: RoundSnapshot) -> Result<Self, SnapshotError> {
        snapshot.validate()?;
        let mut round = Self {
            rng: GameRng::from_state(&snapshot.rng),
            config: snapshot.config,
            open_tile: snapshot.open_tile,
            players: snapshot.players,
            reserve: snapshot.reserve,
            discard: snapshot.discard,
            table: snapshot.table,
            current: snapshot.current,
            phase: snapshot.phase,
            staged: snapshot.staged,
            next_action_id: snapshot.next_action_id,
            clock: snapshot.clock,
            generation: snapshot.generation,
            history: snapshot.history,
        };

        for (_, player) in round.players.iter_mut() {
            player.refresh_score();
        }
        Ok(round)
    }

    /// Encode the round with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        let bytes = bincode::serialize(&self.snapshot())?;
        debug!(bytes = bytes.len(), generation = self.generation, "Round encoded");
        Ok(bytes)
    }

    /// Decode a round written by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: RoundSnapshot = bincode::deserialize(bytes)?;
        Self::restore(snapshot)
    }
}
