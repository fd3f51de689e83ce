//! The table: every meld committed in the round.
//!
//! The table only ever holds valid melds. Both mutations check the
//! validator before touching anything, so a rejected proposal leaves the
//! table as it was.
//!
//! ## Usage
//!
//! ```
//! use okey_engine::core::{Tile, TileColor::*};
//! use okey_engine::table::Table;
//!
//! let mut table = Table::new();
//! let id = table
//!     .propose_new_meld(vec![Tile::new(Red, 4), Tile::new(Red, 5), Tile::new(Red, 6)])
//!     .unwrap();
//!
//! table.extend_meld(id, Tile::new(Red, 7)).unwrap();
//! assert_eq!(table.get(id).unwrap().len(), 4);
//!
//! assert!(table.extend_meld(id, Tile::new(Blue, 8)).is_err());
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{RuleViolation, Tile};
use crate::rules::{classify, MeldKind};

/// Identifier of a meld on the table. Never reused within a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeldId(pub u32);

impl std::fmt::Display for MeldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Meld({})", self.0)
    }
}

/// A committed, valid group of tiles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    pub id: MeldId,
    pub kind: MeldKind,
    tiles: Vec<Tile>,
}

impl Meld {
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// The set of melds played this round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Melds by id.
    melds: FxHashMap<MeldId, Meld>,

    /// Placement order, for display.
    order: Vec<MeldId>,

    next_id: u32,
}

impl Table {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a new meld. Rejected with `InvalidCombination` unless the tiles
    /// form a valid combination of at least three tiles.
    pub fn propose_new_meld(&mut self, tiles: Vec<Tile>) -> Result<MeldId, RuleViolation> {
        let kind = classify(&tiles).ok_or(RuleViolation::InvalidCombination)?;

        let id = MeldId(self.next_id);
        self.next_id += 1;
        self.melds.insert(id, Meld { id, kind, tiles });
        self.order.push(id);
        Ok(id)
    }

    /// Append `tile` to an existing meld if the result is still valid.
    pub fn extend_meld(&mut self, id: MeldId, tile: Tile) -> Result<(), RuleViolation> {
        let meld = self.melds.get_mut(&id).ok_or(RuleViolation::UnknownMeld(id))?;

        let mut extended = meld.tiles.clone();
        extended.push(tile);
        let kind = classify(&extended).ok_or(RuleViolation::InvalidCombination)?;

        meld.tiles = extended;
        meld.kind = kind;
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, id: MeldId) -> bool {
        self.melds.contains_key(&id)
    }

    #[must_use]
    pub fn get(&self, id: MeldId) -> Option<&Meld> {
        self.melds.get(&id)
    }

    /// Id the next proposed meld will receive.
    #[must_use]
    pub fn next_id(&self) -> MeldId {
        MeldId(self.next_id)
    }

    /// Iterate over melds in placement order.
    pub fn melds(&self) -> impl Iterator<Item = &Meld> {
        self.order.iter().filter_map(|id| self.melds.get(id))
    }

    /// Number of melds on the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total tiles across all melds.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.melds.values().map(Meld::len).sum()
    }

    /// First meld that breaks the table's invariants, if any: every meld is
    /// valid, listed once in placement order, and below `next_id`.
    pub(crate) fn invalid_meld(&self) -> Option<MeldId> {
        for (i, id) in self.order.iter().enumerate() {
            let Some(meld) = self.melds.get(id) else {
                return Some(*id);
            };
            let broken = self.order[..i].contains(id)
                || meld.id != *id
                || id.0 >= self.next_id
                || classify(&meld.tiles) != Some(meld.kind);
            if broken {
                return Some(*id);
            }
        }
        self.melds.keys().find(|id| !self.order.contains(id)).copied()
    }

    /// Place a meld without validation.
    #[cfg(test)]
    pub(crate) fn push_unchecked(&mut self, kind: MeldKind, tiles: Vec<Tile>) -> MeldId {
        let id = MeldId(self.next_id);
        self.next_id += 1;
        self.melds.insert(id, Meld { id, kind, tiles });
        self.order.push(id);
        id
    }
}
