//! Dealing: tile set construction, shuffling, open tile and hand distribution.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{GameRng, PlayerId, PlayerMap, RuleViolation, Tile, TileColor, MAX_NUMBER, PLAYER_COUNT};

/// Total tiles in an Okey set: two 4×13 grids plus two true jokers.
pub const TILE_COUNT: usize = 2 * 4 * MAX_NUMBER as usize + 2;

/// Tiles dealt to the dealer seat.
pub const DEALER_HAND_SIZE: usize = 15;

/// Tiles dealt to every other seat.
pub const HAND_SIZE: usize = 14;

/// Tiles in the reserve right after the deal.
pub const INITIAL_RESERVE: usize = TILE_COUNT - DEALER_HAND_SIZE - HAND_SIZE * (PLAYER_COUNT - 1);

/// The open tile and the false joker derived from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenTile {
    /// The tile turned face up. It stays in circulation.
    pub open: Tile,
    /// Same color, number + 1 (13 wraps to 1); a joker if `open` is a joker.
    /// Validates as its literal color and number, never as a wildcard.
    pub false_joker: Tile,
}

impl OpenTile {
    #[must_use]
    pub fn from_open(open: Tile) -> Self {
        Self {
            open,
            false_joker: open.successor(),
        }
    }
}

/// Result of dealing a shuffled tile set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deal {
    pub hands: PlayerMap<Vec<Tile>>,
    /// Undealt tiles; the top of the pile is the end of the vec.
    pub reserve: Vec<Tile>,
}

/// Build the full 106-tile multiset in a fixed order.
#[must_use]
pub fn create_tiles() -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(TILE_COUNT);
    for _ in 0..2 {
        for color in TileColor::PLAYING {
            for number in 1..=MAX_NUMBER {
                tiles.push(Tile::new(color, number));
            }
        }
    }
    tiles.push(Tile::joker());
    tiles.push(Tile::joker());
    tiles
}

/// Uniformly permute the tiles.
pub fn shuffle_tiles(tiles: &mut [Tile], rng: &mut GameRng) {
    rng.shuffle(tiles);
}

/// Pick the open tile uniformly from `tiles` and derive the false joker.
///
/// The open tile is not removed from `tiles`.
///
/// Panics if `tiles` is empty.
pub fn determine_open_tile(tiles: &[Tile], rng: &mut GameRng) -> OpenTile {
    assert!(!tiles.is_empty(), "Cannot pick an open tile from an empty set");
    let open_tile = OpenTile::from_open(tiles[rng.gen_index(tiles.len())]);
    debug!(open = %open_tile.open, false_joker = %open_tile.false_joker, "Open tile determined");
    open_tile
}

/// Distribute shuffled tiles: 15 to the dealer, 14 to each other seat,
/// the remainder becomes the reserve.
///
/// Hands are cut from the front of `tiles` in seat order.
pub fn deal(mut tiles: Vec<Tile>, players: usize) -> Result<Deal, RuleViolation> {
    if players != PLAYER_COUNT {
        return Err(RuleViolation::Configuration { players });
    }
    let needed = DEALER_HAND_SIZE + HAND_SIZE * (PLAYER_COUNT - 1);
    if tiles.len() < needed {
        return Err(RuleViolation::ShortDeal {
            found: tiles.len(),
            needed,
        });
    }

    let reserve = tiles.split_off(needed);
    let mut remaining = tiles.into_iter();
    let hands = PlayerMap::new(|seat| {
        let size = if seat == PlayerId::DEALER {
            DEALER_HAND_SIZE
        } else {
            HAND_SIZE
        };
        remaining.by_ref().take(size).collect()
    });

    debug!(reserve = reserve.len(), "Tiles dealt");
    Ok(Deal { hands, reserve })
}
