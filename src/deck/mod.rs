//! The 106-tile set and the dealer.
//!
//! The dealer builds the tile multiset, shuffles it, turns an open tile to
//! derive the false joker and cuts the hands. Everything random goes through
//! the round's `GameRng`.

mod dealer;

pub use dealer::{
    create_tiles, deal, determine_open_tile, shuffle_tiles, Deal, OpenTile, DEALER_HAND_SIZE,
    HAND_SIZE, INITIAL_RESERVE, TILE_COUNT,
};
