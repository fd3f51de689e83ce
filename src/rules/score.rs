//! Scoring.
//!
//! Two different values are attached to tiles:
//!
//! - **Penalty** (`compute_score`): what a tile left in hand costs. Jokers
//!   cost 25, everything else its face number. Lower is better.
//! - **Meld value** (`meld_value`): what a tile contributes toward the
//!   first-meld threshold. Its face number; jokers contribute nothing.

use crate::core::Tile;

/// Penalty for a true joker left in hand.
pub const JOKER_PENALTY: u32 = 25;

/// Penalty of a single tile.
#[must_use]
pub fn tile_penalty(tile: Tile) -> u32 {
    if tile.is_joker() {
        JOKER_PENALTY
    } else {
        u32::from(tile.number())
    }
}

/// Penalty score of a hand.
///
/// ```
/// use okey_engine::core::{Tile, TileColor};
/// use okey_engine::rules::compute_score;
///
/// let hand = [Tile::new(TileColor::Red, 5), Tile::new(TileColor::Blue, 5), Tile::joker()];
/// assert_eq!(compute_score(&hand), 35);
/// ```
#[must_use]
pub fn compute_score(hand: &[Tile]) -> u32 {
    hand.iter().copied().map(tile_penalty).sum()
}

/// Point value of a meld toward the first-meld threshold.
#[must_use]
pub fn meld_value(tiles: &[Tile]) -> u32 {
    tiles.iter().map(|t| u32::from(t.number())).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TileColor::*;

    #[test]
    fn test_compute_score() {
        assert_eq!(compute_score(&[]), 0);
        assert_eq!(
            compute_score(&[Tile::new(Red, 5), Tile::new(Blue, 5), Tile::joker()]),
            35
        );
        assert_eq!(compute_score(&[Tile::new(Yellow, 13), Tile::new(Yellow, 13)]), 26);
    }

    #[test]
    fn test_meld_value_ignores_jokers() {
        assert_eq!(
            meld_value(&[Tile::new(Black, 12), Tile::joker(), Tile::new(Black, 13)]),
            25
        );
        assert_eq!(meld_value(&[Tile::joker(), Tile::joker(), Tile::joker()]), 0);
    }
}
