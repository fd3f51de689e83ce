//! Combination legality.
//!
//! A combination is valid when it has at least three tiles and either every
//! tile is a true joker, or its non-joker tiles form one of two shapes:
//!
//! - **Set**: one number, pairwise-distinct colors.
//! - **Run**: one color, numbers strictly consecutive once sorted. Runs never
//!   wrap from 13 to 1.
//!
//! Jokers count toward the length but are not slotted into gaps. The false
//! joker needs no special case here: it is an ordinary tile and is judged by
//! its own color and number.
//!
//! ```
//! use okey_engine::core::{Tile, TileColor::*};
//! use okey_engine::rules::is_valid_combination;
//!
//! let set = [Tile::new(Red, 7), Tile::new(Blue, 7), Tile::new(Black, 7)];
//! assert!(is_valid_combination(&set));
//!
//! let run = [Tile::new(Yellow, 11), Tile::new(Yellow, 12), Tile::new(Yellow, 13)];
//! assert!(is_valid_combination(&run));
//!
//! let wrap = [Tile::new(Yellow, 12), Tile::new(Yellow, 13), Tile::new(Yellow, 1)];
//! assert!(!is_valid_combination(&wrap));
//! ```

use serde::{Deserialize, Serialize};

use crate::core::Tile;

/// Minimum number of tiles in a meld.
pub const MIN_MELD_LEN: usize = 3;

/// Shape of a valid combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeldKind {
    /// Only true jokers.
    Jokers,
    Set,
    Run,
}

/// Classify a tile sequence, or `None` if it is not a valid combination.
///
/// Total: never panics, whatever the input.
#[must_use]
pub fn classify(tiles: &[Tile]) -> Option<MeldKind> {
    if tiles.len() < MIN_MELD_LEN {
        return None;
    }

    let normals: Vec<Tile> = tiles.iter().copied().filter(|t| !t.is_joker()).collect();
    if normals.is_empty() {
        return Some(MeldKind::Jokers);
    }

    if is_set_shape(&normals) {
        Some(MeldKind::Set)
    } else if is_run_shape(&normals) {
        Some(MeldKind::Run)
    } else {
        None
    }
}

/// True if `tiles` forms a valid set, run or all-joker group.
#[must_use]
pub fn is_valid_combination(tiles: &[Tile]) -> bool {
    classify(tiles).is_some()
}

/// True if the non-joker tiles could still be part of a valid combination:
/// all one number with distinct colors, or all one color with distinct
/// numbers. Both properties hold for every subset of a valid combination.
#[must_use]
pub(crate) fn is_consistent_partial(tiles: &[Tile]) -> bool {
    let normals: Vec<Tile> = tiles.iter().copied().filter(|t| !t.is_joker()).collect();
    is_set_shape(&normals) || has_one_color_distinct_numbers(&normals)
}

fn is_set_shape(normals: &[Tile]) -> bool {
    let Some(first) = normals.first() else {
        return true;
    };
    let mut seen_colors = 0u8;
    for tile in normals {
        if tile.number() != first.number() || seen_colors & tile.color().bit() != 0 {
            return false;
        }
        seen_colors |= tile.color().bit();
    }
    true
}

fn is_run_shape(normals: &[Tile]) -> bool {
    let Some(first) = normals.first() else {
        return true;
    };
    if normals.iter().any(|t| t.color() != first.color()) {
        return false;
    }

    let mut numbers: Vec<u8> = normals.iter().map(|t| t.number()).collect();
    numbers.sort_unstable();
    numbers.windows(2).all(|w| w[1] == w[0] + 1)
}

fn has_one_color_distinct_numbers(normals: &[Tile]) -> bool {
    let Some(first) = normals.first() else {
        return true;
    };
    let mut seen_numbers = 0u16;
    for tile in normals {
        let bit = 1u16 << tile.number();
        if tile.color() != first.color() || seen_numbers & bit != 0 {
            return false;
        }
        seen_numbers |= bit;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TileColor::*;

    fn t(color: crate::core::TileColor, n: u8) -> Tile {
        Tile::new(color, n)
    }

    #[test]
    fn test_short_sequences_invalid() {
        assert!(!is_valid_combination(&[]));
        assert!(!is_valid_combination(&[t(Red, 1)]));
        assert!(!is_valid_combination(&[t(Red, 1), t(Red, 2)]));
        assert!(!is_valid_combination(&[Tile::joker(), Tile::joker()]));
    }

    #[test]
    fn test_sets() {
        assert_eq!(classify(&[t(Red, 9), t(Blue, 9), t(Yellow, 9)]), Some(MeldKind::Set));
        assert_eq!(
            classify(&[t(Red, 9), t(Blue, 9), t(Yellow, 9), t(Black, 9)]),
            Some(MeldKind::Set)
        );
        // repeated color
        assert_eq!(classify(&[t(Red, 9), t(Red, 9), t(Yellow, 9)]), None);
        // mixed numbers
        assert_eq!(classify(&[t(Red, 9), t(Blue, 8), t(Yellow, 9)]), None);
    }

    #[test]
    fn test_runs() {
        assert_eq!(classify(&[t(Black, 3), t(Black, 4), t(Black, 5)]), Some(MeldKind::Run));
        // order in the input does not matter
        assert_eq!(
            classify(&[t(Black, 6), t(Black, 4), t(Black, 5), t(Black, 3)]),
            Some(MeldKind::Run)
        );
        assert_eq!(classify(&[t(Black, 3), t(Black, 5), t(Black, 6)]), None);
        assert_eq!(classify(&[t(Black, 3), t(Red, 4), t(Black, 5)]), None);
        assert_eq!(classify(&[t(Red, 1), t(Red, 1), t(Red, 2)]), None);
    }

    #[test]
    fn test_no_wraparound() {
        assert!(!is_valid_combination(&[t(Blue, 12), t(Blue, 13), t(Blue, 1)]));
        assert!(!is_valid_combination(&[t(Blue, 13), t(Blue, 1), t(Blue, 2)]));
    }

    #[test]
    fn test_jokers() {
        assert_eq!(
            classify(&[Tile::joker(), Tile::joker(), Tile::joker()]),
            Some(MeldKind::Jokers)
        );
        // Jokers only pad the length; the normal tiles are judged alone.
        assert_eq!(classify(&[Tile::joker(), t(Red, 5), t(Blue, 5)]), Some(MeldKind::Set));
        assert_eq!(classify(&[t(Red, 5), Tile::joker(), t(Red, 6)]), Some(MeldKind::Run));
        assert_eq!(classify(&[t(Red, 5), Tile::joker(), t(Red, 7)]), None);
    }

    #[test]
    fn test_partial_consistency() {
        assert!(is_consistent_partial(&[t(Red, 1), t(Red, 3)]));
        assert!(is_consistent_partial(&[t(Red, 4), t(Blue, 4)]));
        assert!(is_consistent_partial(&[Tile::joker(), t(Blue, 4)]));
        assert!(!is_consistent_partial(&[t(Red, 4), t(Red, 4)]));
        assert!(!is_consistent_partial(&[t(Red, 4), t(Blue, 5)]));
    }
}
