//! Tile representation.
//!
//! A tile is a `(color, number)` pair. The four playing colors carry numbers
//! `1..=13`; true jokers use the `Joker` marker color and number `0`.
//!
//! Fields are private so the joker invariant holds by construction:
//! `is_joker() ⇔ color == Joker && number == 0`.
//!
//! ```
//! use okey_engine::core::{Tile, TileColor};
//!
//! let red_five = Tile::new(TileColor::Red, 5);
//! assert_eq!(red_five.number(), 5);
//! assert!(!red_five.is_joker());
//!
//! let joker = Tile::joker();
//! assert!(joker.is_joker());
//! assert_eq!(joker.number(), 0);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest face number on a tile.
pub const MAX_NUMBER: u8 = 13;

/// Tile color. `Joker` is reserved for true jokers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileColor {
    Red,
    Blue,
    Black,
    Yellow,
    Joker,
}

impl TileColor {
    /// The four playing colors, in deck-construction order.
    pub const PLAYING: [TileColor; 4] = [
        TileColor::Red,
        TileColor::Blue,
        TileColor::Black,
        TileColor::Yellow,
    ];

    /// Bit used for color-distinctness checks.
    #[must_use]
    pub(crate) const fn bit(self) -> u8 {
        match self {
            TileColor::Red => 1,
            TileColor::Blue => 1 << 1,
            TileColor::Black => 1 << 2,
            TileColor::Yellow => 1 << 3,
            TileColor::Joker => 1 << 4,
        }
    }
}

impl std::fmt::Display for TileColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TileColor::Red => "red",
            TileColor::Blue => "blue",
            TileColor::Black => "black",
            TileColor::Yellow => "yellow",
            TileColor::Joker => "joker",
        };
        f.write_str(name)
    }
}

/// A single tile.
///
/// Deserialization goes through the same checks as the constructors, so a
/// decoded tile always satisfies the joker invariant and the number range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTile")]
pub struct Tile {
    color: TileColor,
    number: u8,
}

/// Unchecked wire form of a tile.
#[derive(Deserialize)]
struct RawTile {
    color: TileColor,
    number: u8,
}

/// A `(color, number)` pair that is not a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("no such tile: {color} {number}")]
pub struct InvalidTile {
    pub color: TileColor,
    pub number: u8,
}

impl TryFrom<RawTile> for Tile {
    type Error = InvalidTile;

    fn try_from(raw: RawTile) -> Result<Self, Self::Error> {
        let valid = match raw.color {
            TileColor::Joker => raw.number == 0,
            _ => (1..=MAX_NUMBER).contains(&raw.number),
        };
        if valid {
            Ok(Self {
                color: raw.color,
                number: raw.number,
            })
        } else {
            Err(InvalidTile {
                color: raw.color,
                number: raw.number,
            })
        }
    }
}

impl Tile {
    /// Create a numbered tile.
    ///
    /// Panics if `color` is the joker marker or `number` is outside `1..=13`.
    #[must_use]
    pub fn new(color: TileColor, number: u8) -> Self {
        assert!(color != TileColor::Joker, "Use Tile::joker() for jokers");
        assert!(
            (1..=MAX_NUMBER).contains(&number),
            "Tile number must be 1-13, got {number}"
        );
        Self { color, number }
    }

    /// Create a true joker.
    #[must_use]
    pub const fn joker() -> Self {
        Self {
            color: TileColor::Joker,
            number: 0,
        }
    }

    #[must_use]
    pub const fn color(self) -> TileColor {
        self.color
    }

    /// Face number; `0` for true jokers.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.number
    }

    #[must_use]
    pub const fn is_joker(self) -> bool {
        matches!(self.color, TileColor::Joker)
    }

    /// The tile one step above this one in the same color, wrapping 13 → 1.
    ///
    /// Jokers map to jokers. Only used for false-joker derivation; runs never
    /// wrap.
    #[must_use]
    pub fn successor(self) -> Self {
        if self.is_joker() {
            return Self::joker();
        }
        let number = if self.number == MAX_NUMBER { 1 } else { self.number + 1 };
        Self {
            color: self.color,
            number,
        }
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_joker() {
            f.write_str("joker")
        } else {
            write!(f, "{} {}", self.color, self.number)
        }
    }
}
