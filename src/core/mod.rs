//! Core engine types: tiles, seats, staged actions, errors, RNG, configuration.
//!
//! Everything else in the crate is built from these primitives.

pub mod action;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod tile;

pub use action::{ActionId, DrawSource, MeldRef, PendingAction, RoundEvent, StagedAction};
pub use config::{BotConfig, RoundConfig, DEFAULT_TURN_TIME, INITIAL_MELD_THRESHOLD};
pub use error::RuleViolation;
pub use player::{InvalidSeat, PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::{GameRng, GameRngState};
pub use tile::{InvalidTile, Tile, TileColor, MAX_NUMBER};
