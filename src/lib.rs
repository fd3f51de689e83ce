//! # okey-engine
//!
//! Rule engine and turn state machine for four-player Okey 101.
//!
//! ## Design Principles
//!
//! 1. **Commands, not callbacks**: the engine never schedules anything. A
//!    driver (UI, server, simulator) issues commands and reports elapsed
//!    time; every command is checked against the turn it was issued for.
//!
//! 2. **All or nothing**: staged melds only touch the hand and table when a
//!    whole turn commits. A rejected command leaves the round unchanged.
//!
//! 3. **Deterministic**: one seed fixes the shuffle and open tile, so a
//!    round can be replayed or restored from a snapshot.
//!
//! ## Modules
//!
//! - `core`: Tiles, seats, staged actions, errors, RNG, configuration
//! - `deck`: Building, shuffling and dealing the 106-tile set
//! - `rules`: Combination validator, scoring, round outcome
//! - `table`: Melds committed this round
//! - `turn`: The `Round` session, turn clock and snapshots
//! - `bot`: Automated seats and the baseline strategy
//! - `sim`: Headless round driver

pub mod bot;
pub mod core;
pub mod deck;
pub mod rules;
pub mod sim;
pub mod table;
pub mod turn;

// Re-export commonly used types
pub use crate::core::{
    ActionId, BotConfig, DrawSource, GameRng, GameRngState, MeldRef, PendingAction, PlayerId,
    PlayerMap, RoundConfig, RoundEvent, RuleViolation, StagedAction, Tile, TileColor,
};

pub use crate::deck::{create_tiles, deal, determine_open_tile, shuffle_tiles, Deal, OpenTile};

pub use crate::rules::{classify, compute_score, is_valid_combination, meld_value, MeldKind, RoundOutcome};

pub use crate::table::{Meld, MeldId, Table};

pub use crate::turn::{
    CommitSummary, PlayerState, Round, RoundSnapshot, SnapshotError, TimeoutReport, TurnAdvance,
    TurnPhase, TurnTicket,
};

pub use crate::bot::{play_bot_turn, BaselineBot, BotStrategy, BotTurn};

pub use crate::sim::{simulate_round, RoundSummary};
