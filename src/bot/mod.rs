//! Automated players.
//!
//! A bot plays through the same `Round` commands as a human seat, within
//! its own turn and without waiting on the clock.
//!
//! ## Usage
//!
//! ```
//! use okey_engine::bot::{play_bot_turn, BaselineBot};
//! use okey_engine::core::RoundConfig;
//! use okey_engine::turn::Round;
//!
//! let mut round = Round::new(RoundConfig::default().all_bots()).unwrap();
//! let ticket = round.start_turn().unwrap();
//!
//! let turn = play_bot_turn(&BaselineBot, &mut round, ticket).unwrap();
//! assert!(turn.drew.is_some());
//! assert_eq!(round.tile_count(), 106);
//! ```

mod search;
mod strategy;

pub use search::{find_candidates, first_valid_triple, greedy_initial_meld, HandMask, MeldCandidate};
pub use strategy::{play_bot_turn, BaselineBot, BotStrategy, BotTurn};
