//! Round session and turn control.
//!
//! ## Overview
//!
//! - **Round**: owns one deal and enforces the draw → act → discard cycle
//! - **TurnTicket**: binds every command to the turn it was issued for
//! - **TurnClock**: countdown driven by the caller through `Round::tick`
//! - **Snapshots**: bincode images of a round for save and restore
//!
//! ## Usage
//!
//! ```
//! use okey_engine::core::{DrawSource, RoundConfig};
//! use okey_engine::turn::{Round, TurnPhase};
//!
//! let mut round = Round::new(RoundConfig::default().with_seed(7)).unwrap();
//! let ticket = round.start_turn().unwrap();
//!
//! round.draw_from(ticket, DrawSource::Reserve).unwrap();
//! round.commit_turn(ticket).unwrap();
//! round.discard(ticket, 0).unwrap();
//! assert_eq!(round.phase(), TurnPhase::TurnComplete);
//!
//! let next = round.end_turn().unwrap().ticket().unwrap();
//! assert_eq!(next.player.index(), 1);
//! ```

mod clock;
mod phase;
mod round;
mod snapshot;

pub use clock::{TurnClock, TurnTicket};
pub use phase::{CommitSummary, TimeoutReport, TurnAdvance, TurnPhase};
pub use round::{PlayerState, Round, DISCARD_PREVIEW};
pub use snapshot::{RoundSnapshot, SnapshotError};
