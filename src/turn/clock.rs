//! Per-turn countdown and turn tickets.
//!
//! The engine never schedules callbacks. A driving loop reports elapsed time
//! through `Round::tick`, and every command carries the `TurnTicket` it was
//! issued for. Each started or force-ended turn bumps the generation, so a
//! ticket from a turn the timeout already ended is rejected instead of
//! mutating the next seat's turn.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Proof that a command belongs to a specific turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnTicket {
    pub player: PlayerId,
    pub generation: u64,
}

/// Countdown in abstract time units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnClock {
    turn_time: u32,
    remaining: u32,
}

impl TurnClock {
    #[must_use]
    pub fn new(turn_time: u32) -> Self {
        Self {
            turn_time,
            remaining: turn_time,
        }
    }

    /// Restart the countdown for a new turn.
    pub fn reset(&mut self) {
        self.remaining = self.turn_time;
    }

    /// Advance the clock. Returns true once the countdown has run out.
    pub fn tick(&mut self, elapsed: u32) -> bool {
        self.remaining = self.remaining.saturating_sub(elapsed);
        self.is_expired()
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }
}
