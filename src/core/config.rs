//! Round configuration.
//!
//! A round is fully described by its `RoundConfig`: the seed that drives the
//! shuffle, the per-turn time budget, the first-meld threshold and which
//! seats are automated. Integrators build one with `Default` and the `with_*`
//! builder methods.

use serde::{Deserialize, Serialize};

use super::player::{PlayerId, PlayerMap};

/// Default per-turn countdown, in time units.
pub const DEFAULT_TURN_TIME: u32 = 30;

/// Minimum value of new melds in a player's first committing turn.
pub const INITIAL_MELD_THRESHOLD: u32 = 101;

/// Configuration for the baseline bot's initial-meld search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    /// The greedy initial-meld accumulation never exceeds this total.
    pub soft_cap: u32,

    /// Largest subset size considered by the candidate search.
    /// Bounds the brute-force enumeration over hands of up to 22 tiles.
    pub max_meld_len: usize,

    /// Hard stop on the number of valid candidates collected.
    pub max_candidates: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            soft_cap: 150,
            max_meld_len: 5,
            max_candidates: 20_000,
        }
    }
}

impl BotConfig {
    pub fn with_soft_cap(mut self, cap: u32) -> Self {
        self.soft_cap = cap;
        self
    }

    pub fn with_max_meld_len(mut self, len: usize) -> Self {
        self.max_meld_len = len;
        self
    }

    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max;
        self
    }
}

/// Configuration for a single round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Seed for the shuffle and open-tile pick.
    pub seed: u64,

    /// Time units a player has per turn before the engine forces the turn end.
    pub turn_time: u32,

    /// Minimum value of the melds committed in a player's first meld.
    pub initial_meld_threshold: u32,

    /// Which seats are driven by a bot. Seat 0 is human by default.
    pub bot_seats: PlayerMap<bool>,

    /// Settings for automated seats.
    pub bot: BotConfig,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            turn_time: DEFAULT_TURN_TIME,
            initial_meld_threshold: INITIAL_MELD_THRESHOLD,
            bot_seats: PlayerMap::new(|p| p != PlayerId::DEALER),
            bot: BotConfig::default(),
        }
    }
}

impl RoundConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_turn_time(mut self, turn_time: u32) -> Self {
        self.turn_time = turn_time;
        self
    }

    pub fn with_initial_meld_threshold(mut self, threshold: u32) -> Self {
        self.initial_meld_threshold = threshold;
        self
    }

    /// Mark every seat as a bot.
    pub fn all_bots(mut self) -> Self {
        self.bot_seats = PlayerMap::new(|_| true);
        self
    }

    pub fn with_bot_seat(mut self, seat: PlayerId, is_bot: bool) -> Self {
        self.bot_seats[seat] = is_bot;
        self
    }

    pub fn with_bot_config(mut self, bot: BotConfig) -> Self {
        self.bot = bot;
        self
    }

    #[must_use]
    pub fn is_bot(&self, seat: PlayerId) -> bool {
        self.bot_seats[seat]
    }
}
