//! Headless round driver.
//!
//! Plays a whole round without a presentation layer. Bot seats play through
//! a `BotStrategy`; any human seat is left idle and its turn runs out on the
//! clock, which is what happens in a live game nobody touches.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bot::{play_bot_turn, BotStrategy};
use crate::core::{PlayerMap, RoundConfig, RuleViolation};
use crate::rules::RoundOutcome;
use crate::turn::{Round, TurnAdvance};

/// Turn cap used by `simulate_default`.
pub const DEFAULT_MAX_TURNS: usize = 1000;

/// How a simulated round went.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub seed: u64,
    /// `None` if the turn cap was hit first.
    pub outcome: Option<RoundOutcome>,
    pub turns: usize,
    /// Turns ended by the clock.
    pub timeouts: usize,
    /// Penalty score per seat when the simulation stopped.
    pub scores: PlayerMap<u32>,
    pub melds_on_table: usize,
    pub reserve_left: usize,
}

/// Play one round from `config` for at most `max_turns` turns.
pub fn simulate_round(
    config: RoundConfig,
    strategy: &dyn BotStrategy,
    max_turns: usize,
) -> Result<RoundSummary, RuleViolation> {
    let seed = config.seed;
    let mut round = Round::new(config)?;
    let mut ticket = round.start_turn()?;
    let mut turns = 0;
    let mut timeouts = 0;

    while turns < max_turns {
        turns += 1;
        let advance = if round.is_bot_turn() {
            play_bot_turn(strategy, &mut round, ticket)?.advance
        } else {
            timeouts += 1;
            let remaining = round.remaining_time();
            round
                .tick(remaining)
                .map(|report| report.advance)
                .ok_or(RuleViolation::InvalidState {
                    command: "tick",
                    phase: round.phase().name(),
                })?
        };

        match advance {
            TurnAdvance::Next(next) => ticket = next,
            TurnAdvance::Won(_) | TurnAdvance::Drawn => break,
        }
    }

    let summary = RoundSummary {
        seed,
        outcome: round.outcome(),
        turns,
        timeouts,
        scores: PlayerMap::new(|seat| round.score(seat)),
        melds_on_table: round.table().len(),
        reserve_left: round.reserve_len(),
    };
    info!(
        seed,
        turns,
        timeouts,
        outcome = ?summary.outcome,
        "Simulated round finished"
    );
    Ok(summary)
}

/// Play an all-bot round with `strategy` and the default turn cap.
pub fn simulate_default(seed: u64, strategy: &dyn BotStrategy) -> Result<RoundSummary, RuleViolation> {
    simulate_round(
        RoundConfig::default().with_seed(seed).all_bots(),
        strategy,
        DEFAULT_MAX_TURNS,
    )
}
