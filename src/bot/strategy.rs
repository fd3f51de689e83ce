//! Bot decision traits and the turn driver that executes them.

use tracing::{debug, warn};

use super::search::{find_candidates, first_valid_triple, greedy_initial_meld};
use crate::core::{DrawSource, PlayerId, RuleViolation, Tile};
use crate::turn::{CommitSummary, Round, TurnAdvance, TurnPhase, TurnTicket};

/// Decision logic for an automated seat.
///
/// Implementations only decide. `play_bot_turn` turns the decisions into the
/// same commands a human seat would issue, so a strategy can never bypass
/// the rules.
pub trait BotStrategy: Send + Sync {
    /// Pile to draw from. Called in `AwaitDraw`.
    fn choose_draw(&self, round: &Round) -> DrawSource;

    /// New melds to stage, as hand indices. Called in `Acting`, after the
    /// draw. Returned groups must be disjoint.
    fn choose_melds(&self, round: &Round) -> Vec<Vec<usize>>;

    /// Hand index to discard. Called in `AwaitDiscard`.
    fn choose_discard(&self, round: &Round) -> usize;
}

/// The deterministic baseline.
///
/// - Draws from the discard pile when it has tiles, otherwise the reserve.
/// - Before its initial meld, greedily combines the highest-value disjoint
///   candidates until the threshold is met, or melds nothing.
/// - After it, lays down the first valid triple in hand order.
/// - Discards hand index 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct BaselineBot;

impl BotStrategy for BaselineBot {
    fn choose_draw(&self, round: &Round) -> DrawSource {
        if round.discard_len() > 0 {
            DrawSource::Discard
        } else {
            DrawSource::Reserve
        }
    }

    fn choose_melds(&self, round: &Round) -> Vec<Vec<usize>> {
        let seat = round.current_player();
        let hand = round.hand(seat);

        if round.has_initial_meld(seat) {
            return first_valid_triple(hand).map(|t| vec![t.to_vec()]).unwrap_or_default();
        }

        let config = round.config();
        let candidates = find_candidates(hand, config.bot.max_meld_len, config.bot.max_candidates);
        debug!(seat = %seat, candidates = candidates.len(), "Searched initial meld candidates");
        greedy_initial_meld(candidates, config.initial_meld_threshold, config.bot.soft_cap)
            .map(|chosen| chosen.into_iter().map(|c| c.indices.to_vec()).collect())
            .unwrap_or_default()
    }

    fn choose_discard(&self, _round: &Round) -> usize {
        0
    }
}

/// What a bot did on its turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotTurn {
    pub player: PlayerId,
    /// `None` if the supply was empty and the round ended drawn.
    pub drew: Option<Tile>,
    pub commit: Option<CommitSummary>,
    pub discarded: Option<Tile>,
    pub advance: TurnAdvance,
}

/// Play one whole turn for the active seat: draw, stage, commit, discard
/// and end the turn.
///
/// If the chosen melds are rejected, at staging or at commit, the bot clears
/// them and commits nothing, so illegal melds cost the seat its melds but
/// not the turn. An out-of-range discard index is still returned as an error.
pub fn play_bot_turn(
    strategy: &dyn BotStrategy,
    round: &mut Round,
    ticket: TurnTicket,
) -> Result<BotTurn, RuleViolation> {
    let player = ticket.player;

    let source = strategy.choose_draw(round);
    let drew = match round.draw_from(ticket, source) {
        Ok(tile) => tile,
        Err(RuleViolation::EmptySupply) => {
            return Ok(BotTurn {
                player,
                drew: None,
                commit: None,
                discarded: None,
                advance: TurnAdvance::Drawn,
            });
        }
        Err(e) => return Err(e),
    };

    let melds = strategy.choose_melds(round);
    let staged = melds
        .iter()
        .try_for_each(|indices| round.stage_new_meld(ticket, indices).map(drop));
    let commit = match staged.and_then(|()| round.commit_turn(ticket)) {
        Ok(_) if melds.is_empty() => None,
        Ok(summary) => Some(summary),
        Err(e) => {
            warn!(seat = %player, error = %e, "Bot melds rejected, committing nothing");
            round.clear_staged(ticket)?;
            round.commit_turn(ticket)?;
            None
        }
    };

    let discarded = if round.phase() == TurnPhase::AwaitDiscard {
        let index = strategy.choose_discard(round);
        Some(round.discard(ticket, index)?)
    } else {
        None
    };

    let advance = round.end_turn()?;
    Ok(BotTurn {
        player,
        drew: Some(drew),
        commit,
        discarded,
        advance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RoundConfig, TileColor::*};

    #[test]
    fn test_baseline_prefers_discard_pile() {
        let mut round = Round::new(RoundConfig::default()).unwrap();
        let ticket = round.start_turn().unwrap();
        assert_eq!(BaselineBot.choose_draw(&round), DrawSource::Reserve);

        round.draw_from(ticket, DrawSource::Reserve).unwrap();
        round.commit_turn(ticket).unwrap();
        round.discard(ticket, 0).unwrap();
        round.end_turn().unwrap();
        assert_eq!(BaselineBot.choose_draw(&round), DrawSource::Discard);
    }

    #[test]
    fn test_baseline_initial_meld() {
        let mut round = Round::new(RoundConfig::default()).unwrap();
        let ticket = round.start_turn().unwrap();
        round.rig_hand(
            PlayerId::DEALER,
            [13, 11, 9, 7]
                .into_iter()
                .flat_map(|n| [Tile::new(Red, n), Tile::new(Blue, n), Tile::new(Black, n)])
                .chain([Tile::new(Yellow, 2)])
                .collect(),
        );

        let turn = play_bot_turn(&BaselineBot, &mut round, ticket).unwrap();
        let commit = turn.commit.unwrap();
        assert!(commit.initial);
        assert!(commit.meld_value >= 101);
        assert!(round.has_initial_meld(PlayerId::DEALER));
        assert!(turn.discarded.is_some());
        assert_eq!(round.current_player(), PlayerId::new(1));
        assert_eq!(round.tile_count(), 106);
    }

    #[test]
    fn test_baseline_passes_below_threshold() {
        let mut round = Round::new(RoundConfig::default()).unwrap();
        let ticket = round.start_turn().unwrap();
        round.rig_hand(
            PlayerId::DEALER,
            vec![Tile::new(Red, 1), Tile::new(Red, 2), Tile::new(Red, 3), Tile::new(Blue, 8)],
        );

        let turn = play_bot_turn(&BaselineBot, &mut round, ticket).unwrap();
        assert!(turn.commit.is_none());
        assert!(!round.has_initial_meld(PlayerId::DEALER));
        assert_eq!(round.hand(PlayerId::DEALER).len(), 4);
    }

    #[test]
    fn test_bot_turn_on_empty_supply() {
        let mut round = Round::new(RoundConfig::default()).unwrap();
        let ticket = round.start_turn().unwrap();
        round.drain_supply();

        let turn = play_bot_turn(&BaselineBot, &mut round, ticket).unwrap();
        assert_eq!(turn.advance, TurnAdvance::Drawn);
        assert_eq!(round.phase(), TurnPhase::Drawn);
    }
}
