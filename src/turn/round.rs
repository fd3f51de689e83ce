//! The round session and its turn state machine.
//!
//! A `Round` owns everything about one deal: hands, piles, table, turn
//! index, clock and history. It is created by `initialize_round`, played by
//! issuing commands with the active seat's `TurnTicket`, and ends in a
//! terminal phase (`Won` or `Drawn`). There is no global instance; drivers
//! pass the round around explicitly and drop it when done.
//!
//! Invariant: hands + table + reserve + discard always hold exactly 106 tiles.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::clock::{TurnClock, TurnTicket};
use super::phase::{CommitSummary, TimeoutReport, TurnAdvance, TurnPhase};
use crate::core::{
    ActionId, DrawSource, GameRng, MeldRef, PendingAction, PlayerId, PlayerMap, RoundConfig,
    RoundEvent, RuleViolation, StagedAction, Tile, PLAYER_COUNT,
};
use crate::deck::{create_tiles, deal, determine_open_tile, shuffle_tiles, OpenTile};
use crate::rules::{classify, compute_score, meld_value, RoundOutcome};
use crate::table::{MeldId, Table};

/// How many discard-pile tiles presentation layers show by default.
pub const DISCARD_PREVIEW: usize = 10;

/// Per-seat state.
///
/// `score` is derived from `hand` and is recomputed whenever the engine
/// changes the hand or restores a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub hand: Vec<Tile>,
    pub has_initial_meld: bool,
    pub score: u32,
}

impl PlayerState {
    fn new(hand: Vec<Tile>) -> Self {
        let score = compute_score(&hand);
        Self {
            hand,
            has_initial_meld: false,
            score,
        }
    }

    pub(super) fn refresh_score(&mut self) {
        self.score = compute_score(&self.hand);
    }
}

/// One Okey 101 round.
#[derive(Clone, Debug)]
pub struct Round {
    pub(super) config: RoundConfig,
    pub(super) rng: GameRng,
    pub(super) open_tile: OpenTile,
    pub(super) players: PlayerMap<PlayerState>,
    /// Draw-only stack; top is the end of the vec.
    pub(super) reserve: Vec<Tile>,
    /// Top is the end of the vec (most recent discard).
    pub(super) discard: Vec<Tile>,
    pub(super) table: Table,
    pub(super) current: PlayerId,
    pub(super) phase: TurnPhase,
    pub(super) staged: Vec<StagedAction>,
    pub(super) next_action_id: u32,
    pub(super) clock: TurnClock,
    pub(super) generation: u64,
    pub(super) history: Vector<RoundEvent>,
}

impl Round {
    /// Shuffle, pick the open tile and deal a fresh round for four seats.
    pub fn new(config: RoundConfig) -> Result<Self, RuleViolation> {
        Self::initialize_round(config, PLAYER_COUNT)
    }

    /// Shuffle, pick the open tile and deal. Fails with a configuration
    /// error unless `players` is 4.
    pub fn initialize_round(config: RoundConfig, players: usize) -> Result<Self, RuleViolation> {
        if players != PLAYER_COUNT {
            return Err(RuleViolation::Configuration { players });
        }

        let mut rng = GameRng::new(config.seed);
        let mut tiles = create_tiles();
        shuffle_tiles(&mut tiles, &mut rng);
        let open_tile = determine_open_tile(&tiles, &mut rng);
        let dealt = deal(tiles, players)?;

        info!(
            seed = config.seed,
            open = %open_tile.open,
            false_joker = %open_tile.false_joker,
            reserve = dealt.reserve.len(),
            "Round initialized"
        );

        let mut hands = dealt.hands;
        Ok(Self {
            clock: TurnClock::new(config.turn_time),
            config,
            rng,
            open_tile,
            players: PlayerMap::new(|seat| PlayerState::new(std::mem::take(&mut hands[seat]))),
            reserve: dealt.reserve,
            discard: Vec::new(),
            table: Table::new(),
            current: PlayerId::DEALER,
            phase: TurnPhase::Dealt,
            staged: Vec::new(),
            next_action_id: 0,
            generation: 0,
            history: Vector::new(),
        })
    }

    // === Lifecycle ===

    /// Start the dealer's first turn.
    pub fn start_turn(&mut self) -> Result<TurnTicket, RuleViolation> {
        if self.phase != TurnPhase::Dealt {
            return Err(self.invalid_state("start_turn"));
        }
        Ok(self.begin_turn(PlayerId::DEALER))
    }

    /// Finish a completed turn: declare the winner or start the next seat's turn.
    pub fn end_turn(&mut self) -> Result<TurnAdvance, RuleViolation> {
        if self.phase != TurnPhase::TurnComplete {
            return Err(self.invalid_state("end_turn"));
        }
        Ok(self.finish_turn())
    }

    /// Report elapsed time to the turn clock.
    ///
    /// When the countdown runs out the engine ends the turn itself: staged
    /// actions are dropped, an undrawn seat draws (discard pile first), an
    /// owed discard takes hand index 0, and the next turn starts. Returns
    /// what was done, or `None` if the turn is still running.
    pub fn tick(&mut self, elapsed: u32) -> Option<TimeoutReport> {
        if !self.phase.is_timed() || !self.clock.tick(elapsed) {
            return None;
        }
        Some(self.force_timeout())
    }

    // === Commands ===

    /// Draw one tile to start acting.
    ///
    /// If both piles are empty the round ends drawn and `EmptySupply` is
    /// returned. If only the requested pile is empty the command is rejected.
    pub fn draw_from(&mut self, ticket: TurnTicket, source: DrawSource) -> Result<Tile, RuleViolation> {
        self.authorize(ticket, "draw")?;
        self.expect_phase(TurnPhase::AwaitDraw, "draw")?;

        if self.reserve.is_empty() && self.discard.is_empty() {
            self.enter_drawn();
            return Err(RuleViolation::EmptySupply);
        }

        let tile = self
            .pull(self.current, source)
            .ok_or(RuleViolation::SourceEmpty(source))?;
        self.phase = TurnPhase::Acting;
        Ok(tile)
    }

    /// Stage a new meld from hand indices. Nothing moves until `commit_turn`.
    pub fn stage_new_meld(
        &mut self,
        ticket: TurnTicket,
        hand_indices: &[usize],
    ) -> Result<ActionId, RuleViolation> {
        self.authorize(ticket, "stage_new_meld")?;
        self.expect_phase(TurnPhase::Acting, "stage_new_meld")?;
        self.check_free_indices(hand_indices)?;

        let hand = &self.players[self.current].hand;
        let tiles: Vec<Tile> = hand_indices.iter().map(|&i| hand[i]).collect();
        if classify(&tiles).is_none() {
            return Err(RuleViolation::InvalidCombination);
        }

        Ok(self.push_staged(PendingAction::new_meld(hand_indices)))
    }

    /// Stage appending one hand tile to a placed or staged meld.
    ///
    /// Whether the extended meld is valid is checked at commit, after every
    /// staged new meld exists.
    pub fn stage_append(
        &mut self,
        ticket: TurnTicket,
        hand_index: usize,
        target: impl Into<MeldRef>,
    ) -> Result<ActionId, RuleViolation> {
        self.authorize(ticket, "stage_append")?;
        self.expect_phase(TurnPhase::Acting, "stage_append")?;
        self.check_free_indices(&[hand_index])?;

        let target = target.into();
        match target {
            MeldRef::Placed(id) if !self.table.contains(id) => {
                return Err(RuleViolation::UnknownMeld(id));
            }
            MeldRef::Staged(action) if !self.is_staged_meld(action) => {
                return Err(RuleViolation::UnknownAction(action));
            }
            _ => {}
        }

        Ok(self.push_staged(PendingAction::append(hand_index, target)))
    }

    /// Remove one staged action. Appends onto a removed staged meld go with it.
    pub fn unstage(&mut self, ticket: TurnTicket, id: ActionId) -> Result<PendingAction, RuleViolation> {
        self.authorize(ticket, "unstage")?;
        self.expect_phase(TurnPhase::Acting, "unstage")?;

        let pos = self
            .staged
            .iter()
            .position(|s| s.id == id)
            .ok_or(RuleViolation::UnknownAction(id))?;
        let removed = self.staged.remove(pos);
        self.staged.retain(|s| {
            !matches!(s.action, PendingAction::Append { target: MeldRef::Staged(t), .. } if t == id)
        });
        debug!(seat = %self.current, action = %id, "Unstaged action");
        Ok(removed.action)
    }

    /// Drop every staged action. Returns how many there were.
    pub fn clear_staged(&mut self, ticket: TurnTicket) -> Result<usize, RuleViolation> {
        self.authorize(ticket, "clear_staged")?;
        self.expect_phase(TurnPhase::Acting, "clear_staged")?;

        let count = self.staged.len();
        self.staged.clear();
        Ok(count)
    }

    /// Apply all staged actions atomically: new melds first, then appends.
    ///
    /// Before a seat's initial meld, the new melds must be worth at least the
    /// configured threshold. An empty commit is always accepted and only
    /// moves on to the discard. On any rejection nothing is applied and the
    /// seat stays in `Acting` with its staged actions intact.
    pub fn commit_turn(&mut self, ticket: TurnTicket) -> Result<CommitSummary, RuleViolation> {
        self.authorize(ticket, "commit_turn")?;
        self.expect_phase(TurnPhase::Acting, "commit_turn")?;

        let seat = self.current;
        let hand = &self.players[seat].hand;
        let tile_at = |index: usize| {
            hand.get(index).copied().ok_or(RuleViolation::InvalidIndex {
                index,
                len: hand.len(),
            })
        };

        let mut scratch = self.table.clone();
        let mut created: Vec<(ActionId, MeldId)> = Vec::new();
        let mut value = 0;
        for staged in &self.staged {
            if let PendingAction::NewMeld { hand_indices } = &staged.action {
                let tiles = hand_indices
                    .iter()
                    .map(|&i| tile_at(i))
                    .collect::<Result<Vec<_>, _>>()?;
                value += meld_value(&tiles);
                created.push((staged.id, scratch.propose_new_meld(tiles)?));
            }
        }

        let initial = !self.players[seat].has_initial_meld && !self.staged.is_empty();
        let required = self.config.initial_meld_threshold;
        if initial && value < required {
            debug!(seat = %seat, value, required, "Initial meld below threshold");
            return Err(RuleViolation::InsufficientMeldValue { value, required });
        }

        let mut appended = Vec::new();
        for staged in &self.staged {
            if let PendingAction::Append { hand_index, target } = staged.action {
                let id = match target {
                    MeldRef::Placed(id) => id,
                    MeldRef::Staged(action) => created
                        .iter()
                        .find(|(a, _)| *a == action)
                        .map(|&(_, m)| m)
                        .ok_or(RuleViolation::UnknownAction(action))?,
                };
                let tile = tile_at(hand_index)?;
                scratch.extend_meld(id, tile)?;
                appended.push((id, tile));
            }
        }

        // Everything checked; apply.
        let mut consumed: Vec<usize> = self
            .staged
            .iter()
            .flat_map(|s| s.action.hand_indices().iter().copied())
            .collect();
        consumed.sort_unstable_by(|a, b| b.cmp(a));

        let player = &mut self.players[seat];
        for index in consumed {
            player.hand.remove(index);
        }
        if !self.staged.is_empty() {
            player.has_initial_meld = true;
        }
        player.refresh_score();
        let hand_empty = player.hand.is_empty();

        self.table = scratch;
        self.staged.clear();
        self.phase = if hand_empty {
            TurnPhase::TurnComplete
        } else {
            TurnPhase::AwaitDiscard
        };

        let new_melds: Vec<MeldId> = created.iter().map(|&(_, m)| m).collect();
        info!(
            seat = %seat,
            melds = new_melds.len(),
            appended = appended.len(),
            value,
            initial,
            "Turn committed"
        );
        self.history.push_back(RoundEvent::Committed {
            player: seat,
            new_melds: new_melds.clone(),
            appended: appended.clone(),
            initial,
        });

        Ok(CommitSummary {
            new_melds,
            appended: appended.len(),
            meld_value: value,
            initial,
        })
    }

    /// Discard one hand tile, completing the turn.
    pub fn discard(&mut self, ticket: TurnTicket, hand_index: usize) -> Result<Tile, RuleViolation> {
        self.authorize(ticket, "discard")?;
        self.expect_phase(TurnPhase::AwaitDiscard, "discard")?;

        let len = self.players[self.current].hand.len();
        if hand_index >= len {
            return Err(RuleViolation::InvalidIndex { index: hand_index, len });
        }

        let tile = self.push_discard(self.current, hand_index);
        self.phase = TurnPhase::TurnComplete;
        Ok(tile)
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.phase.outcome()
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    /// True if the active seat is automated.
    #[must_use]
    pub fn is_bot_turn(&self) -> bool {
        self.config.is_bot(self.current)
    }

    /// Ticket for the running turn, if one is running.
    #[must_use]
    pub fn current_ticket(&self) -> Option<TurnTicket> {
        (self.phase.is_timed() || self.phase == TurnPhase::TurnComplete).then_some(TurnTicket {
            player: self.current,
            generation: self.generation,
        })
    }

    /// A ticket naming `player` for the current generation. Commands issued
    /// with it by a non-active seat fail with `OutOfTurn`.
    #[must_use]
    pub fn ticket_for(&self, player: PlayerId) -> TurnTicket {
        TurnTicket {
            player,
            generation: self.generation,
        }
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[Tile] {
        &self.players[player].hand
    }

    #[must_use]
    pub fn score(&self, player: PlayerId) -> u32 {
        self.players[player].score
    }

    #[must_use]
    pub fn has_initial_meld(&self, player: PlayerId) -> bool {
        self.players[player].has_initial_meld
    }

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Up to `n` most recent discards, oldest first.
    #[must_use]
    pub fn discard_top(&self, n: usize) -> &[Tile] {
        let start = self.discard.len().saturating_sub(n);
        &self.discard[start..]
    }

    #[must_use]
    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    #[must_use]
    pub fn reserve_len(&self) -> usize {
        self.reserve.len()
    }

    #[must_use]
    pub fn open_tile(&self) -> Tile {
        self.open_tile.open
    }

    #[must_use]
    pub fn false_joker(&self) -> Tile {
        self.open_tile.false_joker
    }

    #[must_use]
    pub fn remaining_time(&self) -> u32 {
        self.clock.remaining()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn staged(&self) -> &[StagedAction] {
        &self.staged
    }

    #[must_use]
    pub fn history(&self) -> &Vector<RoundEvent> {
        &self.history
    }

    /// Tiles across hands, table and both piles. Always 106.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.players.values().map(|p| p.hand.len()).sum::<usize>()
            + self.table.tile_count()
            + self.reserve.len()
            + self.discard.len()
    }

    // === Internals ===

    fn begin_turn(&mut self, seat: PlayerId) -> TurnTicket {
        self.current = seat;
        self.generation += 1;
        self.phase = TurnPhase::AwaitDraw;
        self.staged.clear();
        self.next_action_id = 0;
        self.clock.reset();
        self.history.push_back(RoundEvent::TurnStarted {
            player: seat,
            generation: self.generation,
        });
        info!(seat = %seat, generation = self.generation, "Turn started");
        TurnTicket {
            player: seat,
            generation: self.generation,
        }
    }

    fn finish_turn(&mut self) -> TurnAdvance {
        let seat = self.current;
        let player = &self.players[seat];
        if player.hand.is_empty() && player.has_initial_meld {
            self.phase = TurnPhase::Won(seat);
            self.history.push_back(RoundEvent::Won { player: seat });
            info!(seat = %seat, "Round won");
            return TurnAdvance::Won(seat);
        }
        TurnAdvance::Next(self.begin_turn(seat.next()))
    }

    fn force_timeout(&mut self) -> TimeoutReport {
        let seat = self.current;
        let dropped_actions = self.staged.len();
        self.staged.clear();

        let expired = self.generation;
        self.generation += 1;
        self.history.push_back(RoundEvent::TimedOut {
            player: seat,
            generation: expired,
        });
        warn!(seat = %seat, generation = expired, dropped_actions, "Turn timed out");

        let mut drawn = None;
        if self.phase == TurnPhase::AwaitDraw {
            let source = if !self.discard.is_empty() {
                DrawSource::Discard
            } else {
                DrawSource::Reserve
            };
            drawn = self.pull(seat, source);
            if drawn.is_none() {
                self.enter_drawn();
                return TimeoutReport {
                    player: seat,
                    drawn,
                    discarded: None,
                    dropped_actions,
                    advance: TurnAdvance::Drawn,
                };
            }
        }

        let discarded = if self.players[seat].hand.is_empty() {
            None
        } else {
            Some(self.push_discard(seat, 0))
        };

        self.phase = TurnPhase::TurnComplete;
        let advance = self.finish_turn();
        TimeoutReport {
            player: seat,
            drawn,
            discarded,
            dropped_actions,
            advance,
        }
    }

    fn enter_drawn(&mut self) {
        self.phase = TurnPhase::Drawn;
        self.staged.clear();
        self.history.push_back(RoundEvent::Drawn);
        info!("Reserve and discard exhausted, round drawn");
    }

    /// Move the top tile of `source` into `seat`'s hand.
    fn pull(&mut self, seat: PlayerId, source: DrawSource) -> Option<Tile> {
        let tile = match source {
            DrawSource::Reserve => self.reserve.pop(),
            DrawSource::Discard => self.discard.pop(),
        }?;
        let player = &mut self.players[seat];
        player.hand.push(tile);
        player.refresh_score();
        self.history.push_back(RoundEvent::Drew {
            player: seat,
            source,
            tile,
        });
        debug!(seat = %seat, %source, %tile, "Drew tile");
        Some(tile)
    }

    /// Move a validated hand index onto the discard pile.
    fn push_discard(&mut self, seat: PlayerId, hand_index: usize) -> Tile {
        let player = &mut self.players[seat];
        let tile = player.hand.remove(hand_index);
        player.refresh_score();
        self.discard.push(tile);
        self.history.push_back(RoundEvent::Discarded { player: seat, tile });
        debug!(seat = %seat, %tile, "Discarded tile");
        tile
    }

    fn push_staged(&mut self, action: PendingAction) -> ActionId {
        let id = ActionId(self.next_action_id);
        self.next_action_id += 1;
        debug!(seat = %self.current, action = %id, ?action, "Staged action");
        self.staged.push(StagedAction { id, action });
        id
    }

    fn is_staged_meld(&self, id: ActionId) -> bool {
        self.staged
            .iter()
            .any(|s| s.id == id && matches!(s.action, PendingAction::NewMeld { .. }))
    }

    /// Indices must be in range, distinct, and not claimed by another staged action.
    fn check_free_indices(&self, indices: &[usize]) -> Result<(), RuleViolation> {
        let len = self.players[self.current].hand.len();
        for (k, &index) in indices.iter().enumerate() {
            if index >= len {
                return Err(RuleViolation::InvalidIndex { index, len });
            }
            let claimed = indices[..k].contains(&index)
                || self
                    .staged
                    .iter()
                    .any(|s| s.action.hand_indices().contains(&index));
            if claimed {
                return Err(RuleViolation::TileAlreadyStaged { index });
            }
        }
        Ok(())
    }

    fn authorize(&self, ticket: TurnTicket, command: &'static str) -> Result<(), RuleViolation> {
        if self.phase.is_terminal() {
            return Err(self.invalid_state(command));
        }
        if ticket.generation != self.generation {
            return Err(RuleViolation::NoLongerCurrentTurn {
                generation: ticket.generation,
            });
        }
        if ticket.player != self.current {
            return Err(RuleViolation::OutOfTurn {
                player: ticket.player,
                active: self.current,
            });
        }
        Ok(())
    }

    fn expect_phase(&self, expected: TurnPhase, command: &'static str) -> Result<(), RuleViolation> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(self.invalid_state(command))
        }
    }

    fn invalid_state(&self, command: &'static str) -> RuleViolation {
        RuleViolation::InvalidState {
            command,
            phase: self.phase.name(),
        }
    }
}

#[cfg(test)]
impl Round {
    /// Replace a seat's hand, moving the displaced tiles to the reserve so
    /// the tile count is unchanged. Tiles in `hand` are taken from wherever
    /// they currently sit in the reserve or other hands.
    pub(crate) fn rig_hand(&mut self, seat: PlayerId, hand: Vec<Tile>) {
        let old = std::mem::take(&mut self.players[seat].hand);
        self.reserve.extend(old);
        for tile in &hand {
            if let Some(pos) = self.reserve.iter().position(|t| t == tile) {
                self.reserve.remove(pos);
            } else {
                for (_, other) in self.players.iter_mut() {
                    if let Some(pos) = other.hand.iter().position(|t| t == tile) {
                        let replacement = self.reserve.pop().expect("reserve has tiles");
                        other.hand[pos] = replacement;
                        break;
                    }
                }
            }
        }
        self.players[seat].hand = hand;
        for (_, player) in self.players.iter_mut() {
            player.refresh_score();
        }
    }

    /// Empty both piles. Breaks tile conservation; only for end-of-supply tests.
    pub(crate) fn drain_supply(&mut self) {
        self.reserve.clear();
        self.discard.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TileColor::*;

    fn started() -> (Round, TurnTicket) {
        let mut round = Round::new(RoundConfig::default()).unwrap();
        let ticket = round.start_turn().unwrap();
        (round, ticket)
    }

    #[test]
    fn test_initialize_round() {
        let round = Round::new(RoundConfig::default()).unwrap();

        assert_eq!(round.phase(), TurnPhase::Dealt);
        assert_eq!(round.hand(PlayerId::new(0)).len(), 15);
        assert_eq!(round.hand(PlayerId::new(1)).len(), 14);
        assert_eq!(round.reserve_len(), 49);
        assert_eq!(round.discard_len(), 0);
        assert_eq!(round.tile_count(), 106);
        assert_eq!(round.false_joker(), round.open_tile().successor());
        assert_eq!(round.score(PlayerId::new(2)), compute_score(round.hand(PlayerId::new(2))));
    }

    #[test]
    fn test_wrong_player_count() {
        assert_eq!(
            Round::initialize_round(RoundConfig::default(), 3).err(),
            Some(RuleViolation::Configuration { players: 3 })
        );
    }

    #[test]
    fn test_same_seed_same_deal() {
        let a = Round::new(RoundConfig::default().with_seed(5)).unwrap();
        let b = Round::new(RoundConfig::default().with_seed(5)).unwrap();
        for seat in PlayerId::all() {
            assert_eq!(a.hand(seat), b.hand(seat));
        }
        assert_eq!(a.open_tile(), b.open_tile());
    }

    #[test]
    fn test_start_turn_only_once() {
        let (mut round, ticket) = started();
        assert_eq!(ticket.player, PlayerId::DEALER);
        assert_eq!(round.phase(), TurnPhase::AwaitDraw);
        assert!(matches!(
            round.start_turn(),
            Err(RuleViolation::InvalidState { command: "start_turn", .. })
        ));
    }

    #[test]
    fn test_draw_then_discard() {
        let (mut round, ticket) = started();

        assert_eq!(
            round.draw_from(ticket, DrawSource::Discard),
            Err(RuleViolation::SourceEmpty(DrawSource::Discard))
        );
        assert_eq!(round.phase(), TurnPhase::AwaitDraw);

        let tile = round.draw_from(ticket, DrawSource::Reserve).unwrap();
        assert_eq!(round.hand(PlayerId::DEALER).len(), 16);
        assert_eq!(round.hand(PlayerId::DEALER).last(), Some(&tile));
        assert_eq!(round.phase(), TurnPhase::Acting);

        round.commit_turn(ticket).unwrap();
        assert_eq!(round.phase(), TurnPhase::AwaitDiscard);

        let discarded = round.discard(ticket, 0).unwrap();
        assert_eq!(round.discard_top(1), &[discarded]);
        assert_eq!(round.phase(), TurnPhase::TurnComplete);
        assert_eq!(round.tile_count(), 106);

        let next = round.end_turn().unwrap().ticket().unwrap();
        assert_eq!(next.player, PlayerId::new(1));
        assert_eq!(round.current_player(), PlayerId::new(1));
    }

    #[test]
    fn test_stale_ticket_rejected() {
        let (mut round, ticket) = started();
        round.draw_from(ticket, DrawSource::Reserve).unwrap();
        round.commit_turn(ticket).unwrap();
        round.discard(ticket, 0).unwrap();
        round.end_turn().unwrap();

        assert_eq!(
            round.draw_from(ticket, DrawSource::Reserve),
            Err(RuleViolation::NoLongerCurrentTurn {
                generation: ticket.generation
            })
        );
    }

    #[test]
    fn test_out_of_turn() {
        let (mut round, _) = started();
        let intruder = round.ticket_for(PlayerId::new(2));
        assert_eq!(
            round.draw_from(intruder, DrawSource::Reserve),
            Err(RuleViolation::OutOfTurn {
                player: PlayerId::new(2),
                active: PlayerId::new(0),
            })
        );
    }

    #[test]
    fn test_stage_validation() {
        let (mut round, ticket) = started();
        round.rig_hand(
            PlayerId::DEALER,
            vec![
                Tile::new(Red, 10),
                Tile::new(Blue, 10),
                Tile::new(Black, 10),
                Tile::new(Yellow, 2),
            ],
        );
        round.draw_from(ticket, DrawSource::Reserve).unwrap();

        assert_eq!(
            round.stage_new_meld(ticket, &[0, 1, 3]),
            Err(RuleViolation::InvalidCombination)
        );
        assert_eq!(
            round.stage_new_meld(ticket, &[0, 1, 9]),
            Err(RuleViolation::InvalidIndex { index: 9, len: 5 })
        );
        assert_eq!(
            round.stage_new_meld(ticket, &[0, 0, 1]),
            Err(RuleViolation::TileAlreadyStaged { index: 0 })
        );

        let meld = round.stage_new_meld(ticket, &[0, 1, 2]).unwrap();
        assert_eq!(
            round.stage_append(ticket, 2, meld),
            Err(RuleViolation::TileAlreadyStaged { index: 2 })
        );
        assert_eq!(
            round.stage_append(ticket, 3, MeldId(4)),
            Err(RuleViolation::UnknownMeld(MeldId(4)))
        );

        // Staging leaves hand and table alone.
        assert_eq!(round.hand(PlayerId::DEALER).len(), 5);
        assert!(round.table().is_empty());
        assert_eq!(round.staged().len(), 1);
    }

    #[test]
    fn test_unstage_cascades_to_dependent_appends() {
        let (mut round, ticket) = started();
        round.rig_hand(
            PlayerId::DEALER,
            vec![
                Tile::new(Red, 11),
                Tile::new(Red, 12),
                Tile::new(Red, 13),
                Tile::new(Red, 10),
            ],
        );
        round.draw_from(ticket, DrawSource::Reserve).unwrap();

        let meld = round.stage_new_meld(ticket, &[0, 1, 2]).unwrap();
        round.stage_append(ticket, 3, meld).unwrap();
        assert_eq!(round.staged().len(), 2);

        round.unstage(ticket, meld).unwrap();
        assert!(round.staged().is_empty());
        assert_eq!(
            round.unstage(ticket, meld),
            Err(RuleViolation::UnknownAction(meld))
        );
    }

    #[test]
    fn test_initial_meld_threshold_is_atomic() {
        let (mut round, ticket) = started();
        // 10+10+10 = 30, far below 101
        round.rig_hand(
            PlayerId::DEALER,
            vec![
                Tile::new(Red, 10),
                Tile::new(Blue, 10),
                Tile::new(Black, 10),
                Tile::new(Yellow, 2),
            ],
        );
        round.draw_from(ticket, DrawSource::Reserve).unwrap();
        round.stage_new_meld(ticket, &[0, 1, 2]).unwrap();

        assert_eq!(
            round.commit_turn(ticket),
            Err(RuleViolation::InsufficientMeldValue {
                value: 30,
                required: 101
            })
        );
        assert_eq!(round.phase(), TurnPhase::Acting);
        assert_eq!(round.hand(PlayerId::DEALER).len(), 5);
        assert!(round.table().is_empty());
        assert!(!round.has_initial_meld(PlayerId::DEALER));
        assert_eq!(round.staged().len(), 1);

        assert_eq!(round.clear_staged(ticket), Ok(1));
        round.commit_turn(ticket).unwrap();
        assert!(!round.has_initial_meld(PlayerId::DEALER));
    }

    #[test]
    fn test_commit_applies_new_melds_before_appends() {
        let config = RoundConfig::default().with_initial_meld_threshold(30);
        let mut round = Round::new(config).unwrap();
        let ticket = round.start_turn().unwrap();
        round.rig_hand(
            PlayerId::DEALER,
            vec![
                Tile::new(Black, 9),
                Tile::new(Black, 10),
                Tile::new(Black, 11),
                Tile::new(Black, 12),
                Tile::new(Black, 13),
            ],
        );
        round.draw_from(ticket, DrawSource::Reserve).unwrap();

        // The 13 extends the 12, which itself extends the staged meld.
        let meld = round.stage_new_meld(ticket, &[0, 1, 2]).unwrap();
        round.stage_append(ticket, 3, meld).unwrap();
        round.stage_append(ticket, 4, meld).unwrap();
        let summary = round.commit_turn(ticket).unwrap();

        assert!(summary.initial);
        assert_eq!(summary.meld_value, 30);
        assert_eq!(summary.appended, 2);
        let placed = round.table().get(summary.new_melds[0]).unwrap();
        assert_eq!(placed.len(), 5);
        assert_eq!(round.hand(PlayerId::DEALER).len(), 1);
        assert_eq!(round.score(PlayerId::DEALER), compute_score(round.hand(PlayerId::DEALER)));
        assert_eq!(round.tile_count(), 106);
    }

    #[test]
    fn test_invalid_append_rejects_whole_commit() {
        let config = RoundConfig::default().with_initial_meld_threshold(30);
        let mut round = Round::new(config).unwrap();
        let ticket = round.start_turn().unwrap();
        round.rig_hand(
            PlayerId::DEALER,
            vec![
                Tile::new(Black, 9),
                Tile::new(Black, 10),
                Tile::new(Black, 11),
                Tile::new(Red, 5),
            ],
        );
        round.draw_from(ticket, DrawSource::Reserve).unwrap();

        let meld = round.stage_new_meld(ticket, &[0, 1, 2]).unwrap();
        round.stage_append(ticket, 3, meld).unwrap();

        assert_eq!(round.commit_turn(ticket), Err(RuleViolation::InvalidCombination));
        assert!(round.table().is_empty());
        assert_eq!(round.hand(PlayerId::DEALER).len(), 5);
        assert_eq!(round.phase(), TurnPhase::Acting);
    }

    #[test]
    fn test_timeout_forces_turn_end() {
        let (mut round, ticket) = started();
        round.draw_from(ticket, DrawSource::Reserve).unwrap();

        assert!(round.tick(29).is_none());
        assert_eq!(round.remaining_time(), 1);

        let report = round.tick(1).unwrap();
        assert_eq!(report.player, PlayerId::DEALER);
        assert!(report.drawn.is_none());
        assert!(report.discarded.is_some());
        assert_eq!(round.hand(PlayerId::DEALER).len(), 15);
        assert_eq!(round.current_player(), PlayerId::new(1));
        assert_eq!(round.remaining_time(), 30);

        // The late commit loses the race.
        assert!(matches!(
            round.commit_turn(ticket),
            Err(RuleViolation::NoLongerCurrentTurn { .. })
        ));
        assert_eq!(round.tile_count(), 106);
    }

    #[test]
    fn test_timeout_before_draw_draws_for_seat() {
        let (mut round, _) = started();
        let report = round.tick(30).unwrap();

        assert!(report.drawn.is_some());
        assert!(report.discarded.is_some());
        assert_eq!(round.hand(PlayerId::DEALER).len(), 15);
        assert_eq!(round.discard_len(), 1);
        assert!(matches!(report.advance, TurnAdvance::Next(t) if t.player == PlayerId::new(1)));
    }

    #[test]
    fn test_clock_idle_outside_turn() {
        let mut round = Round::new(RoundConfig::default()).unwrap();
        assert!(round.tick(1000).is_none());
        assert_eq!(round.phase(), TurnPhase::Dealt);
    }

    #[test]
    fn test_empty_supply_draws_round() {
        let (mut round, ticket) = started();
        round.drain_supply();

        assert_eq!(
            round.draw_from(ticket, DrawSource::Reserve),
            Err(RuleViolation::EmptySupply)
        );
        assert_eq!(round.phase(), TurnPhase::Drawn);
        assert_eq!(round.outcome(), Some(RoundOutcome::Draw));
        assert!(matches!(
            round.draw_from(ticket, DrawSource::Reserve),
            Err(RuleViolation::InvalidState { .. })
        ));
    }

    #[test]
    fn test_history_records_turn() {
        let (mut round, ticket) = started();
        round.draw_from(ticket, DrawSource::Reserve).unwrap();
        round.commit_turn(ticket).unwrap();
        round.discard(ticket, 0).unwrap();

        assert_eq!(round.history().len(), 4);
        assert!(matches!(round.history()[0], RoundEvent::TurnStarted { .. }));
        assert!(matches!(round.history()[3], RoundEvent::Discarded { .. }));
    }
}
