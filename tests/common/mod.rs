//! Shared helpers for integration tests.
#![allow(dead_code)]

use okey_engine::core::{PlayerId, Tile, TileColor};
use okey_engine::turn::{Round, RoundSnapshot};

/// Install a test-friendly tracing subscriber. Safe to call repeatedly.
///
/// The level comes from `TEST_LOG`, then `RUST_LOG`, then defaults to `warn`.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = std::env::var("TEST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .without_time()
        .try_init()
        .ok();
}

pub fn t(color: TileColor, number: u8) -> Tile {
    Tile::new(color, number)
}

/// Tiles `from..=to` of one color.
pub fn run(color: TileColor, from: u8, to: u8) -> Vec<Tile> {
    (from..=to).map(|n| Tile::new(color, n)).collect()
}

/// Take one copy of `tile` out of the reserve or, failing that, out of a
/// hand other than `except`, backfilling that hand from the reserve.
fn take_tile(snapshot: &mut RoundSnapshot, tile: Tile, except: PlayerId) {
    if let Some(pos) = snapshot.reserve.iter().position(|t| *t == tile) {
        snapshot.reserve.remove(pos);
        return;
    }
    for seat in PlayerId::all().filter(|s| *s != except) {
        let hand = &mut snapshot.players[seat].hand;
        if let Some(pos) = hand.iter().position(|t| *t == tile) {
            let backfill = snapshot.reserve.remove(0);
            snapshot.players[seat].hand[pos] = backfill;
            return;
        }
    }
    panic!("no free copy of {tile}");
}

/// Rebuild `round` with `seat` holding exactly `hand`. Displaced tiles go
/// to the reserve, so the round still holds 106 tiles.
pub fn with_hand(round: &Round, seat: PlayerId, hand: Vec<Tile>) -> Round {
    let mut snapshot = round.snapshot();
    let old = std::mem::take(&mut snapshot.players[seat].hand);
    snapshot.reserve.extend(old);
    for tile in &hand {
        take_tile(&mut snapshot, *tile, seat);
    }
    snapshot.players[seat].hand = hand;
    Round::restore(snapshot).expect("rigged round keeps every tile")
}

/// Rebuild `round` so the next reserve draw yields `tile`.
pub fn with_reserve_top(round: &Round, tile: Tile) -> Round {
    let mut snapshot = round.snapshot();
    let seat = round.current_player();
    take_tile(&mut snapshot, tile, seat);
    snapshot.reserve.push(tile);
    Round::restore(snapshot).expect("rigged round keeps every tile")
}
