use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use okey_engine::bot::{find_candidates, BaselineBot};
use okey_engine::core::{GameRng, RoundConfig};
use okey_engine::deck::{create_tiles, shuffle_tiles};
use okey_engine::sim::simulate_round;

fn candidate_search(c: &mut Criterion) {
    let mut tiles = create_tiles();
    shuffle_tiles(&mut tiles, &mut GameRng::new(42));

    let mut group = c.benchmark_group("find_candidates");
    for hand_size in [15, 18, 22] {
        let hand = &tiles[..hand_size];
        group.bench_with_input(BenchmarkId::from_parameter(hand_size), hand, |b, hand| {
            b.iter(|| find_candidates(black_box(hand), 5, 20_000));
        });
    }
    group.finish();
}

fn simulated_round(c: &mut Criterion) {
    c.bench_function("simulate_round_200_turns", |b| {
        b.iter(|| {
            let config = RoundConfig::default().with_seed(7).all_bots();
            simulate_round(black_box(config), &BaselineBot, 200)
        });
    });
}

criterion_group!(benches, candidate_search, simulated_round);
criterion_main!(benches);
