//! Search benchmarks.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure:
//! - Full search with varying iteration budgets
//! - Greedy vs random rollout policies
//! - Root-parallel search against the sequential baseline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mcts::games::tile_line::TileLineState;
use mcts::{GameState, GreedyPolicy, Mcts, PlayerId, RandomPolicy, SearchConfig};

fn opening() -> TileLineState {
    TileLineState::random(24, 2024)
}

fn bench_search_budget(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_budget");
    let state = opening();
    let legal = state.get_available_moves(PlayerId::FIRST);

    for budget in [100u32, 1_000, 10_000] {
        group.throughput(Throughput::Elements(budget as u64));
        group.bench_with_input(BenchmarkId::new("greedy", budget), &budget, |b, &budget| {
            let config = SearchConfig::default().with_iterations(budget);
            let mut engine = Mcts::new(config, GreedyPolicy).unwrap();
            b.iter(|| {
                let mv = engine.select_move(&legal, &state, PlayerId::FIRST).unwrap();
                black_box(mv)
            })
        });
        group.bench_with_input(BenchmarkId::new("random", budget), &budget, |b, &budget| {
            let config = SearchConfig::default().with_iterations(budget);
            let mut engine = Mcts::new(config, RandomPolicy::new(7)).unwrap();
            b.iter(|| {
                let mv = engine.select_move(&legal, &state, PlayerId::FIRST).unwrap();
                black_box(mv)
            })
        });
    }

    group.finish();
}

fn bench_root_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("root_parallel");
    let state = opening();
    let legal = state.get_available_moves(PlayerId::FIRST);
    let budget = 4_000;

    for threads in [1usize, 2, 4, 8] {
        group.throughput(Throughput::Elements(budget as u64));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            let config = SearchConfig::default().with_iterations(budget).with_threads(threads);
            let mut engine = Mcts::new(config, GreedyPolicy).unwrap();
            b.iter(|| {
                let mv = engine.select_move(&legal, &state, PlayerId::FIRST).unwrap();
                black_box(mv)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_search_budget, bench_root_parallel);
criterion_main!(benches);
