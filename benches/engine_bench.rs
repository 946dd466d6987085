use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use donathello::board::{GameState, Player};
use donathello::eval::{utility, WeightTable};
use donathello::movegen::{apply_move, legal_moves};
use donathello::protocol::parse_board;
use donathello::search::{SearchConfig, Searcher};

/// A 20-ply midgame reached by cycling through legal moves.
fn midgame() -> GameState {
    let mut state = GameState::start(8).unwrap();
    for i in 0..20 {
        let moves = legal_moves(&state);
        if moves.is_empty() {
            state = state.pass();
            continue;
        }
        state = apply_move(&state, moves[(i * 5 + 1) % moves.len()]);
    }
    state
}

fn bench_weight_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("weight_table_build");
    for size in [8usize, 16, 26] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| WeightTable::build(black_box(size)))
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let state = midgame();
    let table = WeightTable::build(8);
    c.bench_function("utility_midgame", |b| {
        b.iter(|| utility(black_box(&table), 0.5, black_box(&state), Player::Black))
    });
}

fn bench_legal_moves(c: &mut Criterion) {
    let state = midgame();
    c.bench_function("legal_moves_midgame", |b| {
        b.iter(|| legal_moves(black_box(&state)))
    });
}

fn bench_notation(c: &mut Criterion) {
    c.bench_function("parse_start_board", |b| {
        b.iter(|| parse_board(black_box("8/8/8/3wb3/3bw3/8/8/8 b")))
    });
}

fn bench_search(c: &mut Criterion) {
    let state = midgame();
    let mut group = c.benchmark_group("search_midgame");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);

    for depth in [3u32, 5] {
        for pruning in [true, false] {
            let config = SearchConfig::new(depth).unwrap().with_pruning(pruning);
            let mut searcher = Searcher::new(config);
            let id = if pruning { "alphabeta" } else { "minimax" };
            group.bench_with_input(BenchmarkId::new(id, depth), &state, |b, state| {
                b.iter(|| searcher.search_at_depth(black_box(state), depth).unwrap())
            });
        }
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_weight_table,
    bench_evaluate,
    bench_legal_moves,
    bench_notation,
    bench_search
);
criterion_main!(benches);
