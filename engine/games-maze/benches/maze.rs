//! Maze environment benchmarks.
//!
//! Run with: `cargo bench -p games-maze`
//!
//! Planner throughput is bounded by these primitives, since every budgeted
//! step calls `successor` and every expansion calls `legal_actions`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use engine_core::{BudgetedEnv, Environment, Game};
use games_maze::{layouts, Maze, Move};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn bench_successor(c: &mut Criterion) {
    let mut maze = Maze::parse(layouts::MEDIUM).unwrap();
    let start = maze.start_state();
    let mut rng = ChaCha20Rng::seed_from_u64(42);

    c.bench_function("maze_successor", |b| {
        b.iter(|| black_box(maze.successor(black_box(&start), Move::East, &mut rng)))
    });
}

fn bench_legal_actions(c: &mut Criterion) {
    let maze = Maze::parse(layouts::MEDIUM).unwrap();
    let start = maze.start_state();

    c.bench_function("maze_legal_actions", |b| {
        b.iter(|| black_box(maze.legal_actions(black_box(&start))))
    });
}

fn bench_heuristic(c: &mut Criterion) {
    let maze = Maze::parse(layouts::MEDIUM).unwrap();
    let start = maze.start_state();

    c.bench_function("maze_heuristic", |b| {
        b.iter(|| black_box(maze.heuristic(black_box(&start))))
    });
}

fn bench_metered_step(c: &mut Criterion) {
    let maze = Maze::parse(layouts::MEDIUM).unwrap();
    let start = maze.start_state();
    let mut env = BudgetedEnv::new(maze, u64::MAX);

    c.bench_function("maze_metered_step", |b| {
        b.iter(|| black_box(env.step(black_box(&start), Move::East)))
    });
}

fn bench_shortest_win(c: &mut Criterion) {
    let mut group = c.benchmark_group("maze_shortest_win");
    for name in ["tiny", "small"] {
        let maze = Maze::parse(layouts::by_name(name).unwrap()).unwrap();
        let start = maze.start_state();
        group.bench_with_input(BenchmarkId::from_parameter(name), &start, |b, start| {
            b.iter(|| black_box(maze.shortest_win(start)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_successor,
    bench_legal_actions,
    bench_heuristic,
    bench_metered_step,
    bench_shortest_win,
);
criterion_main!(benches);
