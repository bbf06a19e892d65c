//! Planner benchmarks.
//!
//! Run with: `cargo bench -p planners`
//!
//! Each benchmark makes one decision from the start of a built-in maze with a
//! fixed step budget, so the numbers compare per-step planner overhead.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use engine_core::{BudgetedEnv, Planner};
use games_maze::{layouts, Maze};
use planners::{build_planner, PlannerKind, PlannerSettings};

fn bench_decision(c: &mut Criterion) {
    let maze = Maze::parse(layouts::MEDIUM).unwrap();
    let start = maze.start_state();
    let settings = PlannerSettings::default();

    for budget in [100u64, 1000] {
        let mut group = c.benchmark_group(format!("decision_budget_{budget}"));
        group.throughput(Throughput::Elements(budget));

        for kind in PlannerKind::ALL {
            group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, &kind| {
                let mut planner = build_planner(kind, &settings).unwrap();
                let mut env = BudgetedEnv::new(maze.clone(), budget);
                b.iter(|| {
                    env.reset_budget(budget);
                    black_box(planner.choose_action(&mut env, black_box(&start)))
                });
            });
        }
        group.finish();
    }
}

fn bench_sequence_length(c: &mut Criterion) {
    let maze = Maze::parse(layouts::SMALL).unwrap();
    let start = maze.start_state();
    let mut group = c.benchmark_group("genetic_sequence_length");

    for length in [3usize, 5, 10, 20] {
        group.bench_with_input(BenchmarkId::from_parameter(length), &length, |b, &length| {
            let mut settings = PlannerSettings::default();
            settings.evolution = settings.evolution.with_sequence_length(length);
            let mut planner = build_planner(PlannerKind::Evolution, &settings).unwrap();
            let mut env = BudgetedEnv::new(maze.clone(), 500);
            b.iter(|| {
                env.reset_budget(500);
                black_box(planner.choose_action(&mut env, black_box(&start)))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decision, bench_sequence_length);
criterion_main!(benches);
