//! Benchmarks for running complete matches.
//!
//! This benchmarks the full simulation tick loop, the hot path of the batch runner.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use spirit_arena::ArenaConfig;
use spirit_arena::game::{MatchContext, NotificationLog, Simulation};
use spirit_arena::runner::{DEFAULT_TICK_MS, run_match};

fn config_with_duration(seconds: f64) -> ArenaConfig {
    let mut config = ArenaConfig::default();
    config.round.duration_ms = seconds * 1000.0;
    config
}

fn bench_single_match(c: &mut Criterion) {
    let config = config_with_duration(30.0);

    c.bench_function("match_30s_4_teams", |b| {
        b.iter(|| {
            let result = run_match(black_box(42), black_box(&config), DEFAULT_TICK_MS);
            black_box(result)
        });
    });
}

fn bench_crowded_match(c: &mut Criterion) {
    // Eight teams, more spirits and bots casting often
    let mut config = config_with_duration(30.0);
    config.round.team_elements = spirit_arena::Element::ALL[..8].to_vec();
    config.spirits.count = 64;
    config.agents.ability_chance = 0.05;

    c.bench_function("match_30s_8_teams_crowded", |b| {
        b.iter(|| {
            let result = run_match(black_box(7), black_box(&config), DEFAULT_TICK_MS);
            black_box(result)
        });
    });
}

fn bench_single_tick(c: &mut Criterion) {
    // Steady-state tick cost after the grace period
    let config = config_with_duration(600.0);
    let mut sim = Simulation::new(MatchContext::new(config, 3), NotificationLog::new())
        .unwrap_or_else(|e| panic!("setup failed: {e}"));
    let mut time = 0.0;
    while time < 10_000.0 {
        time += DEFAULT_TICK_MS;
        sim.update(time, DEFAULT_TICK_MS);
    }

    c.bench_function("single_tick_4_teams", |b| {
        b.iter(|| {
            time += DEFAULT_TICK_MS;
            sim.update(black_box(time), DEFAULT_TICK_MS);
        });
    });
}

criterion_group!(benches, bench_single_match, bench_crowded_match, bench_single_tick);
criterion_main!(benches);
