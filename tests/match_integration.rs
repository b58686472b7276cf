//! Full-match integration tests.
//!
//! These run complete seeded matches with autonomous agents and check that
//! they finish, stay deterministic and never break world invariants.
//!
//! Run with: cargo test --release match_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use spirit_arena::game::{MatchContext, NotificationLog, Simulation, check_invariants};
use spirit_arena::runner::{DEFAULT_TICK_MS, run_batch, run_match};
use spirit_arena::{ArenaConfig, MatchError};

fn short_config(seconds: f64) -> ArenaConfig {
    let mut config = ArenaConfig::default();
    config.round.duration_ms = seconds * 1000.0;
    config
}

#[test]
fn test_thirty_second_match_no_panic() {
    let result = run_match(42, &short_config(30.0), DEFAULT_TICK_MS).unwrap();
    assert!(result.ticks >= 1800);
    assert_eq!(result.teams.len(), 4);
}

#[test]
fn test_multiple_seeds_keep_invariants() {
    let config = short_config(20.0);
    for seed in [1u64, 7, 99, 12345, 0xDEAD_BEEF] {
        let mut sim = Simulation::new(MatchContext::new(config.clone(), seed), NotificationLog::new()).unwrap();
        let mut time = 0.0;
        while !sim.is_round_over() {
            time += 20.0;
            sim.update(time, 20.0);
            let violations = check_invariants(sim.world());
            assert!(
                violations.is_empty(),
                "seed {seed} tick {}: {violations:?}",
                sim.ticks()
            );
        }
    }
}

#[test]
fn test_same_seed_same_result() {
    let config = short_config(15.0);
    let a = run_match(777, &config, DEFAULT_TICK_MS).unwrap();
    let b = run_match(777, &config, DEFAULT_TICK_MS).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_bots_score_over_a_long_match() {
    let result = run_match(2024, &short_config(90.0), DEFAULT_TICK_MS).unwrap();
    let deposited: u32 = result.teams.iter().map(|t| t.deposited).sum();
    assert!(deposited > 0, "no team deposited anything: {result:?}");
}

#[test]
fn test_debug_mode_with_friendly_fire_runs() {
    let mut config = short_config(20.0);
    config.round.debug = true;
    config.abilities.friendly_fire = true;
    config.agents.ability_chance = 0.2;
    config.round.team_elements = spirit_arena::Element::ALL[..8].to_vec();
    config.round.agents_per_team = 2;
    let mut sim = Simulation::new(MatchContext::new(config, 31), NotificationLog::new()).unwrap();
    let mut time = 0.0;
    while !sim.is_round_over() {
        time += 25.0;
        sim.update(time, 25.0);
        assert!(check_invariants(sim.world()).is_empty());
    }
    assert!(!sim.notifier().entries().is_empty());
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = short_config(10.0);
    config.world.width = -5.0;
    assert!(matches!(
        run_match(1, &config, DEFAULT_TICK_MS),
        Err(MatchError::Config(_))
    ));
}

#[test]
fn test_batch_aggregates_every_match() {
    let stats = run_batch(8, 500, &short_config(5.0), 25.0, || {}).unwrap();
    assert_eq!(stats.matches_played, 8);
    assert_eq!(stats.wins.iter().sum::<u64>() + stats.draws, 8);
    assert_eq!(stats.elements.len(), 4);
}
