#![no_main]

//! Full match fuzzer.
//!
//! Drives a small match with fuzzer-chosen human input between ticks:
//! 1. Steer human agents in arbitrary directions
//! 2. Request arbitrary abilities for arbitrary agents
//! 3. Advance by arbitrary (positive) deltas
//!
//! World invariants are checked after every tick.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use spirit_arena::ArenaConfig;
use spirit_arena::game::{
    AbilityId, MatchContext, NotificationLog, Simulation, Vec2, check_invariants,
};

/// One fuzzer-generated input step.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzInput {
    /// Steer the n-th agent.
    Steer { agent: u8, dx: i8, dy: i8 },
    /// Request an ability for the n-th agent, filling its charge first.
    Cast { agent: u8, ability: u8 },
    /// Advance the clock.
    Tick { delta: u8 },
}

/// Structured input for match fuzzing.
#[derive(Arbitrary, Debug)]
struct MatchInput {
    seed: u64,
    humans: u8,
    friendly_fire: bool,
    debug: bool,
    inputs: Vec<FuzzInput>,
}

fuzz_target!(|input: MatchInput| {
    let mut config = ArenaConfig::default();
    config.round.grace_ms = 0.0;
    config.round.human_agents = usize::from(input.humans % 13);
    config.round.debug = input.debug;
    config.abilities.friendly_fire = input.friendly_fire;
    config.agents.ability_chance = 0.05;
    config.spirits.count = 16;

    let Ok(mut sim) = Simulation::new(MatchContext::new(config, input.seed), NotificationLog::new())
    else {
        return;
    };

    let mut time = 0.0;
    for step in input.inputs.into_iter().take(2_000) {
        match step {
            FuzzInput::Steer { agent, dx, dy } => {
                let ids = sim.world().agent_ids();
                if let Some(&id) = ids.get(usize::from(agent) % ids.len().max(1)) {
                    sim.steer(id, Vec2::new(f32::from(dx), f32::from(dy)));
                }
            }
            FuzzInput::Cast { agent, ability } => {
                let ids = sim.world().agent_ids();
                if let Some(&id) = ids.get(usize::from(agent) % ids.len().max(1)) {
                    let max = sim.config().agents.charge_max;
                    if let Some(a) = sim.world_mut().agent_mut(id) {
                        a.charge = max;
                    }
                    let ability = AbilityId::ALL[usize::from(ability) % AbilityId::ALL.len()];
                    let _ = sim.activate_ability(id, ability);
                }
            }
            FuzzInput::Tick { delta } => {
                let delta = f64::from(delta.max(1));
                time += delta;
                sim.update(time, delta);
                let violations = check_invariants(sim.world());
                assert!(violations.is_empty(), "Invariant violations: {violations:?}");
            }
        }
    }
});
