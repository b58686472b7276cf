#![no_main]

//! Possession fuzzer.
//!
//! Applies arbitrary attach, steal, deposit, destroy and removal sequences to
//! a small world and checks ownership and conservation after each one.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use spirit_arena::game::{
    Bounds, Element, Team, TeamBase, Vec2, WorldState, check_invariants, deposit, steal,
};

#[derive(Arbitrary, Debug, Clone, Copy)]
enum Op {
    Attach { spirit: u8, agent: u8 },
    Steal { spirit: u8, agent: u8 },
    Deposit { agent: u8 },
    Destroy { spirit: u8 },
    Convert { spirit: u8, team: u8 },
    RemoveAgent { agent: u8 },
    Release { spirit: u8 },
}

fuzz_target!(|ops: Vec<Op>| {
    let mut world = WorldState::new(Bounds::new(600.0, 600.0));
    for (id, element) in [(0u8, Element::Fire), (1, Element::Ice), (2, Element::Air)] {
        world.add_team(
            Team::new(id, element),
            TeamBase {
                team: id,
                position: Vec2::new(100.0 + f32::from(id) * 200.0, 300.0),
                radius: 40.0,
                element,
            },
        );
    }
    let agents: Vec<_> = (0..6u8)
        .map(|i| world.spawn_agent(i % 3, Element::Fire, Vec2::new(50.0 + f32::from(i) * 80.0, 100.0), true))
        .collect();
    let spirits: Vec<_> = (0..16u8)
        .map(|i| world.spawn_spirit(Vec2::new(20.0 + f32::from(i) * 30.0, 500.0), Vec2::ZERO))
        .collect();

    let agent = |n: u8| agents[usize::from(n) % agents.len()];
    let spirit = |n: u8| spirits[usize::from(n) % spirits.len()];

    for (step, op) in ops.into_iter().take(500).enumerate() {
        let now = step as f64 * 16.0;
        match op {
            Op::Attach { spirit: s, agent: a } => {
                world.attach_spirit(spirit(s), agent(a));
            }
            Op::Steal { spirit: s, agent: a } => {
                steal(&mut world, spirit(s), agent(a));
            }
            Op::Deposit { agent: a } => {
                deposit(&mut world, agent(a));
            }
            Op::Destroy { spirit: s } => {
                world.destroy_spirit(spirit(s), now);
            }
            Op::Convert { spirit: s, team } => {
                world.convert_spirit(spirit(s), team % 4, now);
            }
            Op::RemoveAgent { agent: a } => {
                world.remove_agent(agent(a));
            }
            Op::Release { spirit: s } => {
                world.release_spirit(spirit(s));
            }
        }
        let violations = check_invariants(&world);
        assert!(violations.is_empty(), "Invariant violations after {op:?}: {violations:?}");
    }
});
