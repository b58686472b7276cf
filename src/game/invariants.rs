//! World invariants - sanity checks that detect bugs.
//!
//! These should never trigger in a correct simulation. They are bug
//! detectors, not gameplay limits.

use thiserror::Error;

use crate::game::WorldState;

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invariant violation: {message}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Check all world invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(world: &WorldState) -> Vec<InvariantViolation> {
    let mut violations: Vec<InvariantViolation> = world
        .possession()
        .consistency_errors()
        .into_iter()
        .map(InvariantViolation::new)
        .collect();

    // Owners and owned spirits must exist; in-flight spirits have no owner
    for owner in world.possession().owners() {
        if world.agent(owner).is_none() {
            violations.push(InvariantViolation::new(format!(
                "Missing agent {owner} still owns spirits"
            )));
        }
        for &spirit in world.possession().carried(owner) {
            match world.spirit(spirit) {
                None => violations.push(InvariantViolation::new(format!(
                    "Agent {owner} owns missing spirit {spirit}"
                ))),
                Some(s) if s.is_in_flight() => violations.push(InvariantViolation::new(format!(
                    "In-flight spirit {spirit} is owned by agent {owner}"
                ))),
                Some(_) => {}
            }
        }
    }

    // Conservation
    let ledger = world.ledger();
    let deposited: u64 = world.teams().map(|t| u64::from(t.deposited)).sum();
    let live = world.spirits().count() as u64;
    let expected = u64::from(ledger.spawned).saturating_sub(u64::from(ledger.destroyed));
    if deposited + live != expected {
        violations.push(InvariantViolation::new(format!(
            "Spirit conservation broken: deposited {deposited} + live {live} != spawned {} - destroyed {}",
            ledger.spawned, ledger.destroyed
        )));
    }

    // Agents
    let bounds = world.bounds();
    for agent in world.agents() {
        if !bounds.contains(agent.position) {
            violations.push(InvariantViolation::new(format!(
                "Agent {} at ({}, {}) is out of bounds",
                agent.id, agent.position.x, agent.position.y
            )));
        }
        if agent.unlocked.first() != Some(&agent.innate()) {
            violations.push(InvariantViolation::new(format!(
                "Agent {} does not list its innate ability first",
                agent.id
            )));
        }
        if world.team(agent.team).is_none() {
            violations.push(InvariantViolation::new(format!(
                "Agent {} belongs to unknown team {}",
                agent.id, agent.team
            )));
        }
    }

    violations
}

/// Assert all world invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(world: &WorldState) {
    let violations = check_invariants(world);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("World invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_world: &WorldState) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Bounds, Element, Team, TeamBase, Vec2};

    fn create_valid_world() -> WorldState {
        let mut world = WorldState::new(Bounds::new(300.0, 300.0));
        for (id, element) in [(0, Element::Fire), (1, Element::Ice)] {
            world.add_team(
                Team::new(id, element),
                TeamBase {
                    team: id,
                    position: Vec2::new(50.0 + f32::from(id) * 200.0, 150.0),
                    radius: 30.0,
                    element,
                },
            );
        }
        let a = world.spawn_agent(0, Element::Fire, Vec2::new(100.0, 100.0), true);
        world.spawn_agent(1, Element::Ice, Vec2::new(200.0, 100.0), true);
        let s = world.spawn_spirit(Vec2::new(100.0, 100.0), Vec2::ZERO);
        world.spawn_spirit(Vec2::new(150.0, 150.0), Vec2::ZERO);
        world.attach_spirit(s, a);
        world
    }

    #[test]
    fn test_valid_world_passes() {
        let world = create_valid_world();
        assert!(check_invariants(&world).is_empty());
    }

    #[test]
    fn test_conversion_keeps_conservation() {
        let mut world = create_valid_world();
        let spirit = world.spirits().next().map(|s| s.id).unwrap();
        world.convert_spirit(spirit, 0, 10.0);
        assert!(check_invariants(&world).is_empty());
    }

    #[test]
    fn test_untracked_removal_detected() {
        let mut world = create_valid_world();
        let spirit = world.spirits().next().map(|s| s.id).unwrap();
        world.remove_spirit(spirit);
        let violations = check_invariants(&world);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("conservation"));
    }

    #[test]
    fn test_out_of_bounds_agent_detected() {
        let mut world = create_valid_world();
        let id = world.agent_ids()[0];
        world.agent_mut(id).unwrap().position = Vec2::new(-10.0, 5.0);
        let violations = check_invariants(&world);
        assert!(violations.iter().any(|v| v.message.contains("out of bounds")));
    }

    #[test]
    fn test_owned_in_flight_spirit_detected() {
        let mut world = create_valid_world();
        let (owner, spirit) = {
            let owner = world.possession().owners().next().unwrap();
            (owner, world.possession().carried(owner)[0])
        };
        world.spirit_mut(spirit).unwrap().in_flight = Some(crate::game::InFlight {
            team: 0,
            target: Vec2::ZERO,
        });
        let violations = check_invariants(&world);
        assert!(
            violations
                .iter()
                .any(|v| v.message.contains(&format!("owned by agent {owner}")))
        );
    }
}
