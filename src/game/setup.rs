//! Deterministic round setup: bases, teams, agents and the initial spirits.

// Placement math mixes counts and coordinates
#![allow(clippy::cast_precision_loss)]

use rand::Rng;
use rand::rngs::SmallRng;
use tracing::debug;

use crate::config::ArenaConfig;
use crate::error::SetupError;
use crate::game::{Bounds, Element, MAX_TEAMS, Team, TeamBase, TeamId, Vec2, WorldState};

/// Build the starting world for a round.
///
/// Bases sit on a ring around the center at equal angles with a random
/// rotation; agents start inside their base; spirits are scattered uniformly.
///
/// # Errors
///
/// Returns an error if the team count is out of range or the bases don't fit.
pub fn build_world(config: &ArenaConfig, rng: &mut SmallRng) -> Result<WorldState, SetupError> {
    let team_count = config.round.team_elements.len();
    if team_count < 2 {
        return Err(SetupError::TooFewTeams(team_count));
    }
    if team_count > MAX_TEAMS {
        return Err(SetupError::TooManyTeams(team_count));
    }

    let bounds = Bounds::new(config.world.width, config.world.height);
    let base_radius = config.bases.radius;
    let ring = bounds.width.min(bounds.height) * config.bases.ring_fraction;
    if ring + base_radius > bounds.width.min(bounds.height) / 2.0 {
        return Err(SetupError::WorldTooSmall {
            width: bounds.width,
            height: bounds.height,
            radius: base_radius,
        });
    }

    let mut world = WorldState::new(bounds);
    let center = bounds.center();
    let angle_step = std::f32::consts::TAU / team_count as f32;
    let angle_offset = rng.gen_range(0.0..std::f32::consts::TAU);

    for (index, &element) in config.round.team_elements.iter().enumerate() {
        let Ok(id) = TeamId::try_from(index) else {
            return Err(SetupError::TooManyTeams(team_count));
        };
        let angle = angle_offset + index as f32 * angle_step;
        let position = center + Vec2::from_angle(angle) * ring;
        world.add_team(
            Team::new(id, element),
            TeamBase {
                team: id,
                position,
                radius: base_radius,
                element,
            },
        );
    }

    let mut humans_left = config.round.human_agents;
    let team_ids: Vec<TeamId> = world.teams().map(|t| t.id).collect();
    for team in team_ids {
        let Some(base) = world.base(team).copied() else {
            continue;
        };
        for slot in 0..config.round.agents_per_team {
            let element = if slot == 0 || !config.round.mixed_elements {
                base.element
            } else {
                Element::ALL[rng.gen_range(0..Element::ALL.len())]
            };
            let offset = Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU))
                * rng.gen_range(0.0..=base_radius * 0.5);
            let autonomous = humans_left == 0;
            humans_left = humans_left.saturating_sub(1);
            world.spawn_agent(team, element, base.position + offset, autonomous);
        }
    }

    for _ in 0..config.spirits.count {
        world.spawn_random_spirit(rng, config.spirits.drift_speed);
    }

    debug!(
        teams = team_count,
        agents = world.agents().count(),
        spirits = config.spirits.count,
        "world built"
    );
    Ok(world)
}
