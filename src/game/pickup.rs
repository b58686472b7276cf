//! Ability pickups: periodic world objects that grant a team an extra ability.

use rand::Rng;
use tracing::{debug, info};

use crate::game::frame::Frame;
use crate::game::{AbilityCatalog, AbilityId, Color, TeamId, Vec2, WorldState};

/// Unique identifier for a pickup.
pub type PickupId = u32;

/// A collectible orb granting an extra ability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityPickup {
    /// Unique identifier.
    pub id: PickupId,
    /// Position.
    pub position: Vec2,
    /// Touch radius.
    pub radius: f32,
}

/// Abilities `team` could still be granted: enabled, not already held and
/// not the toucher's innate ability.
#[must_use]
pub fn grantable(
    world: &WorldState,
    catalog: &AbilityCatalog,
    team: TeamId,
    innate: AbilityId,
) -> Vec<AbilityId> {
    let Some(held) = world.team(team) else {
        return Vec::new();
    };
    catalog
        .ids()
        .filter(|&id| id != innate && !held.has_extra(id))
        .collect()
}

/// Spawn a pickup when the interval has elapsed and there is room.
pub(crate) fn maybe_spawn(frame: &mut Frame<'_>, last_spawn: &mut f64) {
    let cfg = &frame.config.pickups;
    if frame.now - *last_spawn < cfg.interval_ms {
        return;
    }
    *last_spawn = frame.now;
    if frame.world.pickups().count() >= cfg.max_active {
        return;
    }
    let bounds = frame.world.bounds();
    let margin = cfg.radius.min(bounds.width / 2.0).min(bounds.height / 2.0);
    let position = Vec2::new(
        frame.rng.gen_range(margin..=bounds.width - margin),
        frame.rng.gen_range(margin..=bounds.height - margin),
    );
    let id = frame.world.spawn_pickup(position, cfg.radius);
    debug!(pickup = id, x = position.x, y = position.y, "pickup spawned");
}

/// Consume pickups touched by active agents.
///
/// A touched pickup is always consumed. When the team has nothing left to
/// gain, no ability is granted.
pub(crate) fn collect(frame: &mut Frame<'_>, catalog: &AbilityCatalog) {
    let pickups: Vec<AbilityPickup> = frame.world.pickups().copied().collect();
    let cap = frame.config.abilities.extra_ability_cap;

    for pickup in pickups {
        let toucher = frame.world.nearest_agent(pickup.position, |a| {
            a.is_active() && a.position.distance(pickup.position) <= pickup.radius
        });
        let Some(agent_id) = toucher else {
            continue;
        };
        let Some((team, innate)) = frame.world.agent(agent_id).map(|a| (a.team, a.innate())) else {
            continue;
        };
        frame.world.remove_pickup(pickup.id);

        let options = grantable(frame.world, catalog, team, innate);
        if options.is_empty() {
            debug!(team, "pickup consumed with nothing to grant");
            continue;
        }
        let ability = options[frame.rng.gen_range(0..options.len())];
        let evicted = frame
            .world
            .team_mut(team)
            .and_then(|t| t.grant_extra(ability, cap));
        frame.world.refresh_team_abilities(team, cap);
        frame
            .notifier
            .notify(pickup.position, &format!("{ability} unlocked"), Color::GOLD);
        info!(team, %ability, evicted = ?evicted, "extra ability granted");
    }
}
