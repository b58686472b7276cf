//! The shared world: every entity collection plus the mutation primitives
//! the subsystems build on.
//!
//! Collections are keyed by id in ordered maps so every scan visits entities
//! in the same order for a given seed.

use std::collections::BTreeMap;

use rand::Rng;
use rand::rngs::SmallRng;

use crate::game::{
    AbilityPickup, Agent, AgentId, Bounds, Element, Obstacle, ObstacleId, PickupId,
    PossessionChain, Spirit, SpiritId, SpiritLedger, Team, TeamBase, TeamId, TimedEvent, Timeline,
    Vec2,
};

/// Complete mutable state of one round.
#[derive(Debug, Clone)]
pub struct WorldState {
    bounds: Bounds,
    agents: BTreeMap<AgentId, Agent>,
    spirits: BTreeMap<SpiritId, Spirit>,
    teams: BTreeMap<TeamId, Team>,
    bases: BTreeMap<TeamId, TeamBase>,
    obstacles: BTreeMap<ObstacleId, Obstacle>,
    pickups: BTreeMap<PickupId, AbilityPickup>,
    possession: PossessionChain,
    timeline: Timeline,
    ledger: SpiritLedger,
    next_agent: AgentId,
    next_spirit: SpiritId,
    next_obstacle: ObstacleId,
    next_pickup: PickupId,
}

impl WorldState {
    /// Create an empty world.
    #[must_use]
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            agents: BTreeMap::new(),
            spirits: BTreeMap::new(),
            teams: BTreeMap::new(),
            bases: BTreeMap::new(),
            obstacles: BTreeMap::new(),
            pickups: BTreeMap::new(),
            possession: PossessionChain::new(),
            timeline: Timeline::new(),
            ledger: SpiritLedger::default(),
            next_agent: 1,
            next_spirit: 1,
            next_obstacle: 1,
            next_pickup: 1,
        }
    }

    /// World extent.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Uniformly random point inside the world.
    pub fn random_point(&self, rng: &mut SmallRng) -> Vec2 {
        Vec2::new(
            rng.gen_range(0.0..=self.bounds.width),
            rng.gen_range(0.0..=self.bounds.height),
        )
    }

    // Teams and bases

    /// Register a team and its base.
    pub fn add_team(&mut self, team: Team, base: TeamBase) {
        self.bases.insert(team.id, base);
        self.teams.insert(team.id, team);
    }

    /// Look up a team.
    #[must_use]
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(&id)
    }

    /// Look up a team mutably.
    pub fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.get_mut(&id)
    }

    /// All teams in id order.
    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    /// Base of a team.
    #[must_use]
    pub fn base(&self, team: TeamId) -> Option<&TeamBase> {
        self.bases.get(&team)
    }

    /// All bases in team order.
    pub fn bases(&self) -> impl Iterator<Item = &TeamBase> {
        self.bases.values()
    }

    /// Rebuild the unlocked abilities of every agent on `team`.
    pub fn refresh_team_abilities(&mut self, team: TeamId, cap: usize) {
        let Some(extras) = self.teams.get(&team).map(|t| t.extras().copied().collect::<Vec<_>>()) else {
            return;
        };
        for agent in self.agents.values_mut().filter(|a| a.team == team) {
            agent.refresh_unlocked(&extras, cap);
        }
    }

    // Agents

    /// Spawn an agent and return its id.
    pub fn spawn_agent(&mut self, team: TeamId, element: Element, position: Vec2, autonomous: bool) -> AgentId {
        let id = self.next_agent;
        self.next_agent += 1;
        let position = self.bounds.clamp(position);
        self.agents.insert(id, Agent::new(id, team, element, position, autonomous));
        id
    }

    /// Remove an agent. Everything it carried becomes free.
    pub fn remove_agent(&mut self, id: AgentId) -> Option<Agent> {
        self.possession.release_all(id);
        self.agents.remove(&id)
    }

    /// Look up an agent.
    #[must_use]
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Look up an agent mutably.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    /// All agents in id order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Snapshot of agent ids, for loops that mutate the world.
    #[must_use]
    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    /// Whether two agents are on different teams. Unknown agents are never hostile.
    #[must_use]
    pub fn is_hostile(&self, a: AgentId, b: AgentId) -> bool {
        match (self.agents.get(&a), self.agents.get(&b)) {
            (Some(a), Some(b)) => a.team != b.team,
            _ => false,
        }
    }

    /// Agents whose position lies within `radius` of `center`, in id order.
    #[must_use]
    pub fn agents_within(&self, center: Vec2, radius: f32) -> Vec<AgentId> {
        let r2 = radius * radius;
        self.agents
            .values()
            .filter(|a| a.position.distance_squared(center) <= r2)
            .map(|a| a.id)
            .collect()
    }

    /// Nearest agent matching `predicate`. Ties go to the lower id.
    pub fn nearest_agent(&self, from: Vec2, predicate: impl Fn(&Agent) -> bool) -> Option<AgentId> {
        self.agents
            .values()
            .filter(|a| predicate(a))
            .min_by(|a, b| {
                a.position
                    .distance_squared(from)
                    .total_cmp(&b.position.distance_squared(from))
            })
            .map(|a| a.id)
    }

    // Spirits

    /// Spawn a free spirit and return its id.
    pub fn spawn_spirit(&mut self, position: Vec2, drift: Vec2) -> SpiritId {
        let id = self.next_spirit;
        self.next_spirit += 1;
        self.spirits.insert(id, Spirit::new(id, self.bounds.clamp(position), drift));
        self.ledger.spawned += 1;
        id
    }

    /// Spawn a spirit that is removed at `expires_at` and never respawns.
    pub fn spawn_temporary_spirit(&mut self, position: Vec2, drift: Vec2, expires_at: f64) -> SpiritId {
        let id = self.spawn_spirit(position, drift);
        if let Some(spirit) = self.spirits.get_mut(&id) {
            spirit.expires_at = Some(expires_at);
        }
        id
    }

    /// Spawn a spirit at a random point with a random drift.
    pub fn spawn_random_spirit(&mut self, rng: &mut SmallRng, drift_speed: f32) -> SpiritId {
        let position = self.random_point(rng);
        let drift = Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU)) * drift_speed;
        self.spawn_spirit(position, drift)
    }

    /// Look up a spirit.
    #[must_use]
    pub fn spirit(&self, id: SpiritId) -> Option<&Spirit> {
        self.spirits.get(&id)
    }

    /// Look up a spirit mutably.
    pub fn spirit_mut(&mut self, id: SpiritId) -> Option<&mut Spirit> {
        self.spirits.get_mut(&id)
    }

    /// All spirits in id order.
    pub fn spirits(&self) -> impl Iterator<Item = &Spirit> {
        self.spirits.values()
    }

    /// Spirits that are neither owned nor in flight.
    #[must_use]
    pub fn free_spirit_ids(&self) -> Vec<SpiritId> {
        self.spirits
            .values()
            .filter(|s| !s.is_in_flight() && !self.possession.is_owned(s.id))
            .map(|s| s.id)
            .collect()
    }

    /// Spirits within `radius` of `center`, in id order.
    #[must_use]
    pub fn spirits_within(&self, center: Vec2, radius: f32) -> Vec<SpiritId> {
        let r2 = radius * radius;
        self.spirits
            .values()
            .filter(|s| s.position.distance_squared(center) <= r2)
            .map(|s| s.id)
            .collect()
    }

    /// Nearest free spirit, optionally limited to `max_distance`.
    #[must_use]
    pub fn nearest_free_spirit(&self, from: Vec2, max_distance: Option<f32>) -> Option<SpiritId> {
        let limit = max_distance.map(|d| d * d);
        self.spirits
            .values()
            .filter(|s| !s.is_in_flight() && !self.possession.is_owned(s.id))
            .map(|s| (s.id, s.position.distance_squared(from)))
            .filter(|&(_, d2)| limit.is_none_or(|l| d2 <= l))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Remove a spirit without crediting anyone. Counts as destroyed.
    ///
    /// Permanent spirits get a respawn scheduled at `respawn_at`.
    pub fn destroy_spirit(&mut self, id: SpiritId, respawn_at: f64) -> bool {
        let Some(spirit) = self.remove_spirit(id) else {
            return false;
        };
        self.ledger.destroyed += 1;
        if !spirit.is_temporary() {
            self.timeline.schedule(respawn_at, TimedEvent::RespawnSpirit);
        }
        true
    }

    /// Remove a spirit and credit it to `team` as deposited (no score change).
    ///
    /// Permanent spirits get a respawn scheduled at `respawn_at`.
    pub fn convert_spirit(&mut self, id: SpiritId, team: TeamId, respawn_at: f64) -> bool {
        let Some(spirit) = self.remove_spirit(id) else {
            return false;
        };
        match self.teams.get_mut(&team) {
            Some(team) => team.deposited += 1,
            None => self.ledger.destroyed += 1,
        }
        if !spirit.is_temporary() {
            self.timeline.schedule(respawn_at, TimedEvent::RespawnSpirit);
        }
        true
    }

    /// Take a spirit out of the world, releasing any owner. No bookkeeping.
    pub(crate) fn remove_spirit(&mut self, id: SpiritId) -> Option<Spirit> {
        self.possession.release(id);
        self.spirits.remove(&id)
    }

    // Possession

    /// The ownership index.
    #[must_use]
    pub const fn possession(&self) -> &PossessionChain {
        &self.possession
    }

    /// Give a spirit to an agent. Fails for unknown ids and in-flight spirits.
    pub fn attach_spirit(&mut self, spirit: SpiritId, owner: AgentId) -> bool {
        let attachable = self.spirits.get(&spirit).is_some_and(|s| !s.is_in_flight());
        if !attachable || !self.agents.contains_key(&owner) {
            return false;
        }
        self.possession.attach(spirit, owner);
        true
    }

    /// Make a spirit free.
    pub fn release_spirit(&mut self, spirit: SpiritId) -> Option<AgentId> {
        self.possession.release(spirit)
    }

    /// Make everything `owner` carries free.
    pub fn release_all(&mut self, owner: AgentId) -> Vec<SpiritId> {
        self.possession.release_all(owner)
    }

    // Obstacles and pickups

    /// Place an obstacle.
    pub fn spawn_obstacle(&mut self, position: Vec2, radius: f32) -> ObstacleId {
        let id = self.next_obstacle;
        self.next_obstacle += 1;
        self.obstacles.insert(id, Obstacle { id, position, radius });
        id
    }

    /// Remove an obstacle.
    pub fn remove_obstacle(&mut self, id: ObstacleId) -> Option<Obstacle> {
        self.obstacles.remove(&id)
    }

    /// All obstacles.
    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.values()
    }

    /// Place an ability pickup.
    pub fn spawn_pickup(&mut self, position: Vec2, radius: f32) -> PickupId {
        let id = self.next_pickup;
        self.next_pickup += 1;
        self.pickups.insert(id, AbilityPickup { id, position, radius });
        id
    }

    /// Remove a pickup.
    pub fn remove_pickup(&mut self, id: PickupId) -> Option<AbilityPickup> {
        self.pickups.remove(&id)
    }

    /// All pickups.
    pub fn pickups(&self) -> impl Iterator<Item = &AbilityPickup> {
        self.pickups.values()
    }

    // Bookkeeping

    /// Pending delayed events.
    #[must_use]
    pub const fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Pending delayed events, mutably.
    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    /// Spawn and destruction totals.
    #[must_use]
    pub const fn ledger(&self) -> SpiritLedger {
        self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn world() -> WorldState {
        let mut world = WorldState::new(Bounds::new(400.0, 300.0));
        world.add_team(
            Team::new(0, Element::Fire),
            TeamBase {
                team: 0,
                position: Vec2::new(50.0, 50.0),
                radius: 30.0,
                element: Element::Fire,
            },
        );
        world.add_team(
            Team::new(1, Element::Water),
            TeamBase {
                team: 1,
                position: Vec2::new(350.0, 250.0),
                radius: 30.0,
                element: Element::Water,
            },
        );
        world
    }

    #[test]
    fn test_remove_agent_frees_spirits() {
        let mut world = world();
        let agent = world.spawn_agent(0, Element::Fire, Vec2::new(100.0, 100.0), true);
        let a = world.spawn_spirit(Vec2::new(100.0, 100.0), Vec2::ZERO);
        let b = world.spawn_spirit(Vec2::new(100.0, 100.0), Vec2::ZERO);
        assert!(world.attach_spirit(a, agent));
        assert!(world.attach_spirit(b, agent));
        world.remove_agent(agent);
        assert!(world.possession().owner_of(a).is_none());
        assert_eq!(world.free_spirit_ids(), vec![a, b]);
    }

    #[test]
    fn test_destroy_temporary_spirit_skips_respawn() {
        let mut world = world();
        let temp = world.spawn_temporary_spirit(Vec2::ZERO, Vec2::ZERO, 10.0);
        let perm = world.spawn_spirit(Vec2::ZERO, Vec2::ZERO);
        assert!(world.destroy_spirit(temp, 100.0));
        assert!(world.timeline().is_empty());
        assert!(world.destroy_spirit(perm, 100.0));
        assert_eq!(world.timeline().len(), 1);
        assert_eq!(world.ledger().destroyed, 2);
        assert_eq!(world.ledger().spawned, 2);
    }

    #[test]
    fn test_convert_spirit_counts_deposit() {
        let mut world = world();
        let spirit = world.spawn_spirit(Vec2::ZERO, Vec2::ZERO);
        assert!(world.convert_spirit(spirit, 1, 50.0));
        assert_eq!(world.team(1).map(|t| t.deposited), Some(1));
        assert_eq!(world.team(1).map(|t| t.score), Some(0));
        assert!(!world.convert_spirit(spirit, 1, 50.0));
    }

    #[test]
    fn test_nearest_free_spirit_skips_owned() {
        let mut world = world();
        let agent = world.spawn_agent(0, Element::Fire, Vec2::new(0.0, 0.0), true);
        let near = world.spawn_spirit(Vec2::new(10.0, 0.0), Vec2::ZERO);
        let far = world.spawn_spirit(Vec2::new(50.0, 0.0), Vec2::ZERO);
        world.attach_spirit(near, agent);
        assert_eq!(world.nearest_free_spirit(Vec2::ZERO, None), Some(far));
        assert_eq!(world.nearest_free_spirit(Vec2::ZERO, Some(20.0)), None);
    }

    #[test]
    fn test_spawned_positions_clamped() {
        let mut world = world();
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..20 {
            let id = world.spawn_random_spirit(&mut rng, 10.0);
            let spirit = world.spirit(id).copied();
            assert!(spirit.is_some_and(|s| world.bounds().contains(s.position)));
        }
        let agent = world.spawn_agent(1, Element::Water, Vec2::new(-50.0, 900.0), false);
        assert_eq!(world.agent(agent).map(|a| a.position), Some(Vec2::new(0.0, 300.0)));
    }

    #[test]
    fn test_hostility() {
        let mut world = world();
        let a = world.spawn_agent(0, Element::Fire, Vec2::ZERO, true);
        let b = world.spawn_agent(1, Element::Water, Vec2::ZERO, true);
        let c = world.spawn_agent(0, Element::Air, Vec2::ZERO, true);
        assert!(world.is_hostile(a, b));
        assert!(!world.is_hostile(a, c));
        assert!(!world.is_hostile(a, 99));
    }
}
