//! Autonomous agent decision loop.
//!
//! Each controller drives one agent: a behavioral state picked on a fixed
//! decision interval, a return trigger checked every tick, an occasional
//! ability cast, and steering that turns the state into a velocity.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::trace;

use crate::config::AgentConfig;
use crate::game::ability::{self, AbilityCatalog};
use crate::game::frame::Frame;
use crate::game::{AbilityId, AgentId, SpiritId, Vec2, WorldState, ZoneScheduler};

/// What an autonomous agent is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BotState {
    /// Heading for a free spirit.
    #[default]
    Collect,
    /// Heading for a spirit carried by a hostile agent.
    Steal,
    /// Heading home to deposit.
    Return,
    /// Roaming to a random point.
    Wander,
}

/// Where a controller is steering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum BotTarget {
    /// A spirit (collect or steal).
    Spirit(SpiritId),
    /// A point in the world.
    Point(Vec2),
}

/// Per-agent randomized parameters, drawn once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BotProfile {
    /// Probability of choosing to steal when carriers are around.
    pub aggressiveness: f64,
    /// Time carrying a moderate load before heading home.
    pub return_interval_ms: f64,
}

impl BotProfile {
    /// Draw a profile from the configured ranges.
    pub fn random(config: &AgentConfig, rng: &mut SmallRng) -> Self {
        Self {
            aggressiveness: f64::from(rng.gen_range(config.aggressiveness_min..=config.aggressiveness_max)),
            return_interval_ms: rng.gen_range(config.return_interval_min_ms..=config.return_interval_max_ms),
        }
    }
}

/// Seed for the controller of `agent` in a match seeded with `match_seed`.
#[must_use]
pub fn controller_seed(match_seed: u64, agent: AgentId) -> u64 {
    match_seed ^ u64::from(agent).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Decision loop for one autonomous agent.
#[derive(Debug, Clone)]
pub struct AgentController {
    agent: AgentId,
    profile: BotProfile,
    state: BotState,
    target: Option<BotTarget>,
    last_decision_at: f64,
    return_timer_ms: f64,
    rng: SmallRng,
}

impl AgentController {
    /// Create a controller with an explicit profile.
    #[must_use]
    pub fn new(agent: AgentId, profile: BotProfile, seed: u64) -> Self {
        Self {
            agent,
            profile,
            state: BotState::Collect,
            target: None,
            last_decision_at: f64::NEG_INFINITY,
            return_timer_ms: 0.0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Create a controller whose profile is drawn from its own seeded RNG.
    #[must_use]
    pub fn with_random_profile(agent: AgentId, config: &AgentConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let profile = BotProfile::random(config, &mut rng);
        Self {
            rng,
            ..Self::new(agent, profile, seed)
        }
    }

    /// Controlled agent.
    #[must_use]
    pub const fn agent(&self) -> AgentId {
        self.agent
    }

    /// Randomized parameters.
    #[must_use]
    pub const fn profile(&self) -> BotProfile {
        self.profile
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> BotState {
        self.state
    }

    /// Current steering target.
    #[must_use]
    pub const fn target(&self) -> Option<BotTarget> {
        self.target
    }

    /// Milliseconds accumulated toward a timed return.
    #[must_use]
    pub const fn return_timer(&self) -> f64 {
        self.return_timer_ms
    }

    /// One controller step.
    pub(crate) fn tick(&mut self, frame: &mut Frame<'_>, zones: &mut ZoneScheduler, catalog: &AbilityCatalog) {
        let Some(agent) = frame.world.agent(self.agent) else {
            return;
        };
        if !agent.is_autonomous {
            return;
        }
        let config = frame.config;
        let cfg = &config.agents;
        let carried = frame.world.possession().carried_count(self.agent);

        self.return_timer_ms += frame.delta;
        if self.state != BotState::Return {
            let timed_out = carried > cfg.return_low && self.return_timer_ms > self.profile.return_interval_ms;
            if carried >= cfg.return_high || timed_out {
                trace!(agent = self.agent, carried, "returning");
                self.state = BotState::Return;
                self.target = None;
                self.return_timer_ms = 0.0;
            }
        }

        if self.state != BotState::Return && frame.now - self.last_decision_at >= cfg.decision_interval_ms {
            self.last_decision_at = frame.now;
            self.decide(frame.world, cfg);
        }

        self.maybe_cast(frame, zones, catalog);
        self.steer(frame);
    }

    /// Pick a state and target.
    fn decide(&mut self, world: &WorldState, cfg: &AgentConfig) {
        let Some(agent) = world.agent(self.agent) else {
            return;
        };
        let here = agent.position;

        if let Some(spirit) = world.nearest_free_spirit(here, Some(cfg.near_free_distance)) {
            self.set(BotState::Collect, BotTarget::Spirit(spirit));
            return;
        }

        let id = self.agent;
        let carrier = world.nearest_agent(here, |a| {
            a.is_active() && world.is_hostile(id, a.id) && world.possession().carried_count(a.id) > 0
        });
        if let Some(carrier) = carrier
            && self.rng.gen_bool(self.profile.aggressiveness.clamp(0.0, 1.0))
            && let Some(&first) = world.possession().carried(carrier).first()
        {
            self.set(BotState::Steal, BotTarget::Spirit(first));
            return;
        }

        if let Some(spirit) = world.nearest_free_spirit(here, None) {
            self.set(BotState::Collect, BotTarget::Spirit(spirit));
            return;
        }

        let hostile_owned = world
            .spirits()
            .filter(|s| !s.is_in_flight())
            .filter(|s| {
                world
                    .possession()
                    .owner_of(s.id)
                    .is_some_and(|owner| world.is_hostile(id, owner))
            })
            .min_by(|a, b| {
                a.position
                    .distance_squared(here)
                    .total_cmp(&b.position.distance_squared(here))
            })
            .map(|s| s.id);
        if let Some(spirit) = hostile_owned {
            self.set(BotState::Steal, BotTarget::Spirit(spirit));
            return;
        }

        let point = world.random_point(&mut self.rng);
        self.set(BotState::Wander, BotTarget::Point(point));
    }

    fn set(&mut self, state: BotState, target: BotTarget) {
        self.state = state;
        self.target = Some(target);
    }

    /// Whether the current target still makes sense for the current state.
    fn target_valid(&self, world: &WorldState) -> bool {
        match (self.state, self.target) {
            (BotState::Collect, Some(BotTarget::Spirit(id))) => world
                .spirit(id)
                .is_some_and(|s| !s.is_in_flight() && !world.possession().is_owned(id)),
            (BotState::Steal, Some(BotTarget::Spirit(id))) => world
                .possession()
                .owner_of(id)
                .is_some_and(|owner| world.is_hostile(self.agent, owner)),
            (BotState::Wander, Some(BotTarget::Point(_))) | (BotState::Return, _) => true,
            _ => false,
        }
    }

    fn target_position(&self, world: &WorldState) -> Option<Vec2> {
        match self.target? {
            BotTarget::Spirit(id) => world.spirit(id).map(|s| s.position),
            BotTarget::Point(point) => Some(point),
        }
    }

    fn maybe_cast(&mut self, frame: &mut Frame<'_>, zones: &mut ZoneScheduler, catalog: &AbilityCatalog) {
        if frame.in_grace_period() {
            return;
        }
        let cfg = frame.config;
        if !self.rng.gen_bool(cfg.agents.ability_chance.clamp(0.0, 1.0)) {
            return;
        }
        let Some(agent) = frame.world.agent(self.agent) else {
            return;
        };
        let innate = agent.innate();
        let extras: Vec<AbilityId> = agent.unlocked.iter().copied().filter(|&a| a != innate).collect();
        let use_extra = agent.unlocked.len() > 1
            && cfg.abilities.bots_use_extra_abilities
            && !extras.is_empty()
            && self.rng.gen_bool(cfg.agents.extra_ability_chance.clamp(0.0, 1.0));
        let chosen = if use_extra {
            extras[self.rng.gen_range(0..extras.len())]
        } else {
            innate
        };
        let outcome = ability::activate(frame, zones, catalog, self.agent, chosen);
        trace!(agent = self.agent, ability = %chosen, ?outcome, "bot cast");
    }

    /// Turn the state into a velocity.
    fn steer(&mut self, frame: &mut Frame<'_>) {
        let config = frame.config;
        let cfg = &config.agents;
        let Some(agent) = frame.world.agent(self.agent) else {
            return;
        };
        if agent.is_frozen() || agent.is_vanished() {
            if let Some(agent) = frame.world.agent_mut(self.agent) {
                agent.velocity = Vec2::ZERO;
            }
            return;
        }
        let (here, team) = (agent.position, agent.team);

        if self.state == BotState::Return {
            match frame.world.base(team) {
                Some(base) if base.contains(here) => {
                    self.state = BotState::Collect;
                    self.decide(frame.world, cfg);
                }
                Some(base) => self.target = Some(BotTarget::Point(base.position)),
                None => {
                    self.state = BotState::Collect;
                    self.decide(frame.world, cfg);
                }
            }
        }
        if !self.target_valid(frame.world) {
            self.decide(frame.world, cfg);
        }
        if self.state == BotState::Wander
            && let Some(BotTarget::Point(point)) = self.target
            && point.distance(here) <= cfg.collect_radius
        {
            let next = frame.world.random_point(&mut self.rng);
            self.target = Some(BotTarget::Point(next));
        }

        let Some(goal) = self.target_position(frame.world) else {
            return;
        };
        let speed = cfg.speed;
        let heading = (goal - here).normalize_or_zero();
        let mut velocity = heading * speed;

        let side = heading.perp();
        for other in frame.world.agents_within(here, cfg.crowd_radius) {
            if other == self.agent {
                continue;
            }
            let Some(neighbor) = frame.world.agent(other) else {
                continue;
            };
            if neighbor.team != team {
                continue;
            }
            let away = here - neighbor.position;
            let sign = if away.dot(side) >= 0.0 { 1.0 } else { -1.0 };
            velocity += side * (sign * cfg.crowd_nudge * speed);
        }

        if cfg.jitter > 0.0 {
            let jitter = Vec2::new(
                self.rng.gen_range(-cfg.jitter..=cfg.jitter),
                self.rng.gen_range(-cfg.jitter..=cfg.jitter),
            );
            velocity += jitter * speed;
        }

        if let Some(agent) = frame.world.agent_mut(self.agent) {
            agent.velocity = velocity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Bounds, Element, Team, TeamBase};

    fn world() -> WorldState {
        let mut world = WorldState::new(Bounds::new(1000.0, 1000.0));
        for (id, element, x) in [(0, Element::Fire, 100.0), (1, Element::Ice, 900.0)] {
            world.add_team(
                Team::new(id, element),
                TeamBase {
                    team: id,
                    position: Vec2::new(x, 500.0),
                    radius: 60.0,
                    element,
                },
            );
        }
        world
    }

    fn bot(agent: AgentId, aggressiveness: f64) -> AgentController {
        let profile = BotProfile {
            aggressiveness,
            return_interval_ms: 5000.0,
        };
        AgentController::new(agent, profile, 5)
    }

    /// A far free spirit plus a hostile carrying two spirits.
    fn contested() -> (WorldState, AgentId, SpiritId, SpiritId) {
        let mut world = world();
        let me = world.spawn_agent(0, Element::Fire, Vec2::new(500.0, 500.0), true);
        let far = world.spawn_spirit(Vec2::new(500.0, 900.0), Vec2::ZERO);
        let carrier = world.spawn_agent(1, Element::Ice, Vec2::new(700.0, 500.0), true);
        let head = world.spawn_spirit(Vec2::new(720.0, 500.0), Vec2::ZERO);
        let tail = world.spawn_spirit(Vec2::new(740.0, 500.0), Vec2::ZERO);
        world.attach_spirit(head, carrier);
        world.attach_spirit(tail, carrier);
        (world, me, far, head)
    }

    #[test]
    fn test_decide_prefers_near_free_spirit() {
        let (mut world, me, _, _) = contested();
        let near = world.spawn_spirit(Vec2::new(600.0, 500.0), Vec2::ZERO);
        let cfg = AgentConfig::default();

        let mut controller = bot(me, 1.0);
        controller.decide(&world, &cfg);
        assert_eq!(controller.state(), BotState::Collect);
        assert_eq!(controller.target(), Some(BotTarget::Spirit(near)));
    }

    #[test]
    fn test_decide_aggressive_bot_steals_chain_head() {
        let (world, me, _, head) = contested();
        let mut controller = bot(me, 1.0);
        controller.decide(&world, &AgentConfig::default());
        assert_eq!(controller.state(), BotState::Steal);
        assert_eq!(controller.target(), Some(BotTarget::Spirit(head)));
    }

    #[test]
    fn test_decide_passive_bot_collects_far_spirit() {
        let (world, me, far, _) = contested();
        let mut controller = bot(me, 0.0);
        controller.decide(&world, &AgentConfig::default());
        assert_eq!(controller.state(), BotState::Collect);
        assert_eq!(controller.target(), Some(BotTarget::Spirit(far)));
    }

    #[test]
    fn test_decide_steals_nearest_hostile_spirit_when_none_free() {
        let mut world = world();
        let me = world.spawn_agent(0, Element::Fire, Vec2::new(500.0, 500.0), true);
        let carrier = world.spawn_agent(1, Element::Ice, Vec2::new(800.0, 500.0), true);
        let behind = world.spawn_spirit(Vec2::new(820.0, 500.0), Vec2::ZERO);
        let closer = world.spawn_spirit(Vec2::new(650.0, 500.0), Vec2::ZERO);
        world.attach_spirit(behind, carrier);
        world.attach_spirit(closer, carrier);

        let mut controller = bot(me, 0.0);
        controller.decide(&world, &AgentConfig::default());
        assert_eq!(controller.state(), BotState::Steal);
        assert_eq!(controller.target(), Some(BotTarget::Spirit(closer)));
    }

    #[test]
    fn test_decide_wanders_in_empty_world() {
        let mut world = world();
        let me = world.spawn_agent(0, Element::Fire, Vec2::new(500.0, 500.0), true);
        let bounds = world.bounds();

        for aggressiveness in [0.0, 1.0] {
            let mut controller = bot(me, aggressiveness);
            controller.decide(&world, &AgentConfig::default());
            assert_eq!(controller.state(), BotState::Wander);
            match controller.target() {
                Some(BotTarget::Point(point)) => assert!(bounds.contains(point)),
                other => panic!("expected a wander point, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_profile_within_ranges() {
        let config = AgentConfig::default();
        for seed in 0..50 {
            let controller = AgentController::with_random_profile(1, &config, seed);
            let p = controller.profile();
            assert!(p.aggressiveness >= f64::from(config.aggressiveness_min) - 1e-6);
            assert!(p.aggressiveness <= f64::from(config.aggressiveness_max) + 1e-6);
            assert!(p.return_interval_ms >= config.return_interval_min_ms);
            assert!(p.return_interval_ms <= config.return_interval_max_ms);
        }
    }

    #[test]
    fn test_controller_seed_differs_per_agent() {
        assert_ne!(controller_seed(7, 1), controller_seed(7, 2));
        assert_eq!(controller_seed(7, 1), controller_seed(7, 1));
    }

    #[test]
    fn test_new_controller_starts_collecting() {
        let controller = AgentController::new(
            3,
            BotProfile {
                aggressiveness: 0.5,
                return_interval_ms: 5000.0,
            },
            1,
        );
        assert_eq!(controller.state(), BotState::Collect);
        assert_eq!(controller.target(), None);
        assert!(controller.return_timer().abs() < f64::EPSILON);
    }
}
