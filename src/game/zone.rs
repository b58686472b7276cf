//! Timed area effects and the scheduler that ticks them.
//!
//! A zone's per-tick behavior is a closed [`ZoneKind`] interpreted by a single
//! dispatch per scheduler pass. Membership is edge-triggered through the
//! per-zone sets; the marks a zone leaves on agents (`frozen_by`, `slowed_by`)
//! are reconciled at the start of the next scheduler pass, not on removal.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use tracing::debug;

use crate::game::frame::Frame;
use crate::game::{
    Agent, AgentId, Color, Element, Knockback, SpiritId, TeamId, Vec2, WorldState, millis_to_secs,
};

/// Unique identifier for a zone.
pub type ZoneId = u32;

/// Where a zone is centered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneOrigin {
    /// A fixed point.
    Fixed(Vec2),
    /// Follows an agent.
    Tracking(AgentId),
}

/// How long a zone lives, besides ending when its caster leaves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneDuration {
    /// Removed once `now` reaches the timestamp.
    Until(f64),
    /// Lives while the caster keeps its buff.
    WhileCasterBuffed,
}

/// Per-kind behavior and parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneKind {
    /// Slows agents inside by `slow_factor`.
    Quicksand {
        /// Speed multiplier while inside.
        slow_factor: f32,
    },
    /// Freezes agents inside.
    Frost,
    /// Spins agents around the center, then throws them out.
    Tornado {
        /// Time an agent spins before ejection.
        dwell_ms: f64,
        /// Angular speed in radians per second.
        spin_rate: f32,
        /// Ejection displacement.
        eject_distance: f32,
        /// Ejection duration.
        eject_ms: f64,
        /// Scatter radius for dropped spirits.
        scatter: f32,
    },
    /// Sends agents inside to the caster's base and converts their spirits.
    Riptide,
    /// Pulls the target (or the caster) in; agents in the core vanish.
    Void {
        /// Radius of the vanishing core.
        inner_radius: f32,
        /// Base pull speed at the rim.
        pull_speed: f32,
        /// Vanish duration.
        vanish_ms: f64,
        /// Agent pulled by the outer ring; the caster when unset.
        target: Option<AgentId>,
    },
    /// Draws free spirits toward the center.
    Aura {
        /// Spirit pull speed.
        pull_speed: f32,
    },
    /// Converts spirits, repels hostiles and cleanses allies.
    Sanctuary {
        /// Hostile push speed.
        repel_speed: f32,
    },
}

impl ZoneKind {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Quicksand { .. } => "quicksand",
            Self::Frost => "frost",
            Self::Tornado { .. } => "tornado",
            Self::Riptide => "riptide",
            Self::Void { .. } => "void",
            Self::Aura { .. } => "aura",
            Self::Sanctuary { .. } => "sanctuary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Spin {
    entered_at: f64,
    angle: f32,
    orbit: f32,
    ejected: bool,
}

/// A live area effect.
#[derive(Debug, Clone)]
pub struct ZoneEffect {
    /// Assigned on registration.
    pub id: ZoneId,
    /// Casting agent (always exempt).
    pub caster: AgentId,
    /// Caster's team when the zone was registered.
    pub caster_team: TeamId,
    /// Center.
    pub origin: ZoneOrigin,
    /// Outer radius.
    pub radius: f32,
    /// Registration timestamp.
    pub started_at: f64,
    /// Lifetime.
    pub duration: ZoneDuration,
    /// Behavior.
    pub kind: ZoneKind,
    /// Whether allies of the caster are affected.
    pub affects_allies: bool,
    members: BTreeSet<AgentId>,
    spins: BTreeMap<AgentId, Spin>,
}

impl ZoneEffect {
    /// Describe a zone cast by `caster` at `now`.
    #[must_use]
    pub fn new(
        caster: &Agent,
        origin: ZoneOrigin,
        radius: f32,
        kind: ZoneKind,
        now: f64,
        duration: ZoneDuration,
    ) -> Self {
        Self {
            id: 0,
            caster: caster.id,
            caster_team: caster.team,
            origin,
            radius,
            started_at: now,
            duration,
            kind,
            affects_allies: false,
            members: BTreeSet::new(),
            spins: BTreeMap::new(),
        }
    }

    /// Set whether allies of the caster are affected.
    #[must_use]
    pub const fn affecting_allies(mut self, affects: bool) -> Self {
        self.affects_allies = affects;
        self
    }

    /// Current center, if the tracked agent still exists.
    #[must_use]
    pub fn center(&self, world: &WorldState) -> Option<Vec2> {
        match self.origin {
            ZoneOrigin::Fixed(point) => Some(point),
            ZoneOrigin::Tracking(agent) => world.agent(agent).map(|a| a.position),
        }
    }

    /// Whether `point` lies inside the outer radius.
    #[must_use]
    pub fn contains(&self, world: &WorldState, point: Vec2) -> bool {
        self.center(world)
            .is_some_and(|center| center.distance(point) <= self.radius)
    }

    /// Agents currently inside that the zone has registered as members.
    pub fn members(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.members.iter().copied()
    }

    /// Whether the zone has run its course at `now`.
    #[must_use]
    pub fn is_finished(&self, world: &WorldState, now: f64) -> bool {
        let caster = world.agent(self.caster);
        if caster.is_none_or(Agent::is_vanished) {
            return true;
        }
        match self.duration {
            ZoneDuration::Until(expiry) => now >= expiry,
            ZoneDuration::WhileCasterBuffed => !caster.is_some_and(Agent::is_invincible),
        }
    }

    /// Whether this zone may affect `target`.
    #[must_use]
    pub fn is_eligible(&self, target: &Agent) -> bool {
        is_eligible(self.caster, self.caster_team, self.affects_allies, target)
    }

    fn eligible_inside(&self, world: &WorldState, center: Vec2, radius: f32) -> BTreeSet<AgentId> {
        world
            .agents_within(center, radius)
            .into_iter()
            .filter(|&id| world.agent(id).is_some_and(|a| self.is_eligible(a)))
            .collect()
    }

    fn apply(&mut self, frame: &mut Frame<'_>) {
        let Some(center) = self.center(frame.world) else {
            return;
        };
        match self.kind {
            ZoneKind::Quicksand { slow_factor } => self.apply_slow(frame.world, center, slow_factor),
            ZoneKind::Frost => self.apply_freeze(frame.world, center),
            ZoneKind::Tornado {
                dwell_ms,
                spin_rate,
                eject_distance,
                eject_ms,
                scatter,
            } => {
                let spin = TornadoParams {
                    dwell_ms,
                    spin_rate,
                    eject_distance,
                    eject_ms,
                    scatter,
                };
                self.apply_tornado(frame, center, spin);
            }
            ZoneKind::Riptide => self.apply_riptide(frame, center),
            ZoneKind::Void {
                inner_radius,
                pull_speed,
                vanish_ms,
                target,
            } => self.apply_void(frame, center, inner_radius, pull_speed, vanish_ms, target),
            ZoneKind::Aura { pull_speed } => {
                let step = pull_speed * millis_to_secs(frame.delta);
                for spirit in frame.world.spirits_within(center, self.radius) {
                    if frame.world.possession().is_owned(spirit) {
                        continue;
                    }
                    if let Some(s) = frame.world.spirit_mut(spirit)
                        && !s.is_in_flight()
                    {
                        s.position = s.position.step_toward(center, step);
                    }
                }
            }
            ZoneKind::Sanctuary { repel_speed } => self.apply_sanctuary(frame, center, repel_speed),
        }
    }

    /// Track membership and report the agents that entered this pass.
    fn update_members(&mut self, current: BTreeSet<AgentId>) -> Vec<AgentId> {
        let entered = current.difference(&self.members).copied().collect();
        self.members = current;
        entered
    }

    fn apply_slow(&mut self, world: &mut WorldState, center: Vec2, factor: f32) {
        let inside = self.eligible_inside(world, center, self.radius);
        let entered = self.update_members(inside);
        for id in self.members.clone() {
            if let Some(agent) = world.agent_mut(id)
                && (entered.contains(&id) || agent.status.slowed_by.is_none())
            {
                agent.status.slowed_by = Some((self.id, factor));
            }
        }
    }

    fn apply_freeze(&mut self, world: &mut WorldState, center: Vec2) {
        let inside = self.eligible_inside(world, center, self.radius);
        let entered = self.update_members(inside);
        for id in self.members.clone() {
            if let Some(agent) = world.agent_mut(id) {
                if entered.contains(&id) || agent.status.frozen_by.is_none() {
                    agent.status.frozen_by = Some(self.id);
                }
                agent.velocity = Vec2::ZERO;
            }
        }
    }

    fn apply_tornado(&mut self, frame: &mut Frame<'_>, center: Vec2, params: TornadoParams) {
        let inside = self.eligible_inside(frame.world, center, self.radius);
        self.spins.retain(|id, _| inside.contains(id));
        let entered = self.update_members(inside);
        let dt = millis_to_secs(frame.delta);

        for id in entered {
            let Some(position) = frame.world.agent(id).map(|a| a.position) else {
                continue;
            };
            let offset = position - center;
            self.spins.insert(
                id,
                Spin {
                    entered_at: frame.now,
                    angle: offset.angle(),
                    orbit: offset.length().clamp(self.radius * 0.3, self.radius * 0.9),
                    ejected: false,
                },
            );
            for spirit in frame.world.release_all(id) {
                let jitter = Vec2::new(
                    frame.rng.gen_range(-params.scatter..=params.scatter),
                    frame.rng.gen_range(-params.scatter..=params.scatter),
                );
                let bounds = frame.world.bounds();
                if let Some(s) = frame.world.spirit_mut(spirit) {
                    s.position = bounds.clamp(position + jitter);
                }
            }
            frame.notifier.notify(position, "Swept up!", Color::of_element(Element::Air));
        }

        let eject_speed = params.eject_distance / millis_to_secs(params.eject_ms).max(f32::EPSILON);
        for (&id, spin) in &mut self.spins {
            if spin.ejected {
                continue;
            }
            let Some(agent) = frame.world.agent_mut(id) else {
                continue;
            };
            if frame.now - spin.entered_at < params.dwell_ms {
                spin.angle += params.spin_rate * dt;
                agent.position = center + Vec2::from_angle(spin.angle) * spin.orbit;
                agent.velocity = Vec2::ZERO;
            } else {
                spin.ejected = true;
                agent.status.knockback = Some(Knockback {
                    velocity: Vec2::from_angle(spin.angle) * eject_speed,
                    until: frame.now + params.eject_ms,
                });
                debug!(zone = self.id, agent = id, "ejected from tornado");
            }
        }
    }

    fn apply_riptide(&mut self, frame: &mut Frame<'_>, center: Vec2) {
        let Some(base) = frame.world.base(self.caster_team).map(|b| b.position) else {
            return;
        };
        let respawn_at = frame.now + frame.config.spirits.respawn_delay_ms;
        for id in self.eligible_inside(frame.world, center, self.radius) {
            let carried: Vec<SpiritId> = frame.world.possession().carried(id).to_vec();
            let mut converted = 0u32;
            for spirit in carried {
                if frame.world.convert_spirit(spirit, self.caster_team, respawn_at) {
                    converted += 1;
                }
            }
            if let Some(team) = frame.world.team_mut(self.caster_team) {
                team.add_score(converted);
            }
            if let Some(agent) = frame.world.agent_mut(id) {
                agent.position = base;
                agent.velocity = Vec2::ZERO;
                agent.status.knockback = None;
            }
            debug!(zone = self.id, agent = id, converted, "riptide teleport");
        }
    }

    fn apply_void(
        &mut self,
        frame: &mut Frame<'_>,
        center: Vec2,
        inner_radius: f32,
        pull_speed: f32,
        vanish_ms: f64,
        target: Option<AgentId>,
    ) {
        let dt = millis_to_secs(frame.delta);
        let inside = self.eligible_inside(frame.world, center, self.radius);
        self.update_members(inside.clone());

        // The outer ring pulls the designated target, or the caster when there is none.
        let pulled = match target {
            Some(id) if inside.contains(&id) => Some(id),
            Some(_) => None,
            None => Some(self.caster),
        };
        if let Some(agent) = pulled.and_then(|id| frame.world.agent_mut(id))
            && agent.is_active()
            && agent.position.distance(center) <= self.radius
        {
            let distance = agent.position.distance(center);
            let closeness = 1.0 - (distance / self.radius).min(1.0);
            let step = pull_speed * (1.0 + closeness) * dt;
            agent.position = agent.position.step_toward(center, step);
        }

        for id in self.eligible_inside(frame.world, center, inner_radius) {
            frame.world.release_all(id);
            if let Some(agent) = frame.world.agent_mut(id) {
                agent.status.vanished_until = Some(frame.now + vanish_ms);
                agent.velocity = Vec2::ZERO;
                agent.status.knockback = None;
            }
            frame.notifier.notify(center, "Vanished", Color::of_element(Element::Void));
            debug!(zone = self.id, agent = id, "vanished");
        }
    }

    fn apply_sanctuary(&mut self, frame: &mut Frame<'_>, center: Vec2, repel_speed: f32) {
        let respawn_at = frame.now + frame.config.spirits.respawn_delay_ms;
        let mut converted = 0u32;
        for spirit in frame.world.spirits_within(center, self.radius) {
            let in_flight = frame.world.spirit(spirit).is_none_or(|s| s.is_in_flight());
            // The caster's own chain is scored by the recall itself.
            let recalled = frame.world.possession().owner_of(spirit) == Some(self.caster);
            if !in_flight && !recalled && frame.world.convert_spirit(spirit, self.caster_team, respawn_at) {
                converted += 1;
            }
        }
        if converted > 0 {
            if let Some(team) = frame.world.team_mut(self.caster_team) {
                team.add_score(converted);
            }
            frame
                .notifier
                .notify(center, &format!("+{converted}"), Color::GOLD);
        }

        let step = repel_speed * millis_to_secs(frame.delta);
        let bounds = frame.world.bounds();
        for id in frame.world.agents_within(center, self.radius) {
            let Some(agent) = frame.world.agent_mut(id) else {
                continue;
            };
            if agent.team == self.caster_team {
                agent.status.cleanse();
            } else if !agent.is_vanished() && !agent.is_invincible() {
                let away = (agent.position - center).normalize_or_zero();
                let away = if away == Vec2::ZERO { Vec2::new(1.0, 0.0) } else { away };
                agent.position = bounds.clamp(agent.position + away * step);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TornadoParams {
    dwell_ms: f64,
    spin_rate: f32,
    eject_distance: f32,
    eject_ms: f64,
    scatter: f32,
}

/// Shared eligibility rule for effects on other agents.
///
/// Never the caster, never vanished or invincible agents; allies only when
/// `affects_allies`.
#[must_use]
pub fn is_eligible(caster: AgentId, caster_team: TeamId, affects_allies: bool, target: &Agent) -> bool {
    if target.id == caster || target.is_vanished() || target.is_invincible() {
        return false;
    }
    target.team != caster_team || affects_allies
}

/// Owns and ticks every live zone.
#[derive(Debug, Clone, Default)]
pub struct ZoneScheduler {
    zones: BTreeMap<ZoneId, ZoneEffect>,
    next_id: ZoneId,
}

impl ZoneScheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zones: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Register a zone; it is evaluated from the current tick on.
    pub fn register(&mut self, mut zone: ZoneEffect) -> ZoneId {
        let id = self.next_id;
        self.next_id += 1;
        zone.id = id;
        debug!(zone = id, kind = zone.kind.name(), caster = zone.caster, "zone registered");
        self.zones.insert(id, zone);
        id
    }

    /// Look up a zone.
    #[must_use]
    pub fn get(&self, id: ZoneId) -> Option<&ZoneEffect> {
        self.zones.get(&id)
    }

    /// Live zones in id order.
    pub fn zones(&self) -> impl Iterator<Item = &ZoneEffect> {
        self.zones.values()
    }

    /// Number of live zones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether no zone is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Drop every zone (round reset).
    pub fn clear(&mut self) {
        self.zones.clear();
    }

    /// One scheduler pass.
    pub(crate) fn tick(&mut self, frame: &mut Frame<'_>) {
        self.reconcile_marks(frame.world);
        self.remove_finished(frame.world, frame.now);

        let ids: Vec<ZoneId> = self.zones.keys().copied().collect();
        for id in ids {
            let Some(mut zone) = self.zones.remove(&id) else {
                continue;
            };
            zone.apply(frame);
            self.zones.insert(id, zone);
        }
    }

    /// Clear zone marks whose zone is gone or no longer contains the agent.
    fn reconcile_marks(&self, world: &mut WorldState) {
        let still_inside = |zone: ZoneId, at: Vec2| {
            self.zones
                .get(&zone)
                .is_some_and(|z| z.contains(world, at))
        };
        let stale: Vec<(AgentId, bool, bool)> = world
            .agents()
            .filter_map(|agent| {
                let frozen = agent
                    .status
                    .frozen_by
                    .is_some_and(|z| !still_inside(z, agent.position));
                let slowed = agent
                    .status
                    .slowed_by
                    .is_some_and(|(z, _)| !still_inside(z, agent.position));
                (frozen || slowed).then_some((agent.id, frozen, slowed))
            })
            .collect();

        for (id, frozen, slowed) in stale {
            if let Some(agent) = world.agent_mut(id) {
                if frozen {
                    agent.status.frozen_by = None;
                }
                if slowed {
                    agent.status.slowed_by = None;
                }
            }
        }
    }

    fn remove_finished(&mut self, world: &WorldState, now: f64) {
        self.zones.retain(|&id, zone| {
            let finished = zone.is_finished(world, now);
            if finished {
                debug!(zone = id, kind = zone.kind.name(), "zone expired");
            }
            !finished
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Bounds;

    #[test]
    fn test_eligibility_rules() {
        let caster = Agent::new(1, 0, Element::Ice, Vec2::ZERO, true);
        let ally = Agent::new(2, 0, Element::Fire, Vec2::ZERO, true);
        let mut hostile = Agent::new(3, 1, Element::Fire, Vec2::ZERO, true);

        assert!(!is_eligible(1, 0, true, &caster));
        assert!(!is_eligible(1, 0, false, &ally));
        assert!(is_eligible(1, 0, true, &ally));
        assert!(is_eligible(1, 0, false, &hostile));

        hostile.status.vanished_until = Some(10.0);
        assert!(!is_eligible(1, 0, false, &hostile));
    }

    #[test]
    fn test_tracking_zone_ends_with_caster() {
        let mut world = WorldState::new(Bounds::new(500.0, 500.0));
        let caster_id = world.spawn_agent(0, Element::Light, Vec2::new(100.0, 100.0), true);
        let caster = world.agent(caster_id).cloned();
        let Some(caster) = caster else {
            panic!("caster missing");
        };
        let zone = ZoneEffect::new(
            &caster,
            ZoneOrigin::Tracking(caster_id),
            50.0,
            ZoneKind::Aura { pull_speed: 10.0 },
            0.0,
            ZoneDuration::Until(1000.0),
        );
        assert!(zone.contains(&world, Vec2::new(120.0, 100.0)));
        assert!(!zone.is_finished(&world, 10.0));
        assert!(zone.is_finished(&world, 1000.0));

        world.remove_agent(caster_id);
        assert!(zone.is_finished(&world, 10.0));
        assert_eq!(zone.center(&world), None);
    }

    #[test]
    fn test_buff_bound_zone() {
        let mut world = WorldState::new(Bounds::new(500.0, 500.0));
        let caster_id = world.spawn_agent(0, Element::Light, Vec2::new(100.0, 100.0), true);
        let Some(caster) = world.agent(caster_id).cloned() else {
            panic!("caster missing");
        };
        let zone = ZoneEffect::new(
            &caster,
            ZoneOrigin::Tracking(caster_id),
            50.0,
            ZoneKind::Aura { pull_speed: 10.0 },
            0.0,
            ZoneDuration::WhileCasterBuffed,
        );
        assert!(zone.is_finished(&world, 0.0));
        if let Some(agent) = world.agent_mut(caster_id) {
            agent.status.buff = Some(crate::game::Buff {
                until: 500.0,
                speed_multiplier: 1.5,
            });
        }
        assert!(!zone.is_finished(&world, 0.0));
    }
}
