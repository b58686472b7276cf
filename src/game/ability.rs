//! Ability resolution: gating, the descriptor table and the effect routines.
//!
//! Every activation goes through [`activate`]. A blocked activation changes
//! nothing at all: no effect, no charge spent, no cooldown recorded.

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::AbilityConfig;
use crate::game::frame::Frame;
use crate::game::zone::is_eligible;
use crate::game::{
    AbilityId, AgentId, Buff, Color, Knockback, SpiritId, TeamSwap, TimedEvent, Vec2, ZoneDuration,
    ZoneEffect, ZoneKind, ZoneOrigin, ZoneScheduler, millis_to_secs,
};

/// Whether an ability's effects reach the caster's allies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AllyPolarity {
    /// Allies are hit only when friendly fire is on.
    FriendlyFireHitsAllies,
    /// Allies are hit only when friendly fire is off.
    FriendlyFireSparesAllies,
}

impl AllyPolarity {
    /// Resolve against the friendly-fire setting.
    #[must_use]
    pub const fn affects_allies(self, friendly_fire: bool) -> bool {
        match self {
            Self::FriendlyFireHitsAllies => friendly_fire,
            Self::FriendlyFireSparesAllies => !friendly_fire,
        }
    }
}

/// Static facts about an ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AbilityDescriptor {
    /// Identifier.
    pub id: AbilityId,
    /// Ally handling.
    pub polarity: AllyPolarity,
    /// One-line description.
    pub summary: &'static str,
}

const fn hits(id: AbilityId, summary: &'static str) -> AbilityDescriptor {
    AbilityDescriptor {
        id,
        polarity: AllyPolarity::FriendlyFireHitsAllies,
        summary,
    }
}

/// The full descriptor table, one entry per ability.
pub const DESCRIPTORS: [AbilityDescriptor; 13] = [
    hits(AbilityId::Eruption, "Area knockback that can burn carried spirits"),
    hits(AbilityId::Quicksand, "Slowing zone"),
    AbilityDescriptor {
        id: AbilityId::Frost,
        polarity: AllyPolarity::FriendlyFireSparesAllies,
        summary: "Freezing zone",
    },
    hits(AbilityId::Tornado, "Spins agents, scatters their spirits, then ejects them"),
    hits(AbilityId::Riptide, "Drags agents to the caster's base and converts their spirits"),
    hits(AbilityId::Void, "Pulls a target or the caster in; the core makes agents vanish"),
    hits(AbilityId::Radiance, "Invincibility, speed and a spirit magnet"),
    hits(AbilityId::Miasma, "Poisons nearby agents, dropping their spirits"),
    hits(AbilityId::Barricade, "Raises obstacles around the caster"),
    hits(AbilityId::Bloom, "Grows temporary spirits"),
    hits(AbilityId::Recall, "Delayed return home at a score multiplier"),
    hits(AbilityId::Dominate, "Takes over nearby hostile agents for a while"),
    hits(AbilityId::Mirror, "Spawns a temporary clone"),
];

/// Descriptor of `id`.
#[must_use]
pub fn descriptor(id: AbilityId) -> AbilityDescriptor {
    DESCRIPTORS
        .iter()
        .copied()
        .find(|d| d.id == id)
        .unwrap_or_else(|| hits(id, ""))
}

/// Abilities with a registered handler for this match.
#[derive(Debug, Clone)]
pub struct AbilityCatalog {
    enabled: BTreeMap<AbilityId, AbilityDescriptor>,
}

impl AbilityCatalog {
    /// Every ability not disabled in `config`.
    #[must_use]
    pub fn from_config(config: &AbilityConfig) -> Self {
        let enabled = DESCRIPTORS
            .iter()
            .filter(|d| !config.disabled.contains(&d.id))
            .map(|d| (d.id, *d))
            .collect();
        Self { enabled }
    }

    /// Whether `id` has a handler.
    #[must_use]
    pub fn contains(&self, id: AbilityId) -> bool {
        self.enabled.contains_key(&id)
    }

    /// Descriptor of an enabled ability.
    #[must_use]
    pub fn get(&self, id: AbilityId) -> Option<&AbilityDescriptor> {
        self.enabled.get(&id)
    }

    /// Enabled ability ids.
    pub fn ids(&self) -> impl Iterator<Item = AbilityId> + '_ {
        self.enabled.keys().copied()
    }
}

/// Why an activation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockReason {
    /// No such agent.
    UnknownAgent,
    /// The pre-round grace period is running.
    GracePeriod,
    /// A human agent's charge isn't full.
    ChargeNotFull,
    /// An extra ability is still cooling down.
    CoolingDown,
    /// The agent hasn't unlocked the ability.
    Locked,
    /// The agent is frozen or vanished.
    Incapacitated,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UnknownAgent => "unknown agent",
            Self::GracePeriod => "grace period",
            Self::ChargeNotFull => "charge not full",
            Self::CoolingDown => "cooling down",
            Self::Locked => "locked",
            Self::Incapacitated => "incapacitated",
        };
        f.write_str(text)
    }
}

/// Outcome of an activation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Activation {
    /// The effect ran.
    Resolved,
    /// A gate refused it.
    Blocked(BlockReason),
    /// No handler is registered for the ability.
    Unhandled,
}

impl Activation {
    /// Whether the effect ran.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved)
    }
}

/// Check every gate without changing anything.
pub(crate) fn check_gates(frame: &Frame<'_>, catalog: &AbilityCatalog, agent: AgentId, ability: AbilityId) -> Activation {
    let Some(caster) = frame.world.agent(agent) else {
        return Activation::Blocked(BlockReason::UnknownAgent);
    };
    if !catalog.contains(ability) {
        return Activation::Unhandled;
    }
    if !caster.has_unlocked(ability) || (ability == AbilityId::Mirror && caster.clone_of.is_some()) {
        return Activation::Blocked(BlockReason::Locked);
    }
    if caster.is_vanished() || caster.is_frozen() {
        return Activation::Blocked(BlockReason::Incapacitated);
    }
    if frame.in_grace_period() {
        return Activation::Blocked(BlockReason::GracePeriod);
    }
    let innate = ability == caster.innate();
    if innate && !caster.is_autonomous && caster.charge < frame.config.agents.charge_max {
        return Activation::Blocked(BlockReason::ChargeNotFull);
    }
    if !innate && !frame.config.round.debug {
        let cooldown = frame.config.abilities.extra_cooldown_ms;
        if caster
            .last_used
            .get(&ability)
            .is_some_and(|&last| frame.now - last < cooldown)
        {
            return Activation::Blocked(BlockReason::CoolingDown);
        }
    }
    Activation::Resolved
}

/// Gate, then run the effect routine for `ability` cast by `agent`.
pub(crate) fn activate(
    frame: &mut Frame<'_>,
    zones: &mut ZoneScheduler,
    catalog: &AbilityCatalog,
    agent: AgentId,
    ability: AbilityId,
) -> Activation {
    let gate = check_gates(frame, catalog, agent, ability);
    if gate != Activation::Resolved {
        debug!(agent, %ability, outcome = ?gate, "activation refused");
        return gate;
    }
    let polarity = catalog
        .get(ability)
        .map_or(AllyPolarity::FriendlyFireHitsAllies, |d| d.polarity);
    let affects_allies = polarity.affects_allies(frame.config.abilities.friendly_fire);

    match ability {
        AbilityId::Eruption => eruption(frame, agent, affects_allies),
        AbilityId::Quicksand => {
            let cfg = frame.config.abilities.quicksand;
            let kind = ZoneKind::Quicksand {
                slow_factor: cfg.slow_factor,
            };
            cast_zone(frame, zones, agent, cfg.radius, kind, cfg.duration_ms, affects_allies);
        }
        AbilityId::Frost => {
            let cfg = frame.config.abilities.frost;
            cast_zone(frame, zones, agent, cfg.radius, ZoneKind::Frost, cfg.duration_ms, affects_allies);
        }
        AbilityId::Tornado => {
            let cfg = frame.config.abilities.tornado;
            let kind = ZoneKind::Tornado {
                dwell_ms: cfg.dwell_ms,
                spin_rate: cfg.spin_rate,
                eject_distance: cfg.eject_distance,
                eject_ms: cfg.eject_ms,
                scatter: cfg.scatter,
            };
            cast_zone(frame, zones, agent, cfg.radius, kind, cfg.duration_ms, affects_allies);
        }
        AbilityId::Riptide => {
            let cfg = frame.config.abilities.riptide;
            cast_zone(frame, zones, agent, cfg.radius, ZoneKind::Riptide, cfg.duration_ms, affects_allies);
        }
        AbilityId::Void => void(frame, zones, agent, affects_allies),
        AbilityId::Radiance => radiance(frame, zones, agent),
        AbilityId::Miasma => miasma(frame, agent, affects_allies),
        AbilityId::Barricade => barricade(frame, agent),
        AbilityId::Bloom => bloom(frame, agent),
        AbilityId::Recall => recall(frame, zones, agent),
        AbilityId::Dominate => dominate(frame, agent),
        AbilityId::Mirror => mirror(frame, agent),
    }

    let now = frame.now;
    let Some(caster) = frame.world.agent_mut(agent) else {
        return Activation::Resolved;
    };
    // Extras pay with their cooldown, not with charge.
    if !caster.is_autonomous && ability == caster.innate() {
        caster.charge = 0.0;
    }
    caster.last_used.insert(ability, now);
    let (position, element, team) = (caster.position, caster.element, caster.team);
    frame
        .notifier
        .notify(position, &ability.to_string(), Color::of_element(element));
    info!(agent, team, %ability, "ability resolved");
    Activation::Resolved
}

/// Register a fixed zone at the caster's position.
fn cast_zone(
    frame: &mut Frame<'_>,
    zones: &mut ZoneScheduler,
    agent: AgentId,
    radius: f32,
    kind: ZoneKind,
    duration_ms: f64,
    affects_allies: bool,
) {
    let Some(caster) = frame.world.agent(agent) else {
        return;
    };
    let zone = ZoneEffect::new(
        caster,
        ZoneOrigin::Fixed(caster.position),
        radius,
        kind,
        frame.now,
        ZoneDuration::Until(frame.now + duration_ms),
    )
    .affecting_allies(affects_allies);
    zones.register(zone);
}

/// Eligible agents within `radius` of the caster, in id order.
fn targets_around(frame: &Frame<'_>, agent: AgentId, radius: f32, affects_allies: bool) -> Vec<AgentId> {
    let Some(caster) = frame.world.agent(agent) else {
        return Vec::new();
    };
    frame
        .world
        .agents_within(caster.position, radius)
        .into_iter()
        .filter(|&id| {
            frame
                .world
                .agent(id)
                .is_some_and(|t| is_eligible(caster.id, caster.team, affects_allies, t))
        })
        .collect()
}

fn eruption(frame: &mut Frame<'_>, agent: AgentId, affects_allies: bool) {
    let cfg = frame.config.abilities.eruption;
    let Some(origin) = frame.world.agent(agent).map(|a| a.position) else {
        return;
    };
    let speed = cfg.displacement / millis_to_secs(cfg.push_ms).max(f32::EPSILON);
    let respawn_at = frame.now + frame.config.spirits.respawn_delay_ms;

    for id in targets_around(frame, agent, cfg.radius, affects_allies) {
        let Some(target) = frame.world.agent_mut(id) else {
            continue;
        };
        let mut direction = (target.position - origin).normalize_or_zero();
        if direction == Vec2::ZERO {
            direction = Vec2::new(1.0, 0.0);
        }
        target.status.knockback = Some(Knockback {
            velocity: direction * speed,
            until: frame.now + cfg.push_ms,
        });
        if cfg.burn_carried {
            let burned: Vec<SpiritId> = frame.world.possession().carried(id).to_vec();
            for spirit in &burned {
                frame.world.destroy_spirit(*spirit, respawn_at);
            }
            debug!(agent = id, burned = burned.len(), "spirits burned");
        }
    }
}

fn void(frame: &mut Frame<'_>, zones: &mut ZoneScheduler, agent: AgentId, affects_allies: bool) {
    let cfg = frame.config.abilities.void;
    let Some(caster) = frame.world.agent(agent) else {
        return;
    };
    let (origin, team) = (caster.position, caster.team);
    let limit = cfg.outer_radius;
    let target = frame.world.nearest_agent(origin, |a| {
        a.team != team && is_eligible(agent, team, affects_allies, a) && a.position.distance(origin) <= limit
    });
    let kind = ZoneKind::Void {
        inner_radius: cfg.inner_radius,
        pull_speed: cfg.pull_speed,
        vanish_ms: cfg.vanish_ms,
        target,
    };
    cast_zone(frame, zones, agent, cfg.outer_radius, kind, cfg.duration_ms, affects_allies);
}

fn radiance(frame: &mut Frame<'_>, zones: &mut ZoneScheduler, agent: AgentId) {
    let cfg = frame.config.abilities.radiance;
    let now = frame.now;
    let Some(caster) = frame.world.agent_mut(agent) else {
        return;
    };
    caster.status.buff = Some(Buff {
        until: now + cfg.duration_ms,
        speed_multiplier: cfg.speed_multiplier,
    });
    let zone = ZoneEffect::new(
        caster,
        ZoneOrigin::Tracking(agent),
        cfg.magnet_radius,
        ZoneKind::Aura {
            pull_speed: cfg.magnet_speed,
        },
        now,
        ZoneDuration::WhileCasterBuffed,
    );
    zones.register(zone);
}

fn miasma(frame: &mut Frame<'_>, agent: AgentId, affects_allies: bool) {
    let cfg = frame.config.abilities.miasma;
    let until = frame.now + cfg.duration_ms;
    for id in targets_around(frame, agent, cfg.radius, affects_allies) {
        let dropped = frame.world.release_all(id);
        if let Some(target) = frame.world.agent_mut(id) {
            target.status.poisoned_until = Some(until);
        }
        debug!(agent = id, dropped = dropped.len(), "poisoned");
    }
}

fn barricade(frame: &mut Frame<'_>, agent: AgentId) {
    let cfg = frame.config.abilities.barricade;
    let Some(origin) = frame.world.agent(agent).map(|a| a.position) else {
        return;
    };
    let bounds = frame.world.bounds();
    for _ in 0..cfg.count {
        let angle = frame.rng.gen_range(0.0..std::f32::consts::TAU);
        let position = bounds.clamp(origin + Vec2::from_angle(angle) * cfg.distance);
        let obstacle = frame.world.spawn_obstacle(position, cfg.obstacle_radius);
        frame
            .world
            .timeline_mut()
            .schedule(frame.now + cfg.lifespan_ms, TimedEvent::ExpireObstacle { obstacle });
    }
}

fn bloom(frame: &mut Frame<'_>, agent: AgentId) {
    let cfg = frame.config.abilities.bloom;
    let drift_speed = frame.config.spirits.drift_speed;
    let Some(origin) = frame.world.agent(agent).map(|a| a.position) else {
        return;
    };
    let expires_at = frame.now + cfg.lifespan_ms;
    for _ in 0..cfg.count {
        let offset = Vec2::new(
            frame.rng.gen_range(-cfg.scatter..=cfg.scatter),
            frame.rng.gen_range(-cfg.scatter..=cfg.scatter),
        );
        let drift = Vec2::from_angle(frame.rng.gen_range(0.0..std::f32::consts::TAU)) * drift_speed;
        frame
            .world
            .spawn_temporary_spirit(origin + offset, drift, expires_at);
    }
}

fn recall(frame: &mut Frame<'_>, zones: &mut ZoneScheduler, agent: AgentId) {
    let cfg = frame.config.abilities.recall;
    let Some(caster) = frame.world.agent(agent) else {
        return;
    };
    let zone = ZoneEffect::new(
        caster,
        ZoneOrigin::Fixed(caster.position),
        cfg.sanctuary_radius,
        ZoneKind::Sanctuary {
            repel_speed: cfg.repel_speed,
        },
        frame.now,
        ZoneDuration::Until(frame.now + cfg.sanctuary_ms),
    );
    zones.register(zone);
    frame
        .world
        .timeline_mut()
        .schedule(frame.now + cfg.delay_ms, TimedEvent::CompleteRecall { agent });
}

fn dominate(frame: &mut Frame<'_>, agent: AgentId) {
    let cfg = frame.config.abilities.dominate;
    let Some(team) = frame.world.agent(agent).map(|a| a.team) else {
        return;
    };
    let revert_at = frame.now + cfg.duration_ms;
    // Only hostiles can be captured, whatever the friendly-fire setting.
    for id in targets_around(frame, agent, cfg.radius, false) {
        let Some(target) = frame.world.agent_mut(id) else {
            continue;
        };
        let original_team = target.status.team_swap.map_or(target.team, |s| s.original_team);
        target.status.team_swap = Some(TeamSwap { original_team });
        target.team = team;
        let timeline = frame.world.timeline_mut();
        timeline.cancel(|e| *e == TimedEvent::RevertTeam { agent: id });
        timeline.schedule(revert_at, TimedEvent::RevertTeam { agent: id });
        debug!(agent = id, from = original_team, to = team, "dominated");
    }
}

fn mirror(frame: &mut Frame<'_>, agent: AgentId) {
    let cfg = frame.config.abilities.mirror;
    let Some((team, element, position)) = frame.world.agent(agent).map(|a| (a.team, a.element, a.position)) else {
        return;
    };
    let offset = Vec2::from_angle(frame.rng.gen_range(0.0..std::f32::consts::TAU)) * frame.config.agents.collect_radius;
    let clone = frame.world.spawn_agent(team, element, position + offset, true);
    let expires_at = frame.now + cfg.duration_ms;
    if let Some(clone_agent) = frame.world.agent_mut(clone) {
        clone_agent.expires_at = Some(expires_at);
        clone_agent.clone_of = Some(agent);
    }
    frame
        .world
        .timeline_mut()
        .schedule(expires_at, TimedEvent::ExpireClone { agent: clone });
    debug!(caster = agent, clone, "clone spawned");
}

/// Teleport a recalling agent home and score its chain at the multiplier.
pub(crate) fn complete_recall(frame: &mut Frame<'_>, agent: AgentId) {
    let multiplier = frame.config.abilities.recall.multiplier;
    let respawn_at = frame.now + frame.config.spirits.respawn_delay_ms;
    let Some(team) = frame.world.agent(agent).map(|a| a.team) else {
        return;
    };
    let Some(base) = frame.world.base(team).map(|b| b.position) else {
        return;
    };
    let carried: Vec<SpiritId> = frame.world.possession().carried(agent).to_vec();
    let mut converted = 0u32;
    for spirit in carried {
        if frame.world.convert_spirit(spirit, team, respawn_at) {
            converted += 1;
        }
    }
    let points = converted.saturating_mul(multiplier);
    if let Some(t) = frame.world.team_mut(team) {
        t.add_score(points);
    }
    if let Some(caster) = frame.world.agent_mut(agent) {
        caster.position = base;
        caster.velocity = Vec2::ZERO;
        caster.status.knockback = None;
    }
    if points > 0 {
        frame.notifier.notify(base, &format!("+{points}"), Color::GOLD);
    }
    info!(agent, team, converted, points, "recall complete");
}

/// Return a dominated agent to its original team.
pub(crate) fn revert_team(frame: &mut Frame<'_>, agent: AgentId) {
    let Some(target) = frame.world.agent_mut(agent) else {
        return;
    };
    if let Some(swap) = target.status.team_swap.take() {
        debug!(agent, team = swap.original_team, "domination ended");
        target.team = swap.original_team;
    }
}

/// Remove a clone, handing its chain to the caster (or freeing it).
pub(crate) fn expire_clone(frame: &mut Frame<'_>, clone: AgentId) {
    let Some(caster) = frame.world.agent(clone).and_then(|a| a.clone_of) else {
        return;
    };
    let carried = frame.world.release_all(clone);
    if frame.world.agent(caster).is_some() {
        for spirit in carried {
            frame.world.attach_spirit(spirit, caster);
        }
    }
    frame.world.remove_agent(clone);
    debug!(clone, caster, "clone expired");
}
