//! Possession chains: who carries which spirit, and in what order.
//!
//! The chain is the only writer of the owner relation. Queue positions are
//! vector indices, so contiguity from 0 holds by construction: a transfer
//! removes the spirit from its old queue (shifting later spirits down) and
//! appends it to the new one.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::game::frame::Frame;
use crate::game::{AgentId, Color, InFlight, SpiritId, TimedEvent, WorldState, millis_to_secs};

/// Ownership index: owner → ordered spirits, and the inverse.
#[derive(Debug, Clone, Default)]
pub struct PossessionChain {
    queues: BTreeMap<AgentId, Vec<SpiritId>>,
    owners: BTreeMap<SpiritId, AgentId>,
}

impl PossessionChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current owner of a spirit.
    #[must_use]
    pub fn owner_of(&self, spirit: SpiritId) -> Option<AgentId> {
        self.owners.get(&spirit).copied()
    }

    /// Whether a spirit has an owner.
    #[must_use]
    pub fn is_owned(&self, spirit: SpiritId) -> bool {
        self.owners.contains_key(&spirit)
    }

    /// Position of a spirit in its owner's queue (0 follows the owner directly).
    #[must_use]
    pub fn queue_position(&self, spirit: SpiritId) -> Option<usize> {
        let owner = self.owner_of(spirit)?;
        self.carried(owner).iter().position(|&s| s == spirit)
    }

    /// Spirits carried by `owner`, front of the chain first.
    #[must_use]
    pub fn carried(&self, owner: AgentId) -> &[SpiritId] {
        self.queues.get(&owner).map_or(&[], Vec::as_slice)
    }

    /// Number of spirits carried by `owner`.
    #[must_use]
    pub fn carried_count(&self, owner: AgentId) -> usize {
        self.carried(owner).len()
    }

    /// Agents carrying at least one spirit.
    pub fn owners(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.queues.keys().copied()
    }

    /// Total number of owned spirits.
    #[must_use]
    pub fn owned_count(&self) -> usize {
        self.owners.len()
    }

    /// Give `spirit` to `owner` at the back of its queue.
    ///
    /// Returns the previous owner. Attaching to the current owner is a no-op.
    pub fn attach(&mut self, spirit: SpiritId, owner: AgentId) -> Option<AgentId> {
        let previous = self.owner_of(spirit);
        if previous == Some(owner) {
            return previous;
        }
        if previous.is_some() {
            self.release(spirit);
        }
        self.queues.entry(owner).or_default().push(spirit);
        self.owners.insert(spirit, owner);
        previous
    }

    /// Clear the owner of `spirit`. Later spirits in the queue move up by one.
    ///
    /// Returns the previous owner.
    pub fn release(&mut self, spirit: SpiritId) -> Option<AgentId> {
        let owner = self.owners.remove(&spirit)?;
        if let Some(queue) = self.queues.get_mut(&owner) {
            queue.retain(|&s| s != spirit);
            if queue.is_empty() {
                self.queues.remove(&owner);
            }
        }
        Some(owner)
    }

    /// Release everything `owner` carries, returning the spirits in queue order.
    pub fn release_all(&mut self, owner: AgentId) -> Vec<SpiritId> {
        let spirits = self.queues.remove(&owner).unwrap_or_default();
        for spirit in &spirits {
            self.owners.remove(spirit);
        }
        spirits
    }

    /// Describe every internal inconsistency between the two indexes.
    #[must_use]
    pub fn consistency_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = 0usize;
        for (&owner, queue) in &self.queues {
            if queue.is_empty() {
                errors.push(format!("Agent {owner} has an empty queue entry"));
            }
            for (position, &spirit) in queue.iter().enumerate() {
                seen += 1;
                match self.owners.get(&spirit) {
                    Some(&o) if o == owner => {}
                    Some(&o) => errors.push(format!(
                        "Spirit {spirit} queued under agent {owner} at {position} but owned by {o}"
                    )),
                    None => errors.push(format!(
                        "Spirit {spirit} queued under agent {owner} at {position} but has no owner"
                    )),
                }
            }
        }
        if seen != self.owners.len() {
            errors.push(format!(
                "{} owner entries but {seen} queued spirits",
                self.owners.len()
            ));
        }
        errors
    }
}

/// Move `spirit` from its current owner to `thief`.
///
/// Only succeeds when the spirit is owned by an agent on another team who is
/// not invincible, and the thief is able to collect. The victim's team loses a
/// point and the thief's team gains one.
pub fn steal(world: &mut WorldState, spirit: SpiritId, thief: AgentId) -> bool {
    let Some(victim) = world.possession().owner_of(spirit) else {
        return false;
    };
    let (Some(victim_agent), Some(thief_agent)) = (world.agent(victim), world.agent(thief)) else {
        return false;
    };
    if victim_agent.team == thief_agent.team
        || victim_agent.is_invincible()
        || !thief_agent.can_collect()
    {
        return false;
    }
    let (victim_team, thief_team) = (victim_agent.team, thief_agent.team);

    world.attach_spirit(spirit, thief);
    if let Some(team) = world.team_mut(victim_team) {
        team.remove_score(1);
    }
    if let Some(team) = world.team_mut(thief_team) {
        team.add_score(1);
    }
    debug!(spirit, victim, thief, "spirit stolen");
    true
}

/// Deposit everything `agent` carries into its team's base.
///
/// The spirits are released and fly to the base; the team scores them
/// immediately. Returns the number deposited. Carrying nothing, or having no
/// base, is a no-op.
pub fn deposit(world: &mut WorldState, agent: AgentId) -> u32 {
    let Some(team) = world.agent(agent).map(|a| a.team) else {
        return 0;
    };
    let Some(base) = world.base(team).copied() else {
        return 0;
    };
    if world.possession().carried_count(agent) == 0 {
        return 0;
    }

    let spirits = world.release_all(agent);
    let mut count = 0u32;
    for id in spirits {
        if let Some(spirit) = world.spirit_mut(id) {
            spirit.in_flight = Some(InFlight {
                team,
                target: base.position,
            });
            count += 1;
        }
    }
    if let Some(team) = world.team_mut(team) {
        team.add_score(count);
    }
    debug!(agent, team, count, "deposit");
    count
}

/// Possession pass of the tick: contacts, deposits, then motion.
pub(crate) fn step(frame: &mut Frame<'_>) {
    resolve_contacts(frame);
    deposit_at_bases(frame);
    let dt = millis_to_secs(frame.delta);
    follow_owners(
        frame.world,
        frame.config.spirits.spacing,
        frame.config.spirits.follow_speed * dt,
    );
    drift_free(frame.world, dt);
    land_in_flight(frame, dt);
}

/// Collect free spirits and steal hostile ones within collect radius.
fn resolve_contacts(frame: &mut Frame<'_>) {
    let radius = frame.config.agents.collect_radius;
    let charge_per_spirit = frame.config.agents.charge_per_spirit;
    let charge_max = frame.config.agents.charge_max;

    let collectors: Vec<AgentId> = frame
        .world
        .agents()
        .filter(|a| a.can_collect())
        .map(|a| a.id)
        .collect();

    for agent_id in collectors {
        let Some(position) = frame.world.agent(agent_id).map(|a| a.position) else {
            continue;
        };
        for spirit_id in frame.world.spirits_within(position, radius) {
            let in_flight = frame.world.spirit(spirit_id).is_none_or(|s| s.is_in_flight());
            if in_flight {
                continue;
            }
            match frame.world.possession().owner_of(spirit_id) {
                None => {
                    frame.world.attach_spirit(spirit_id, agent_id);
                    if let Some(agent) = frame.world.agent_mut(agent_id) {
                        agent.charge = (agent.charge + charge_per_spirit).min(charge_max);
                    }
                    trace!(agent = agent_id, spirit = spirit_id, "collected");
                }
                Some(owner) if owner == agent_id => {}
                Some(_) => {
                    if steal(frame.world, spirit_id, agent_id) {
                        frame.notifier.notify(position, "Stolen!", Color::RED);
                    }
                }
            }
        }
    }
}

/// Deposit for every carrier standing in its own base.
fn deposit_at_bases(frame: &mut Frame<'_>) {
    let carriers: Vec<AgentId> = frame.world.possession().owners().collect();
    for agent_id in carriers {
        let Some(agent) = frame.world.agent(agent_id) else {
            continue;
        };
        if !agent.is_active() {
            continue;
        }
        let at_base = frame
            .world
            .base(agent.team)
            .is_some_and(|base| base.contains(agent.position));
        if !at_base {
            continue;
        }
        let position = agent.position;
        let count = deposit(frame.world, agent_id);
        if count > 0 {
            frame.notifier.notify(position, &format!("+{count}"), Color::GOLD);
        }
    }
}

/// Move each owned spirit toward the one ahead of it (or the owner).
///
/// A spirit moves only while strictly farther than `spacing` from its target.
pub(crate) fn follow_owners(world: &mut WorldState, spacing: f32, max_step: f32) {
    let owners: Vec<AgentId> = world.possession().owners().collect();
    for owner in owners {
        let Some(mut leader) = world.agent(owner).map(|a| a.position) else {
            continue;
        };
        let queue = world.possession().carried(owner).to_vec();
        for spirit_id in queue {
            let Some(spirit) = world.spirit_mut(spirit_id) else {
                continue;
            };
            if spirit.position.distance(leader) > spacing {
                spirit.position = spirit.position.step_toward(leader, max_step);
            }
            leader = spirit.position;
        }
    }
}

/// Free spirits float along their drift vector and bounce off the walls.
fn drift_free(world: &mut WorldState, dt: f32) {
    let bounds = world.bounds();
    let free: Vec<SpiritId> = world.free_spirit_ids();
    for id in free {
        let Some(spirit) = world.spirit_mut(id) else {
            continue;
        };
        let mut next = spirit.position + spirit.drift * dt;
        if next.x < 0.0 || next.x > bounds.width {
            spirit.drift.x = -spirit.drift.x;
        }
        if next.y < 0.0 || next.y > bounds.height {
            spirit.drift.y = -spirit.drift.y;
        }
        next = bounds.clamp(next);
        spirit.position = next;
    }
}

/// Fly deposited spirits home; on arrival they leave the world and a respawn
/// is scheduled (temporary spirits never respawn).
fn land_in_flight(frame: &mut Frame<'_>, dt: f32) {
    let step = frame.config.spirits.deposit_speed * dt;
    let respawn_at = frame.now + frame.config.spirits.respawn_delay_ms;
    let flying: Vec<SpiritId> = frame
        .world
        .spirits()
        .filter(|s| s.is_in_flight())
        .map(|s| s.id)
        .collect();

    for id in flying {
        let Some(spirit) = frame.world.spirit_mut(id) else {
            continue;
        };
        let Some(flight) = spirit.in_flight else {
            continue;
        };
        spirit.position = spirit.position.step_toward(flight.target, step);
        if spirit.position.distance(flight.target) > LANDING_DISTANCE {
            continue;
        }
        let temporary = spirit.is_temporary();
        frame.world.remove_spirit(id);
        if let Some(team) = frame.world.team_mut(flight.team) {
            team.deposited += 1;
        }
        if !temporary {
            frame.world.timeline_mut().schedule(respawn_at, TimedEvent::RespawnSpirit);
        }
    }
}

/// In-flight spirits closer than this to their base have landed.
const LANDING_DISTANCE: f32 = 1.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_assigns_next_position() {
        let mut chain = PossessionChain::new();
        chain.attach(10, 1);
        chain.attach(11, 1);
        chain.attach(12, 1);
        assert_eq!(chain.queue_position(10), Some(0));
        assert_eq!(chain.queue_position(12), Some(2));
        assert_eq!(chain.carried(1), &[10, 11, 12]);
    }

    #[test]
    fn test_transfer_closes_gap() {
        let mut chain = PossessionChain::new();
        chain.attach(10, 1);
        chain.attach(11, 1);
        chain.attach(12, 1);
        chain.attach(20, 2);

        let previous = chain.attach(10, 2);
        assert_eq!(previous, Some(1));
        assert_eq!(chain.carried(1), &[11, 12]);
        assert_eq!(chain.queue_position(11), Some(0));
        assert_eq!(chain.queue_position(12), Some(1));
        assert_eq!(chain.queue_position(10), Some(1));
        assert!(chain.consistency_errors().is_empty());
    }

    #[test]
    fn test_attach_to_same_owner_is_noop() {
        let mut chain = PossessionChain::new();
        chain.attach(10, 1);
        chain.attach(11, 1);
        chain.attach(10, 1);
        assert_eq!(chain.carried(1), &[10, 11]);
    }

    #[test]
    fn test_release_last_removes_queue() {
        let mut chain = PossessionChain::new();
        chain.attach(10, 1);
        assert_eq!(chain.release(10), Some(1));
        assert_eq!(chain.release(10), None);
        assert_eq!(chain.owners().count(), 0);
        assert!(!chain.is_owned(10));
    }

    #[test]
    fn test_release_all_in_order() {
        let mut chain = PossessionChain::new();
        chain.attach(3, 1);
        chain.attach(1, 1);
        chain.attach(2, 1);
        assert_eq!(chain.release_all(1), vec![3, 1, 2]);
        assert_eq!(chain.owned_count(), 0);
        assert!(chain.release_all(1).is_empty());
    }
}
