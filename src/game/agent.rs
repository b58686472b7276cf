//! Agent state: identity, motion, charge, unlocked abilities and status.

use std::collections::BTreeMap;

use crate::game::{AbilityId, Element, Vec2, ZoneId};

/// Unique identifier for an agent.
pub type AgentId = u32;

/// Unique identifier for a team.
pub type TeamId = u8;

/// Timed invincibility and speed buff. Both halves expire together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Buff {
    /// Expiry timestamp.
    pub until: f64,
    /// Speed multiplier while active.
    pub speed_multiplier: f32,
}

/// A forced displacement applied instead of normal steering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Knockback {
    /// Velocity in units per second.
    pub velocity: Vec2,
    /// Expiry timestamp.
    pub until: f64,
}

/// Record of a temporary team reassignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamSwap {
    /// Team the agent returns to.
    pub original_team: TeamId,
}

/// Status flags. Zone marks are edge-triggered by the scheduler; timed
/// fields are cleared by the expiry pass once their timestamp passes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Status {
    /// Zone currently freezing this agent.
    pub frozen_by: Option<ZoneId>,
    /// Zone currently slowing this agent, with its speed factor.
    pub slowed_by: Option<(ZoneId, f32)>,
    /// Poison expiry.
    pub poisoned_until: Option<f64>,
    /// Invincibility and speed buff.
    pub buff: Option<Buff>,
    /// Disappearance expiry.
    pub vanished_until: Option<f64>,
    /// Active knockback.
    pub knockback: Option<Knockback>,
    /// Active team swap.
    pub team_swap: Option<TeamSwap>,
}

impl Status {
    /// Remove every debuff. Buffs and team swaps are left alone.
    pub fn cleanse(&mut self) {
        self.frozen_by = None;
        self.slowed_by = None;
        self.poisoned_until = None;
    }
}

/// A controllable unit.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Unique identifier.
    pub id: AgentId,
    /// Current team (may differ from the original while dominated).
    pub team: TeamId,
    /// Element, which fixes the innate ability.
    pub element: Element,
    /// Position in world units.
    pub position: Vec2,
    /// Velocity in units per second at base speed; speed modifiers apply on integration.
    pub velocity: Vec2,
    /// Driven by an agent controller rather than external input.
    pub is_autonomous: bool,
    /// Accumulated charge (human agents spend it).
    pub charge: f32,
    /// Unlocked abilities; index 0 is always the innate ability.
    pub unlocked: Vec<AbilityId>,
    /// Status flags.
    pub status: Status,
    /// Last activation timestamp per ability.
    pub last_used: BTreeMap<AbilityId, f64>,
    /// Removal timestamp for temporary agents.
    pub expires_at: Option<f64>,
    /// Agent this one is a clone of.
    pub clone_of: Option<AgentId>,
}

impl Agent {
    /// Create a new agent with only its innate ability unlocked.
    #[must_use]
    pub fn new(id: AgentId, team: TeamId, element: Element, position: Vec2, is_autonomous: bool) -> Self {
        Self {
            id,
            team,
            element,
            position,
            velocity: Vec2::ZERO,
            is_autonomous,
            charge: 0.0,
            unlocked: vec![element.innate_ability()],
            status: Status::default(),
            last_used: BTreeMap::new(),
            expires_at: None,
            clone_of: None,
        }
    }

    /// The innate ability.
    #[must_use]
    pub const fn innate(&self) -> AbilityId {
        self.element.innate_ability()
    }

    /// Whether `ability` is unlocked.
    #[must_use]
    pub fn has_unlocked(&self, ability: AbilityId) -> bool {
        self.unlocked.contains(&ability)
    }

    /// Rebuild the unlocked list from the innate ability and a team's extras.
    pub fn refresh_unlocked<'a>(&mut self, extras: impl IntoIterator<Item = &'a AbilityId>, cap: usize) {
        let innate = self.innate();
        self.unlocked.clear();
        self.unlocked.push(innate);
        for &extra in extras {
            if self.unlocked.len() > cap {
                break;
            }
            if extra != innate && !self.unlocked.contains(&extra) {
                self.unlocked.push(extra);
            }
        }
    }

    /// Frozen by a zone.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.status.frozen_by.is_some()
    }

    /// Poisoned.
    #[must_use]
    pub const fn is_poisoned(&self) -> bool {
        self.status.poisoned_until.is_some()
    }

    /// Invincible (buffed).
    #[must_use]
    pub const fn is_invincible(&self) -> bool {
        self.status.buff.is_some()
    }

    /// Vanished agents are invisible, untargetable and inert.
    #[must_use]
    pub const fn is_vanished(&self) -> bool {
        self.status.vanished_until.is_some()
    }

    /// Present in the world and able to interact.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_vanished()
    }

    /// Allowed to pick up or steal spirits.
    #[must_use]
    pub const fn can_collect(&self) -> bool {
        self.is_active() && !self.is_poisoned() && !self.is_frozen()
    }

    /// Product of all active speed modifiers.
    #[must_use]
    pub fn speed_multiplier(&self, poison_slow: f32) -> f32 {
        let mut multiplier = 1.0;
        if let Some((_, factor)) = self.status.slowed_by {
            multiplier *= factor;
        }
        if self.is_poisoned() {
            multiplier *= poison_slow;
        }
        if let Some(buff) = self.status.buff {
            multiplier *= buff.speed_multiplier;
        }
        multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_agent_has_innate_only() {
        let agent = Agent::new(1, 0, Element::Ice, Vec2::ZERO, true);
        assert_eq!(agent.unlocked, vec![AbilityId::Frost]);
        assert!(agent.is_active());
        assert!(agent.can_collect());
    }

    #[test]
    fn test_refresh_unlocked_respects_cap_and_innate() {
        let mut agent = Agent::new(1, 0, Element::Fire, Vec2::ZERO, true);
        let extras = [AbilityId::Eruption, AbilityId::Void, AbilityId::Bloom, AbilityId::Mirror];
        agent.refresh_unlocked(&extras, 2);
        assert_eq!(
            agent.unlocked,
            vec![AbilityId::Eruption, AbilityId::Void, AbilityId::Bloom]
        );
    }

    #[test]
    fn test_speed_multiplier_stacks() {
        let mut agent = Agent::new(1, 0, Element::Fire, Vec2::ZERO, true);
        agent.status.slowed_by = Some((7, 0.5));
        agent.status.poisoned_until = Some(100.0);
        let m = agent.speed_multiplier(0.5);
        assert!((m - 0.25).abs() < 1e-6);
        assert!(!agent.can_collect());
    }

    #[test]
    fn test_cleanse_keeps_buff() {
        let mut agent = Agent::new(1, 0, Element::Fire, Vec2::ZERO, true);
        agent.status.frozen_by = Some(3);
        agent.status.poisoned_until = Some(10.0);
        agent.status.buff = Some(Buff {
            until: 10.0,
            speed_multiplier: 2.0,
        });
        agent.status.cleanse();
        assert!(!agent.is_frozen());
        assert!(!agent.is_poisoned());
        assert!(agent.is_invincible());
    }
}
