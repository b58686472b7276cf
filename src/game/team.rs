//! Teams and their bases.

use std::collections::VecDeque;

use crate::game::{AbilityId, Element, TeamId, Vec2};

/// Maximum number of teams in a round.
pub const MAX_TEAMS: usize = 8;

/// Score, deposits and granted abilities for one team.
#[derive(Debug, Clone)]
pub struct Team {
    /// Unique identifier.
    pub id: TeamId,
    /// Theme element.
    pub element: Element,
    /// Points total.
    pub score: u32,
    /// Spirits that left the world through this team's base or conversions.
    pub deposited: u32,
    /// Extra abilities granted by pickups, oldest first.
    extras: VecDeque<AbilityId>,
}

impl Team {
    /// Create a team with no score and no extras.
    #[must_use]
    pub fn new(id: TeamId, element: Element) -> Self {
        Self {
            id,
            element,
            score: 0,
            deposited: 0,
            extras: VecDeque::new(),
        }
    }

    /// Extra abilities, oldest first.
    pub fn extras(&self) -> impl Iterator<Item = &AbilityId> {
        self.extras.iter()
    }

    /// Whether the team already holds `ability` as an extra.
    #[must_use]
    pub fn has_extra(&self, ability: AbilityId) -> bool {
        self.extras.contains(&ability)
    }

    /// Grant an extra ability, evicting the oldest past `cap`.
    ///
    /// Returns the evicted ability, if any. Granting one already held is a no-op.
    pub fn grant_extra(&mut self, ability: AbilityId, cap: usize) -> Option<AbilityId> {
        if self.has_extra(ability) {
            return None;
        }
        self.extras.push_back(ability);
        if self.extras.len() > cap {
            self.extras.pop_front()
        } else {
            None
        }
    }

    /// Add points.
    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Remove points, never going below zero.
    pub fn remove_score(&mut self, points: u32) {
        self.score = self.score.saturating_sub(points);
    }
}

/// Static deposit location of a team.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamBase {
    /// Owning team.
    pub team: TeamId,
    /// Center of the base.
    pub position: Vec2,
    /// Deposit radius.
    pub radius: f32,
    /// Theme element.
    pub element: Element,
}

impl TeamBase {
    /// Whether `point` lies within the deposit radius.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        self.position.distance(point) <= self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extras_evict_oldest() {
        let mut team = Team::new(0, Element::Fire);
        assert_eq!(team.grant_extra(AbilityId::Void, 2), None);
        assert_eq!(team.grant_extra(AbilityId::Bloom, 2), None);
        assert_eq!(team.grant_extra(AbilityId::Mirror, 2), Some(AbilityId::Void));
        let extras: Vec<_> = team.extras().copied().collect();
        assert_eq!(extras, vec![AbilityId::Bloom, AbilityId::Mirror]);
    }

    #[test]
    fn test_duplicate_grant_is_noop() {
        let mut team = Team::new(0, Element::Fire);
        team.grant_extra(AbilityId::Void, 1);
        assert_eq!(team.grant_extra(AbilityId::Void, 1), None);
        assert_eq!(team.extras().count(), 1);
    }

    #[test]
    fn test_score_saturates() {
        let mut team = Team::new(0, Element::Fire);
        team.add_score(1);
        team.remove_score(5);
        assert_eq!(team.score, 0);
    }
}
