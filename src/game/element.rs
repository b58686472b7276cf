//! Elements and the ability identifiers they grant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Elemental affinity of an agent or team.
///
/// Each element grants exactly one innate ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    /// Knockback and burning.
    Fire,
    /// Slowing ground.
    Earth,
    /// Freezing fields.
    Ice,
    /// Spinning winds.
    Air,
    /// Currents that drag enemies home.
    Water,
    /// Gravity wells.
    Void,
    /// Radiant self-buff.
    Light,
    /// Poison clouds.
    Nature,
    /// Walls and barricades.
    Metal,
    /// Growth of new spirits.
    Life,
    /// Recall and sanctuary.
    Arcane,
    /// Domination of minds.
    Shadow,
    /// Reflections and clones.
    Mirror,
}

impl Element {
    /// Every element, in declaration order.
    pub const ALL: [Element; 13] = [
        Element::Fire,
        Element::Earth,
        Element::Ice,
        Element::Air,
        Element::Water,
        Element::Void,
        Element::Light,
        Element::Nature,
        Element::Metal,
        Element::Life,
        Element::Arcane,
        Element::Shadow,
        Element::Mirror,
    ];

    /// The innate ability granted by this element.
    #[must_use]
    pub const fn innate_ability(self) -> AbilityId {
        match self {
            Element::Fire => AbilityId::Eruption,
            Element::Earth => AbilityId::Quicksand,
            Element::Ice => AbilityId::Frost,
            Element::Air => AbilityId::Tornado,
            Element::Water => AbilityId::Riptide,
            Element::Void => AbilityId::Void,
            Element::Light => AbilityId::Radiance,
            Element::Nature => AbilityId::Miasma,
            Element::Metal => AbilityId::Barricade,
            Element::Life => AbilityId::Bloom,
            Element::Arcane => AbilityId::Recall,
            Element::Shadow => AbilityId::Dominate,
            Element::Mirror => AbilityId::Mirror,
        }
    }

    /// Lowercase display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Earth => "earth",
            Element::Ice => "ice",
            Element::Air => "air",
            Element::Water => "water",
            Element::Void => "void",
            Element::Light => "light",
            Element::Nature => "nature",
            Element::Metal => "metal",
            Element::Life => "life",
            Element::Arcane => "arcane",
            Element::Shadow => "shadow",
            Element::Mirror => "mirror",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier of an ability in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityId {
    /// Radial knockback around the caster.
    Eruption,
    /// Slow zone.
    Quicksand,
    /// Freeze zone.
    Frost,
    /// Spin-and-eject zone.
    Tornado,
    /// Teleport-and-steal zone.
    Riptide,
    /// Magnetize-and-disappear zone.
    Void,
    /// Invincibility and speed self-buff.
    Radiance,
    /// Poison debuff on nearby agents.
    Miasma,
    /// Obstacle spawn.
    Barricade,
    /// Temporary spirit spawn.
    Bloom,
    /// Delayed base teleport with scoring bonus.
    Recall,
    /// Temporary team swap.
    Dominate,
    /// Temporary clone.
    Mirror,
}

impl AbilityId {
    /// Every ability, in declaration order.
    pub const ALL: [AbilityId; 13] = [
        AbilityId::Eruption,
        AbilityId::Quicksand,
        AbilityId::Frost,
        AbilityId::Tornado,
        AbilityId::Riptide,
        AbilityId::Void,
        AbilityId::Radiance,
        AbilityId::Miasma,
        AbilityId::Barricade,
        AbilityId::Bloom,
        AbilityId::Recall,
        AbilityId::Dominate,
        AbilityId::Mirror,
    ];

    /// Lowercase display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            AbilityId::Eruption => "eruption",
            AbilityId::Quicksand => "quicksand",
            AbilityId::Frost => "frost",
            AbilityId::Tornado => "tornado",
            AbilityId::Riptide => "riptide",
            AbilityId::Void => "void",
            AbilityId::Radiance => "radiance",
            AbilityId::Miasma => "miasma",
            AbilityId::Barricade => "barricade",
            AbilityId::Bloom => "bloom",
            AbilityId::Recall => "recall",
            AbilityId::Dominate => "dominate",
            AbilityId::Mirror => "mirror",
        }
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AbilityId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        AbilityId::ALL
            .into_iter()
            .find(|id| id.name() == wanted)
            .ok_or_else(|| format!("unknown ability '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_element_has_distinct_innate() {
        let mut seen: Vec<AbilityId> = Element::ALL.iter().map(|e| e.innate_ability()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), Element::ALL.len());
    }

    #[test]
    fn test_ability_parse() {
        assert_eq!("Frost".parse::<AbilityId>().unwrap(), AbilityId::Frost);
        assert_eq!(" void ".parse::<AbilityId>().unwrap(), AbilityId::Void);
        assert!("lava".parse::<AbilityId>().is_err());
    }
}
