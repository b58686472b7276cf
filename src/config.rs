//! Arena configuration.
//!
//! Every tunable constant the simulation reads lives here. Configs load from
//! TOML; every section and field has a default, so a file only needs the
//! values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::{AbilityId, Element};

/// Complete arena configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// World extent.
    pub world: WorldConfig,
    /// Round structure and team composition.
    pub round: RoundConfig,
    /// Agent movement, charge and bot heuristics.
    pub agents: AgentConfig,
    /// Spirit following, drifting and respawn.
    pub spirits: SpiritConfig,
    /// Team base placement and deposit radius.
    pub bases: BaseConfig,
    /// Ability catalog tuning.
    pub abilities: AbilityConfig,
    /// Ability pickups.
    pub pickups: PickupConfig,
}

impl ArenaConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or fails
    /// validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not parse or fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that every value is one the simulation can run with.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("world.width", self.world.width)?;
        positive("world.height", self.world.height)?;
        positive_ms("round.duration_ms", self.round.duration_ms)?;
        if self.round.grace_ms < 0.0 {
            return Err(invalid("round.grace_ms", "must not be negative"));
        }
        if self.round.agents_per_team == 0 {
            return Err(invalid("round.agents_per_team", "must be at least 1"));
        }
        positive("agents.speed", self.agents.speed)?;
        positive("agents.collect_radius", self.agents.collect_radius)?;
        positive_ms("agents.decision_interval_ms", self.agents.decision_interval_ms)?;
        ordered(
            "agents.aggressiveness",
            self.agents.aggressiveness_min,
            self.agents.aggressiveness_max,
        )?;
        if !(0.0..=1.0).contains(&self.agents.aggressiveness_max) {
            return Err(invalid("agents.aggressiveness_max", "must be within 0..=1"));
        }
        ordered_ms(
            "agents.return_interval_ms",
            self.agents.return_interval_min_ms,
            self.agents.return_interval_max_ms,
        )?;
        if self.agents.return_low >= self.agents.return_high {
            return Err(invalid(
                "agents.return_low",
                "must be below agents.return_high",
            ));
        }
        probability("agents.ability_chance", self.agents.ability_chance)?;
        probability("agents.extra_ability_chance", self.agents.extra_ability_chance)?;
        positive("agents.charge_max", self.agents.charge_max)?;
        non_negative("agents.aggressiveness_min", self.agents.aggressiveness_min)?;
        non_negative_ms("agents.return_interval_min_ms", self.agents.return_interval_min_ms)?;
        non_negative("agents.near_free_distance", self.agents.near_free_distance)?;
        non_negative("agents.crowd_radius", self.agents.crowd_radius)?;
        non_negative("agents.jitter", self.agents.jitter)?;
        non_negative("agents.charge_rate", self.agents.charge_rate)?;
        non_negative("agents.charge_per_spirit", self.agents.charge_per_spirit)?;
        non_negative("agents.poison_slow", self.agents.poison_slow)?;
        positive("spirits.follow_speed", self.spirits.follow_speed)?;
        positive("spirits.spacing", self.spirits.spacing)?;
        non_negative("spirits.drift_speed", self.spirits.drift_speed)?;
        non_negative_ms("spirits.respawn_delay_ms", self.spirits.respawn_delay_ms)?;
        positive("spirits.deposit_speed", self.spirits.deposit_speed)?;
        positive("bases.radius", self.bases.radius)?;
        positive("bases.ring_fraction", self.bases.ring_fraction)?;
        self.abilities.validate()?;
        positive_ms("pickups.interval_ms", self.pickups.interval_ms)?;
        positive("pickups.radius", self.pickups.radius)?;
        Ok(())
    }
}

impl AbilityConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.extra_ability_cap == 0 {
            return Err(invalid("abilities.extra_ability_cap", "must be at least 1"));
        }
        non_negative_ms("abilities.extra_cooldown_ms", self.extra_cooldown_ms)?;

        positive("abilities.eruption.radius", self.eruption.radius)?;
        non_negative("abilities.eruption.displacement", self.eruption.displacement)?;
        positive_ms("abilities.eruption.push_ms", self.eruption.push_ms)?;

        positive("abilities.quicksand.radius", self.quicksand.radius)?;
        positive_ms("abilities.quicksand.duration_ms", self.quicksand.duration_ms)?;
        non_negative("abilities.quicksand.slow_factor", self.quicksand.slow_factor)?;

        positive("abilities.frost.radius", self.frost.radius)?;
        positive_ms("abilities.frost.duration_ms", self.frost.duration_ms)?;

        positive("abilities.tornado.radius", self.tornado.radius)?;
        positive_ms("abilities.tornado.duration_ms", self.tornado.duration_ms)?;
        non_negative_ms("abilities.tornado.dwell_ms", self.tornado.dwell_ms)?;
        if !self.tornado.spin_rate.is_finite() {
            return Err(invalid("abilities.tornado.spin_rate", "must be finite"));
        }
        non_negative("abilities.tornado.eject_distance", self.tornado.eject_distance)?;
        positive_ms("abilities.tornado.eject_ms", self.tornado.eject_ms)?;
        non_negative("abilities.tornado.scatter", self.tornado.scatter)?;

        positive("abilities.riptide.radius", self.riptide.radius)?;
        positive_ms("abilities.riptide.duration_ms", self.riptide.duration_ms)?;

        positive("abilities.void.outer_radius", self.void.outer_radius)?;
        non_negative("abilities.void.inner_radius", self.void.inner_radius)?;
        if self.void.inner_radius >= self.void.outer_radius {
            return Err(invalid(
                "abilities.void.inner_radius",
                "must be smaller than abilities.void.outer_radius",
            ));
        }
        positive_ms("abilities.void.duration_ms", self.void.duration_ms)?;
        non_negative("abilities.void.pull_speed", self.void.pull_speed)?;
        positive_ms("abilities.void.vanish_ms", self.void.vanish_ms)?;

        positive_ms("abilities.radiance.duration_ms", self.radiance.duration_ms)?;
        positive("abilities.radiance.speed_multiplier", self.radiance.speed_multiplier)?;
        positive("abilities.radiance.magnet_radius", self.radiance.magnet_radius)?;
        non_negative("abilities.radiance.magnet_speed", self.radiance.magnet_speed)?;

        positive("abilities.miasma.radius", self.miasma.radius)?;
        positive_ms("abilities.miasma.duration_ms", self.miasma.duration_ms)?;

        non_negative("abilities.barricade.distance", self.barricade.distance)?;
        positive("abilities.barricade.obstacle_radius", self.barricade.obstacle_radius)?;
        positive_ms("abilities.barricade.lifespan_ms", self.barricade.lifespan_ms)?;

        non_negative("abilities.bloom.scatter", self.bloom.scatter)?;
        positive_ms("abilities.bloom.lifespan_ms", self.bloom.lifespan_ms)?;

        non_negative_ms("abilities.recall.delay_ms", self.recall.delay_ms)?;
        positive("abilities.recall.sanctuary_radius", self.recall.sanctuary_radius)?;
        positive_ms("abilities.recall.sanctuary_ms", self.recall.sanctuary_ms)?;
        non_negative("abilities.recall.repel_speed", self.recall.repel_speed)?;

        positive("abilities.dominate.radius", self.dominate.radius)?;
        positive_ms("abilities.dominate.duration_ms", self.dominate.duration_ms)?;

        positive_ms("abilities.mirror.duration_ms", self.mirror.duration_ms)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be positive, got {value}")))
    }
}

fn positive_ms(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be positive, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, &format!("must not be negative, got {value}")))
    }
}

fn non_negative_ms(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, &format!("must not be negative, got {value}")))
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(invalid(field, &format!("min {min} exceeds max {max}")))
    }
}

fn ordered_ms(field: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(invalid(field, &format!("min {min} exceeds max {max}")))
    }
}

fn probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be within 0..=1, got {value}")))
    }
}

/// World extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width in world units.
    pub width: f32,
    /// Height in world units.
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 1000.0,
        }
    }
}

/// Round structure and team composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Round length in milliseconds.
    pub duration_ms: f64,
    /// Pre-round grace period during which no ability can be used.
    pub grace_ms: f64,
    /// One entry per team; the element themes the team and its base.
    pub team_elements: Vec<Element>,
    /// Agents spawned per team.
    pub agents_per_team: usize,
    /// Number of agents driven by external input instead of a controller.
    pub human_agents: usize,
    /// Give each agent a random element instead of the team element.
    pub mixed_elements: bool,
    /// Bypass grace periods and cooldowns.
    pub debug: bool,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            duration_ms: 180_000.0,
            grace_ms: 3_000.0,
            team_elements: vec![Element::Fire, Element::Water, Element::Earth, Element::Air],
            agents_per_team: 3,
            human_agents: 0,
            mixed_elements: true,
            debug: false,
        }
    }
}

/// Agent movement, charge and bot heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Base movement speed in units per second.
    pub speed: f32,
    /// Distance at which an agent picks up or steals a spirit.
    pub collect_radius: f32,
    /// Interval between bot target decisions.
    pub decision_interval_ms: f64,
    /// A free spirit this close is always preferred.
    pub near_free_distance: f32,
    /// Teammates closer than this push each other sideways.
    pub crowd_radius: f32,
    /// Strength of the sideways crowd nudge, as a fraction of speed.
    pub crowd_nudge: f32,
    /// Maximum random jitter, as a fraction of speed.
    pub jitter: f32,
    /// Lower bound of the per-bot aggressiveness draw.
    pub aggressiveness_min: f32,
    /// Upper bound of the per-bot aggressiveness draw.
    pub aggressiveness_max: f32,
    /// Lower bound of the per-bot return interval draw.
    pub return_interval_min_ms: f64,
    /// Upper bound of the per-bot return interval draw.
    pub return_interval_max_ms: f64,
    /// Carrying this many spirits forces a return.
    pub return_high: usize,
    /// Carrying more than this many spirits allows a timed return.
    pub return_low: usize,
    /// Per-tick probability that a bot uses a ready ability.
    pub ability_chance: f64,
    /// Probability that a bot picks a non-innate ability when allowed.
    pub extra_ability_chance: f64,
    /// Charge needed by a human agent to use an ability.
    pub charge_max: f32,
    /// Charge gained per second.
    pub charge_rate: f32,
    /// Charge gained per spirit collected.
    pub charge_per_spirit: f32,
    /// Speed multiplier while poisoned.
    pub poison_slow: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            speed: 160.0,
            collect_radius: 24.0,
            decision_interval_ms: 200.0,
            near_free_distance: 150.0,
            crowd_radius: 40.0,
            crowd_nudge: 0.35,
            jitter: 0.15,
            aggressiveness_min: 0.2,
            aggressiveness_max: 0.6,
            return_interval_min_ms: 4_000.0,
            return_interval_max_ms: 9_000.0,
            return_high: 5,
            return_low: 2,
            ability_chance: 0.01,
            extra_ability_chance: 0.05,
            charge_max: 100.0,
            charge_rate: 5.0,
            charge_per_spirit: 10.0,
            poison_slow: 0.6,
        }
    }
}

/// Spirit following, drifting and respawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiritConfig {
    /// Spirits spawned at round start.
    pub count: usize,
    /// Speed of an owned spirit chasing its follow target.
    pub follow_speed: f32,
    /// Owned spirits hold position within this distance of their target.
    pub spacing: f32,
    /// Passive drift speed of free spirits.
    pub drift_speed: f32,
    /// Delay before a deposited or destroyed spirit respawns.
    pub respawn_delay_ms: f64,
    /// Speed of a deposited spirit flying into its base.
    pub deposit_speed: f32,
}

impl Default for SpiritConfig {
    fn default() -> Self {
        Self {
            count: 24,
            follow_speed: 220.0,
            spacing: 18.0,
            drift_speed: 12.0,
            respawn_delay_ms: 5_000.0,
            deposit_speed: 400.0,
        }
    }
}

/// Team base placement and deposit radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseConfig {
    /// Deposit radius around each base.
    pub radius: f32,
    /// Bases sit on a ring of this fraction of the smaller world dimension.
    pub ring_fraction: f32,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            radius: 60.0,
            ring_fraction: 0.38,
        }
    }
}

/// Ability pickups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    /// Interval between pickup spawns.
    pub interval_ms: f64,
    /// Maximum pickups in the world at once.
    pub max_active: usize,
    /// Touch radius.
    pub radius: f32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            interval_ms: 15_000.0,
            max_active: 2,
            radius: 20.0,
        }
    }
}

/// Ability catalog tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityConfig {
    /// Whether effects may hit the caster's allies.
    pub friendly_fire: bool,
    /// Maximum extra abilities held by a team.
    pub extra_ability_cap: usize,
    /// Cooldown of extra (non-innate) abilities.
    pub extra_cooldown_ms: f64,
    /// Allow bots to pick non-innate abilities.
    pub bots_use_extra_abilities: bool,
    /// Abilities with no registered handler.
    pub disabled: Vec<AbilityId>,
    /// Eruption tuning.
    pub eruption: EruptionConfig,
    /// Quicksand tuning.
    pub quicksand: QuicksandConfig,
    /// Frost tuning.
    pub frost: FrostConfig,
    /// Tornado tuning.
    pub tornado: TornadoConfig,
    /// Riptide tuning.
    pub riptide: RiptideConfig,
    /// Void tuning.
    pub void: VoidConfig,
    /// Radiance tuning.
    pub radiance: RadianceConfig,
    /// Miasma tuning.
    pub miasma: MiasmaConfig,
    /// Barricade tuning.
    pub barricade: BarricadeConfig,
    /// Bloom tuning.
    pub bloom: BloomConfig,
    /// Recall tuning.
    pub recall: RecallConfig,
    /// Dominate tuning.
    pub dominate: DominateConfig,
    /// Mirror tuning.
    pub mirror: MirrorConfig,
}

impl Default for AbilityConfig {
    fn default() -> Self {
        Self {
            friendly_fire: false,
            extra_ability_cap: 3,
            extra_cooldown_ms: 8_000.0,
            bots_use_extra_abilities: true,
            disabled: Vec::new(),
            eruption: EruptionConfig::default(),
            quicksand: QuicksandConfig::default(),
            frost: FrostConfig::default(),
            tornado: TornadoConfig::default(),
            riptide: RiptideConfig::default(),
            void: VoidConfig::default(),
            radiance: RadianceConfig::default(),
            miasma: MiasmaConfig::default(),
            barricade: BarricadeConfig::default(),
            bloom: BloomConfig::default(),
            recall: RecallConfig::default(),
            dominate: DominateConfig::default(),
            mirror: MirrorConfig::default(),
        }
    }
}

/// Eruption: radial knockback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EruptionConfig {
    /// Effect radius.
    pub radius: f32,
    /// Total outward displacement.
    pub displacement: f32,
    /// Time over which the displacement is applied.
    pub push_ms: f64,
    /// Destroy the pushed agents' carried spirits.
    pub burn_carried: bool,
}

impl Default for EruptionConfig {
    fn default() -> Self {
        Self {
            radius: 140.0,
            displacement: 180.0,
            push_ms: 300.0,
            burn_carried: true,
        }
    }
}

/// Quicksand: slow zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuicksandConfig {
    /// Zone radius.
    pub radius: f32,
    /// Zone lifetime.
    pub duration_ms: f64,
    /// Speed multiplier inside.
    pub slow_factor: f32,
}

impl Default for QuicksandConfig {
    fn default() -> Self {
        Self {
            radius: 130.0,
            duration_ms: 8_000.0,
            slow_factor: 0.35,
        }
    }
}

/// Frost: freeze zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrostConfig {
    /// Zone radius.
    pub radius: f32,
    /// Zone lifetime.
    pub duration_ms: f64,
}

impl Default for FrostConfig {
    fn default() -> Self {
        Self {
            radius: 110.0,
            duration_ms: 10_000.0,
        }
    }
}

/// Tornado: spin-and-eject zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TornadoConfig {
    /// Zone radius.
    pub radius: f32,
    /// Zone lifetime.
    pub duration_ms: f64,
    /// Time an agent spins before it is ejected.
    pub dwell_ms: f64,
    /// Angular speed of the spin, radians per second.
    pub spin_rate: f32,
    /// Outward displacement on ejection.
    pub eject_distance: f32,
    /// Time over which the ejection is applied.
    pub eject_ms: f64,
    /// Maximum distance scattered spirits are thrown.
    pub scatter: f32,
}

impl Default for TornadoConfig {
    fn default() -> Self {
        Self {
            radius: 120.0,
            duration_ms: 7_000.0,
            dwell_ms: 1_500.0,
            spin_rate: 4.0,
            eject_distance: 260.0,
            eject_ms: 400.0,
            scatter: 90.0,
        }
    }
}

/// Riptide: teleport-and-steal zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiptideConfig {
    /// Zone radius.
    pub radius: f32,
    /// Zone lifetime.
    pub duration_ms: f64,
}

impl Default for RiptideConfig {
    fn default() -> Self {
        Self {
            radius: 90.0,
            duration_ms: 5_000.0,
        }
    }
}

/// Void: magnetize-and-disappear zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoidConfig {
    /// Pull radius.
    pub outer_radius: f32,
    /// Disappearance radius.
    pub inner_radius: f32,
    /// Zone lifetime.
    pub duration_ms: f64,
    /// Pull speed at the outer edge; grows toward the center.
    pub pull_speed: f32,
    /// How long swallowed agents stay vanished.
    pub vanish_ms: f64,
}

impl Default for VoidConfig {
    fn default() -> Self {
        Self {
            outer_radius: 220.0,
            inner_radius: 40.0,
            duration_ms: 6_000.0,
            pull_speed: 60.0,
            vanish_ms: 3_000.0,
        }
    }
}

/// Radiance: invincibility, speed and spirit magnet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadianceConfig {
    /// Buff lifetime.
    pub duration_ms: f64,
    /// Speed multiplier while buffed.
    pub speed_multiplier: f32,
    /// Radius of the spirit magnet.
    pub magnet_radius: f32,
    /// Speed at which free spirits are drawn in.
    pub magnet_speed: f32,
}

impl Default for RadianceConfig {
    fn default() -> Self {
        Self {
            duration_ms: 6_000.0,
            speed_multiplier: 1.5,
            magnet_radius: 90.0,
            magnet_speed: 150.0,
        }
    }
}

/// Miasma: poison debuff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiasmaConfig {
    /// Effect radius.
    pub radius: f32,
    /// Debuff lifetime.
    pub duration_ms: f64,
}

impl Default for MiasmaConfig {
    fn default() -> Self {
        Self {
            radius: 150.0,
            duration_ms: 5_000.0,
        }
    }
}

/// Barricade: obstacle spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarricadeConfig {
    /// Obstacles per cast.
    pub count: usize,
    /// Maximum offset from the caster.
    pub distance: f32,
    /// Obstacle radius.
    pub obstacle_radius: f32,
    /// Obstacle lifetime.
    pub lifespan_ms: f64,
}

impl Default for BarricadeConfig {
    fn default() -> Self {
        Self {
            count: 3,
            distance: 80.0,
            obstacle_radius: 18.0,
            lifespan_ms: 12_000.0,
        }
    }
}

/// Bloom: temporary spirit spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    /// Spirits per cast.
    pub count: usize,
    /// Maximum offset from the caster.
    pub scatter: f32,
    /// Lifetime of each spawned spirit.
    pub lifespan_ms: f64,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            count: 3,
            scatter: 60.0,
            lifespan_ms: 10_000.0,
        }
    }
}

/// Recall: delayed base teleport and sanctuary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    /// Delay before the caster is teleported.
    pub delay_ms: f64,
    /// Score multiplier for carried spirits.
    pub multiplier: u32,
    /// Radius of the sanctuary left at the cast point.
    pub sanctuary_radius: f32,
    /// Lifetime of the sanctuary.
    pub sanctuary_ms: f64,
    /// Speed at which hostile agents are pushed out of the sanctuary.
    pub repel_speed: f32,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            delay_ms: 800.0,
            multiplier: 2,
            sanctuary_radius: 70.0,
            sanctuary_ms: 3_000.0,
            repel_speed: 200.0,
        }
    }
}

/// Dominate: temporary team swap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DominateConfig {
    /// Effect radius.
    pub radius: f32,
    /// Swap lifetime.
    pub duration_ms: f64,
}

impl Default for DominateConfig {
    fn default() -> Self {
        Self {
            radius: 120.0,
            duration_ms: 5_000.0,
        }
    }
}

/// Mirror: temporary clone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Clone lifetime.
    pub duration_ms: f64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            duration_ms: 8_000.0,
        }
    }
}
