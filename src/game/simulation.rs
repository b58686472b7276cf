//! The simulation: owns the world, the zone scheduler, the controllers and the
//! match context, and runs the fixed per-tick order.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;

use crate::config::ArenaConfig;
use crate::error::SetupError;
use crate::game::ability::{self, AbilityCatalog, Activation};
use crate::game::controller::{AgentController, controller_seed};
use crate::game::frame::Frame;
use crate::game::{
    AbilityId, AgentId, Notifier, TeamId, TracingNotifier, Vec2, WorldState, ZoneScheduler, expiry,
    motion, pickup, possession, setup,
};

/// Everything a match is defined by.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchContext {
    /// Tuning.
    pub config: ArenaConfig,
    /// Seed for every random draw in the match.
    pub seed: u64,
}

impl MatchContext {
    /// Bundle a config and a seed.
    #[must_use]
    pub const fn new(config: ArenaConfig, seed: u64) -> Self {
        Self { config, seed }
    }
}

/// A running match.
#[derive(Debug)]
pub struct Simulation<N: Notifier = TracingNotifier> {
    context: MatchContext,
    world: WorldState,
    zones: ZoneScheduler,
    catalog: AbilityCatalog,
    controllers: BTreeMap<AgentId, AgentController>,
    rng: SmallRng,
    notifier: N,
    now: f64,
    round_started_at: f64,
    last_pickup_at: f64,
    round_over: bool,
    ticks: u64,
}

impl<N: Notifier> Simulation<N> {
    /// Build a simulation and set up the first round at time 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the world can't be built from the config.
    pub fn new(context: MatchContext, notifier: N) -> Result<Self, SetupError> {
        let mut rng = SmallRng::seed_from_u64(context.seed);
        let world = setup::build_world(&context.config, &mut rng)?;
        Ok(Self::assemble(context, world, rng, notifier))
    }

    /// Run a simulation over a hand-built world, starting at time 0.
    #[must_use]
    pub fn from_world(context: MatchContext, world: WorldState, notifier: N) -> Self {
        let rng = SmallRng::seed_from_u64(context.seed);
        Self::assemble(context, world, rng, notifier)
    }

    fn assemble(context: MatchContext, world: WorldState, rng: SmallRng, notifier: N) -> Self {
        let catalog = AbilityCatalog::from_config(&context.config.abilities);
        let mut sim = Self {
            context,
            world,
            zones: ZoneScheduler::new(),
            catalog,
            controllers: BTreeMap::new(),
            rng,
            notifier,
            now: 0.0,
            round_started_at: 0.0,
            last_pickup_at: 0.0,
            round_over: false,
            ticks: 0,
        };
        sim.sync_controllers();
        sim
    }

    /// Reset round state and rebuild the world, starting the clock at `time`.
    ///
    /// # Errors
    ///
    /// Returns an error if the world can't be built from the config.
    pub fn start_round(&mut self, time: f64) -> Result<(), SetupError> {
        self.world = setup::build_world(&self.context.config, &mut self.rng)?;
        self.zones.clear();
        self.controllers.clear();
        self.now = time;
        self.round_started_at = time;
        self.last_pickup_at = time;
        self.round_over = false;
        self.ticks = 0;
        self.sync_controllers();
        info!(seed = self.context.seed, time, "round started");
        Ok(())
    }

    /// Advance the simulation to `time`, `delta` milliseconds after the previous update.
    pub fn update(&mut self, time: f64, delta: f64) {
        if self.round_over {
            return;
        }
        self.now = time;
        self.sync_controllers();

        let mut frame = Frame {
            world: &mut self.world,
            config: &self.context.config,
            rng: &mut self.rng,
            notifier: &mut self.notifier,
            now: time,
            delta,
            round_started_at: self.round_started_at,
        };

        for controller in self.controllers.values_mut() {
            controller.tick(&mut frame, &mut self.zones, &self.catalog);
        }
        self.zones.tick(&mut frame);
        expiry::run(&mut frame);
        motion::integrate(&mut frame);
        possession::step(&mut frame);
        pickup::collect(&mut frame, &self.catalog);
        pickup::maybe_spawn(&mut frame, &mut self.last_pickup_at);

        self.ticks += 1;
        if time - self.round_started_at >= self.context.config.round.duration_ms {
            self.round_over = true;
            let scores: Vec<u32> = self.world.teams().map(|t| t.score).collect();
            info!(winner = ?self.winner(), ?scores, ticks = self.ticks, "round over");
        }
    }

    /// Request an ability activation (human input or scripted).
    pub fn activate_ability(&mut self, agent: AgentId, ability_id: AbilityId) -> Activation {
        let mut frame = Frame {
            world: &mut self.world,
            config: &self.context.config,
            rng: &mut self.rng,
            notifier: &mut self.notifier,
            now: self.now,
            delta: 0.0,
            round_started_at: self.round_started_at,
        };
        ability::activate(&mut frame, &mut self.zones, &self.catalog, agent, ability_id)
    }

    /// Steer a human agent in `direction`. Autonomous, frozen and vanished
    /// agents ignore it.
    pub fn steer(&mut self, agent: AgentId, direction: Vec2) {
        let speed = self.context.config.agents.speed;
        let Some(agent) = self.world.agent_mut(agent) else {
            return;
        };
        if agent.is_autonomous || agent.is_frozen() || agent.is_vanished() {
            return;
        }
        agent.velocity = direction.normalize_or_zero() * speed;
    }

    /// Create controllers for new autonomous agents and drop those whose agent left.
    fn sync_controllers(&mut self) {
        self.controllers
            .retain(|id, _| self.world.agent(*id).is_some_and(|a| a.is_autonomous));
        let seed = self.context.seed;
        let config = &self.context.config.agents;
        for agent in self.world.agents().filter(|a| a.is_autonomous) {
            self.controllers
                .entry(agent.id)
                .or_insert_with(|| AgentController::with_random_profile(agent.id, config, controller_seed(seed, agent.id)));
        }
    }

    /// The world.
    #[must_use]
    pub const fn world(&self) -> &WorldState {
        &self.world
    }

    /// The world, for scripted setups.
    pub fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    /// Live zones.
    #[must_use]
    pub const fn zones(&self) -> &ZoneScheduler {
        &self.zones
    }

    /// Enabled abilities.
    #[must_use]
    pub const fn catalog(&self) -> &AbilityCatalog {
        &self.catalog
    }

    /// Controller of an autonomous agent.
    #[must_use]
    pub fn controller(&self, agent: AgentId) -> Option<&AgentController> {
        self.controllers.get(&agent)
    }

    /// The feedback sink.
    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Match config.
    #[must_use]
    pub const fn config(&self) -> &ArenaConfig {
        &self.context.config
    }

    /// Match seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.context.seed
    }

    /// Timestamp of the last update.
    #[must_use]
    pub const fn now(&self) -> f64 {
        self.now
    }

    /// Updates run this round.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether the round duration has elapsed.
    #[must_use]
    pub const fn is_round_over(&self) -> bool {
        self.round_over
    }

    /// Team with the strictly highest score, or `None` on a tie.
    #[must_use]
    pub fn winner(&self) -> Option<TeamId> {
        let best = self.world.teams().map(|t| t.score).max()?;
        let mut leaders = self.world.teams().filter(|t| t.score == best);
        let first = leaders.next()?;
        if leaders.next().is_some() {
            None
        } else {
            Some(first.id)
        }
    }
}
