//! Simulation core for the spirit arena.
//!
//! Three coupled subsystems share one [`WorldState`]:
//! - Agent controllers deciding what autonomous agents do
//! - Ability resolution with the zone effect scheduler
//! - Possession chains deciding who carries which spirit
//!
//! [`Simulation`] owns them all and runs the fixed tick order.

mod ability;
mod agent;
mod controller;
mod element;
mod expiry;
mod frame;
mod geometry;
mod invariants;
mod motion;
mod notify;
mod obstacle;
mod pickup;
mod possession;
mod setup;
mod simulation;
mod spirit;
mod team;
mod timeline;
mod world;
mod zone;

pub use ability::{
    AbilityCatalog, AbilityDescriptor, Activation, AllyPolarity, BlockReason, DESCRIPTORS,
    descriptor,
};
pub use agent::{Agent, AgentId, Buff, Knockback, Status, TeamId, TeamSwap};
pub use controller::{AgentController, BotProfile, BotState, BotTarget, controller_seed};
pub use element::{AbilityId, Element};
pub use geometry::{Bounds, Vec2, millis_to_secs};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use notify::{Color, Notification, NotificationLog, Notifier, TracingNotifier};
pub use obstacle::{Obstacle, ObstacleId};
pub use pickup::{AbilityPickup, PickupId, grantable};
pub use possession::{PossessionChain, deposit, steal};
pub use setup::build_world;
pub use simulation::{MatchContext, Simulation};
pub use spirit::{InFlight, Spirit, SpiritId, SpiritLedger};
pub use team::{MAX_TEAMS, Team, TeamBase};
pub use timeline::{TimedEvent, Timeline};
pub use world::WorldState;
pub use zone::{ZoneDuration, ZoneEffect, ZoneId, ZoneKind, ZoneOrigin, ZoneScheduler, is_eligible};
