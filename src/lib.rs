// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Spirit Arena: a deterministic real-time arena simulation.
//!
//! Teams of agents roam a bounded world collecting spirits, which follow
//! their owner in a chain and score when delivered to the team base. Agents
//! steal spirits from hostile chains and cast elemental abilities, many of
//! which leave timed zones in the world.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Match Runner (rayon batches)      │
//! ├─────────────────────────────────────┤
//! │   Simulation (fixed tick order)     │
//! ├──────────┬──────────┬───────────────┤
//! │Controller│ Abilities│ Zone Scheduler│
//! ├──────────┴──────────┴───────────────┤
//! │  WorldState + Possession Chain      │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod runner;

pub use config::ArenaConfig;
pub use error::{ConfigError, MatchError, SetupError};

// Re-export key game types at crate root for convenience
pub use game::{
    AbilityId, Activation, AgentId, Element, MatchContext, Simulation, SpiritId, TeamId, Vec2,
    WorldState,
};
pub use runner::{BatchStats, MatchResult, run_match};
