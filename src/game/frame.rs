//! Per-tick context handed to every subsystem.

use rand::rngs::SmallRng;

use crate::config::ArenaConfig;
use crate::game::{Notifier, WorldState};

/// Everything a subsystem may read or write during one update.
pub(crate) struct Frame<'a> {
    pub(crate) world: &'a mut WorldState,
    pub(crate) config: &'a ArenaConfig,
    pub(crate) rng: &'a mut SmallRng,
    pub(crate) notifier: &'a mut dyn Notifier,
    /// Current timestamp in milliseconds.
    pub(crate) now: f64,
    /// Elapsed milliseconds since the previous update.
    pub(crate) delta: f64,
    /// Timestamp the current round started at.
    pub(crate) round_started_at: f64,
}

impl Frame<'_> {
    /// Whether the pre-round grace period is still running.
    pub(crate) fn in_grace_period(&self) -> bool {
        !self.config.round.debug && self.now - self.round_started_at < self.config.round.grace_ms
    }
}
