//! Spirits: the mobile collectible units.
//!
//! A spirit does not know who owns it. Ownership lives in the
//! [`PossessionChain`](crate::game::PossessionChain).

use crate::game::{TeamId, Vec2};

/// Unique identifier for a spirit.
pub type SpiritId = u32;

/// A deposited spirit flying into its base before it leaves the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InFlight {
    /// Team credited on arrival.
    pub team: TeamId,
    /// Base center the spirit flies to.
    pub target: Vec2,
}

/// A collectible unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spirit {
    /// Unique identifier.
    pub id: SpiritId,
    /// Position in world units.
    pub position: Vec2,
    /// Passive drift velocity while free.
    pub drift: Vec2,
    /// Set while the spirit is being deposited.
    pub in_flight: Option<InFlight>,
    /// Removal timestamp for temporary spirits.
    pub expires_at: Option<f64>,
}

impl Spirit {
    /// Create a free spirit.
    #[must_use]
    pub const fn new(id: SpiritId, position: Vec2, drift: Vec2) -> Self {
        Self {
            id,
            position,
            drift,
            in_flight: None,
            expires_at: None,
        }
    }

    /// Temporary spirits are removed at expiry and never respawn.
    #[must_use]
    pub const fn is_temporary(&self) -> bool {
        self.expires_at.is_some()
    }

    /// In-flight spirits can't be collected or converted.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}

/// Running totals used by the conservation invariant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpiritLedger {
    /// Spirits ever spawned, respawns included.
    pub spawned: u32,
    /// Spirits removed without being deposited.
    pub destroyed: u32,
}
