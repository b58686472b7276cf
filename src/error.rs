//! Error types for configuration loading and match setup.
//!
//! The simulation core itself never fails: degenerate cases inside a tick are
//! no-ops. Errors only exist where the crate meets the outside world.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating an [`ArenaConfig`](crate::ArenaConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config from {path:?}: {source}")]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The config text is not valid TOML for the schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The config could not be rendered as TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// A field holds a value the simulation cannot run with.
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Errors raised while building the initial world for a round.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SetupError {
    /// Fewer than two teams configured.
    #[error("too few teams: {0} (minimum 2)")]
    TooFewTeams(usize),
    /// More teams than bases can be placed for.
    #[error("too many teams: {0} (maximum {max})", max = crate::game::MAX_TEAMS)]
    TooManyTeams(usize),
    /// Bases would not fit inside the world bounds.
    #[error("world {width}x{height} too small for base radius {radius}")]
    WorldTooSmall {
        /// World width.
        width: f32,
        /// World height.
        height: f32,
        /// Configured base radius.
        radius: f32,
    },
}

/// Errors raised by the headless match runner.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Configuration rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// World setup failed.
    #[error(transparent)]
    Setup(#[from] SetupError),
    /// Tick length must be positive.
    #[error("tick length must be positive, got {0} ms")]
    InvalidTick(f64),
}
