//! Config command implementation.

use super::CliError;
use spirit_arena::ArenaConfig;

/// Print the default configuration as TOML.
///
/// # Errors
///
/// Returns an error if the config can't be rendered.
pub(crate) fn execute() -> Result<(), CliError> {
    print!("{}", ArenaConfig::default().to_toml()?);
    Ok(())
}
