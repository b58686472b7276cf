//! Run command implementation.

use super::output::format_text;
use super::{CliError, OutputFormat, clock_seed, load_config};
use spirit_arena::runner::{DEFAULT_TICK_MS, run_match};
use std::path::Path;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the config can't be loaded or the match fails to run.
pub(crate) fn execute(
    seed: Option<u64>,
    config: Option<&Path>,
    duration: Option<f64>,
    tick: Option<f64>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let mut config = load_config(config)?;
    if let Some(seconds) = duration {
        config.round.duration_ms = seconds * 1000.0;
    }
    let seed = seed.unwrap_or_else(clock_seed);

    if format == OutputFormat::Text {
        println!("Running match with seed {seed}...");
        println!(
            "Teams: {}",
            config
                .round
                .team_elements
                .iter()
                .map(|e| e.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!();
    }

    let result = run_match(seed, &config, tick.unwrap_or(DEFAULT_TICK_MS))?;

    match format {
        OutputFormat::Text => print!("{}", format_text(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}
