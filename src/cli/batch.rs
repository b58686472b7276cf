//! Batch command implementation.

use super::output::{JsonBatchResult, format_batch_csv, format_batch_text};
use super::{BatchFormat, CliError, clock_seed, load_config};
use indicatif::{ProgressBar, ProgressStyle};
use spirit_arena::runner::{DEFAULT_TICK_MS, run_batch};
use std::path::Path;
use std::time::Instant;

/// Execute the batch command.
///
/// # Errors
///
/// Returns an error if the config can't be loaded or any match fails.
#[allow(clippy::too_many_arguments, clippy::cast_precision_loss)]
pub(crate) fn execute(
    matches: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    config: Option<&Path>,
    duration: Option<f64>,
    tick: Option<f64>,
    format: BatchFormat,
    progress: bool,
) -> Result<(), CliError> {
    let mut config = load_config(config)?;
    if let Some(seconds) = duration {
        config.round.duration_ms = seconds * 1000.0;
    }

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = seed.unwrap_or_else(clock_seed);

    let pb = if progress {
        let pb = ProgressBar::new(matches);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} matches ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let stats = run_batch(
        matches,
        base_seed,
        &config,
        tick.unwrap_or(DEFAULT_TICK_MS),
        || {
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        },
    )?;

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let matches_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.matches_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        BatchFormat::Text => {
            println!();
            print!("{}", format_batch_text(&stats));
            println!();
            println!(
                "Duration: {:.2}s ({matches_per_sec:.1} matches/sec), base seed {base_seed}",
                duration.as_secs_f64()
            );
        }
        BatchFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonBatchResult::from_stats(&stats))?;
            println!("{json}");
        }
        BatchFormat::Csv => print!("{}", format_batch_csv(&stats)),
    }

    Ok(())
}
