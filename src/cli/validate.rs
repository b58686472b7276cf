//! Config validation command implementation.

use super::CliError;
use spirit_arena::ArenaConfig;
use spirit_arena::game::build_world;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::path::Path;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the file can't be read, parsed, or describes an
/// arena that can't be set up.
pub(crate) fn execute(path: &Path) -> Result<(), CliError> {
    println!("Validating: {}", path.display());
    println!();

    let config = match ArenaConfig::from_file(path) {
        Ok(config) => config,
        Err(e) => {
            print_check("TOML parse", false);
            return Err(e.into());
        }
    };
    print_check("TOML parse", true);

    if let Err(e) = config.validate() {
        print_check("Value ranges", false);
        return Err(e.into());
    }
    print_check("Value ranges", true);

    let mut rng = SmallRng::seed_from_u64(0);
    match build_world(&config, &mut rng) {
        Ok(world) => {
            print_check("World setup", true);
            println!();
            println!("Summary:");
            println!("  Teams:        {}", world.teams().count());
            println!("  Agents:       {}", world.agents().count());
            println!("  Spirits:      {}", world.spirits().count());
            println!("  Round length: {:.0}s", config.round.duration_ms / 1000.0);
            Ok(())
        }
        Err(e) => {
            print_check("World setup", false);
            Err(CliError::new(e.to_string()))
        }
    }
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAIL" };
    println!("  {name:.<20} {status}");
}
