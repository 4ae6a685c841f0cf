//! Command-line driver for the Parley conflict simulation.
//!
//! Reads one turn's batch of submitted actions and a roster of known actors,
//! runs a simulation pass, and prints the detected conflicts to stdout as a
//! JSON array. Logs go to stderr.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `parley-config.yaml` (or `PARLEY_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Read the roster and the batch
//! 4. Run the simulation pass
//! 5. Write the conflicts

mod config;
mod error;

use std::io::Write;
use std::path::Path;

use parley_engine::{ActorRoster, simulate_with_report};
use parley_types::{Actor, SimulationBatch};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingConfig, SimConfig, config_path};
use crate::error::SimError;

fn main() -> Result<(), SimError> {
    // Logging is configured from the file, so the load outcome is logged
    // once the subscriber exists.
    let path = config_path();
    let (config, found) = load_config(&path)?;
    init_tracing(&config.logging);

    if found {
        info!(path = %path.display(), "Configuration loaded");
    } else {
        info!(path = %path.display(), "Config file not found, using defaults");
    }

    let roster = ActorRoster::from_actors(read_json::<Vec<Actor>>(&config.input.roster_path)?);
    info!(
        path = %config.input.roster_path.display(),
        actors = roster.len(),
        "Roster loaded"
    );

    let batch: SimulationBatch = read_json(&config.input.batch_path)?;
    info!(
        path = %config.input.batch_path.display(),
        guild_id = %batch.guild_id,
        entries = batch.actions.len(),
        "Batch loaded"
    );

    let report = simulate_with_report(batch.guild_id, &batch.actions, &roster);

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report.conflicts)?;
    writeln!(stdout)?;

    Ok(())
}

/// Load the config file, falling back to defaults when it does not exist.
///
/// The flag reports whether the file was found.
fn load_config(path: &Path) -> Result<(SimConfig, bool), SimError> {
    if path.exists() {
        Ok((SimConfig::from_file(path)?, true))
    } else {
        let mut config = SimConfig::default();
        config.input.apply_env_overrides();
        Ok((config, false))
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SimError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SimError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| SimError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
