//! Log output setup.
//!
//! The terminal belongs to the interface while the game runs, so log records go to a file instead
//! of standard error.

use std::{fs::OpenOptions, path::Path};

use color_eyre::eyre::Result;
use env_logger::{Builder, Env, Target};

/// Environment variable holding the log filter, in `env_logger` syntax.
pub const LOG_ENV: &str = "SOKOTUINE_LOG";
/// Filter used when [`LOG_ENV`] is unset.
const DEFAULT_FILTER: &str = "info";

/// Installs the global logger, appending to the file at `path`.
///
/// # Errors
///
/// This function returns an error if the log file cannot be opened or a logger is already
/// installed.
pub fn init(path: &Path) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    Builder::from_env(Env::default().filter_or(LOG_ENV, DEFAULT_FILTER))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()?;
    log::info!("logging to {}", path.display());

    Ok(())
}
