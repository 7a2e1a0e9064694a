//! File logging.  The terminal belongs to the game, so log records go to a
//! file instead of stderr.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{GameError, Result};

/// Level used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Install a global subscriber appending to `log_file`.
pub fn init(log_file: &Path) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|err| GameError::Logging(err.to_string()))
}
