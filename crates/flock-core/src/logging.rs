//! Tracing setup.
//!
//! Logs go to `$FLOCK_HOME/logs/flock.log` so they never interleave with the
//! TUI or with command output. `FLOCK_LOG` overrides the configured filter.

use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, paths};

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "FLOCK_LOG";

const LOG_FILE_NAME: &str = "flock.log";

/// Installs the global subscriber.
///
/// Returns the appender guard; logs are flushed when it is dropped, so the
/// caller keeps it alive for the whole process. Returns `None` when file
/// logging is disabled in config.
///
/// # Errors
/// Returns an error if the log directory cannot be created.
pub fn init(config: &Config) -> Result<Option<WorkerGuard>> {
    if !config.log.file {
        return Ok(None);
    }

    let dir = paths::log_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = build_filter(std::env::var(LOG_ENV).ok().as_deref(), &config.log.level);

    // A subscriber may already be installed (tests, embedding); keep the first one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    Ok(Some(guard))
}

/// Builds the filter: env directive if valid, then config level, then `info`.
fn build_filter(env_directive: Option<&str>, config_level: &str) -> EnvFilter {
    env_directive
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_new(config_level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
