//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for the filter:
//! 1. the `directive` argument (if provided)
//! 2. the `POSTROJ_LOG` environment variable (e.g. "info", "postroj=debug")
//! 3. default to `info`
//!
//! Logs go to STDERR so captured command output on STDOUT stays clean.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "POSTROJ_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(directive: Option<&str>) -> Result<()> {
    let filter = resolve_filter(directive, std::env::var(LOG_ENV).ok().as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}

fn resolve_filter(directive: Option<&str>, env: Option<&str>) -> Result<EnvFilter> {
    let chosen = directive
        .or(env)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("info");
    EnvFilter::try_new(chosen).map_err(|e| anyhow!("invalid log filter `{chosen}`: {e}"))
}
