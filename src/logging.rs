//! Tracing subscriber setup

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level; `verbose` raises
/// the configured level to `debug`.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("riskmap={level},warn")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.format.as_str() {
        "json" => builder.json().try_init(),
        _ => builder.pretty().try_init(),
    }
    .map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))
}
