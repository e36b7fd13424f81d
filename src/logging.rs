//! Tracing subscriber setup

use crate::config::LoggingConfig;
use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Builds the filter from `RUST_LOG`, falling back to the configured level.
/// `verbosity` raises the configured level by one step per flag.
pub fn env_filter(config: &LoggingConfig, verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(effective_level(&config.level, verbosity)))
}

fn effective_level(level: &str, verbosity: u8) -> &str {
    const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
    let base = LEVELS.iter().position(|l| *l == level).unwrap_or(2);
    LEVELS[(base + usize::from(verbosity)).min(LEVELS.len() - 1)]
}

/// Installs the global subscriber. Diagnostics go to stderr so stdout stays
/// free for the readings.
pub fn init(config: &LoggingConfig, verbosity: u8) -> Result<()> {
    let filter = env_filter(config, verbosity);

    let installed = if config.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))
}
