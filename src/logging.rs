// File logging via tracing. The TUI owns the terminal, so logs never go to stdout.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::Level;

use crate::config::LoggingConfig;

/// Level names as tracing spells them, case-insensitive
pub fn parse_level(level: &str) -> Result<Level> {
    level
        .trim()
        .parse::<Level>()
        .with_context(|| format!("Invalid log level '{}'", level))
}

/// Install the global subscriber. Returns `Ok(false)` when logging is disabled.
pub fn init(config: &LoggingConfig) -> Result<bool> {
    if !config.enabled && !cfg!(feature = "dev-logging") {
        return Ok(false);
    }

    let level = if cfg!(feature = "dev-logging") {
        Level::DEBUG
    } else {
        parse_level(&config.level)?
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .with_context(|| format!("Failed to open log file: {}", config.file.display()))?;

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging started");
    Ok(true)
}
