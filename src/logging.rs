// src/logging.rs

//! Diagnostic logging via `tracing`.
//!
//! The filter comes from, in order: `--log-level`, then [`LOG_ENV`], then
//! `info`. [`LOG_ENV`] takes either a bare level (`debug`, `warning`) or
//! `tracing-subscriber` directives (`buildwatch=debug,notify=warn`).
//!
//! Everything is written to stderr; stdout carries build reports only.

use std::io;

use anyhow::{anyhow, Result};
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "BUILDWATCH_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli_level, env_value.as_deref()))
        .with_target(true)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow!("installing log subscriber: {err}"))
}

/// Filter for the given flag and raw [`LOG_ENV`] value.
///
/// Unparseable values fall back to `info` rather than failing startup.
pub fn log_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> EnvFilter {
    let level = match (cli_level, env_value.map(str::trim)) {
        (Some(level), _) => Level::from(level),
        (None, Some(value)) if value.contains('=') => match EnvFilter::try_new(value) {
            Ok(filter) => return filter,
            Err(_) => Level::INFO,
        },
        (None, Some(value)) => parse_level(value).unwrap_or(Level::INFO),
        (None, None) => Level::INFO,
    };
    EnvFilter::default().add_directive(LevelFilter::from_level(level).into())
}

fn parse_level(value: &str) -> Option<Level> {
    match value.to_ascii_lowercase().as_str() {
        "warning" => Some(Level::WARN),
        other => other.parse().ok(),
    }
}
