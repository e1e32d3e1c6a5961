// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Build failures reported by the watched project are *not* errors here; they
//! travel as [`crate::report::BuildError`] values through the event channel.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("File watcher error: {0}")]
    WatchError(#[from] notify::Error),

    #[error("Watcher failed to start: {0}")]
    StartupError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BuildwatchError>;
