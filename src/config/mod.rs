// src/config/mod.rs

//! Configuration loading and validation for buildwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and layer CLI overrides (`loader.rs`).
//! - Validate what serde cannot (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    BuildSection, BuildSettings, ConfigFile, NativeDaemonSection, Overrides, RawConfigFile,
    WatchSection,
};
pub use validate::validate_config;
