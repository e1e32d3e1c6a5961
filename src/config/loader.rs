// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, Overrides, RawConfigFile};
use crate::errors::{BuildwatchError, Result};

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load, apply CLI overrides and validate.
///
/// - `Some(path)`: the file must exist.
/// - `None`: [`default_config_path`] is used when present; otherwise the
///   built-in defaults apply and the overrides must supply a build command.
///
/// Relative paths inside the config resolve against the directory holding
/// the config file (or the current directory when there is none).
pub fn load_and_validate(path: Option<&Path>, overrides: &Overrides) -> Result<ConfigFile> {
    let (mut raw, base_dir) = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BuildwatchError::ConfigError(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            (load_from_path(p)?, config_dir(p))
        }
        None => {
            let default = default_config_path();
            if default.exists() {
                (load_from_path(&default)?, config_dir(&default))
            } else {
                debug!(path = ?default, "no config file found; using defaults");
                (RawConfigFile::default(), current_dir())
            }
        }
    };

    raw.apply_overrides(overrides);
    ConfigFile::resolve(raw, &base_dir)
}

/// Helper to resolve a default config path.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Buildwatch.toml")
}

/// - If the config path has a non-empty parent (e.g. "configs/Buildwatch.toml"),
///   we use that directory.
/// - If it's just a bare filename, we fall back to the current directory.
fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => current_dir(),
    }
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
