// src/config/validate.rs

use globset::Glob;

use crate::config::model::RawConfigFile;
use crate::errors::{BuildwatchError, Result};

/// Check the invariants that deserialization alone cannot express:
///
/// - a non-empty build command,
/// - strictly positive debounce / poll intervals,
/// - exclude globs that compile,
/// - a non-empty native daemon program.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    match cfg.build.cmd.as_deref().map(str::trim) {
        Some(cmd) if !cmd.is_empty() => {}
        _ => {
            return Err(BuildwatchError::ConfigError(
                "no build command: set build.cmd or pass --build".to_string(),
            ));
        }
    }

    if let Some(ref watch) = cfg.watch {
        if watch.debounce_ms == Some(0) {
            return Err(BuildwatchError::ConfigError(
                "watch.debounce_ms must be greater than 0".to_string(),
            ));
        }
        if watch.poll_interval_ms == Some(0) {
            return Err(BuildwatchError::ConfigError(
                "watch.poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        for pattern in &watch.exclude {
            Glob::new(pattern).map_err(|e| {
                BuildwatchError::ConfigError(format!("invalid exclude pattern '{pattern}': {e}"))
            })?;
        }
    }

    if cfg.native_daemon.program.trim().is_empty() {
        return Err(BuildwatchError::ConfigError(
            "native_daemon.program must not be empty".to_string(),
        ));
    }

    Ok(())
}
