// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::errors::Result;
use crate::exec::ProbeCommand;

pub const DEFAULT_DEBOUNCE_MS: u64 = 100;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [watch]
/// watcher = "polling"
/// exclude = ["target/**"]
///
/// [build]
/// cmd = "make"
///
/// [native_daemon]
/// program = "watchman"
/// args = ["version"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// `[watch]`. Kept as an `Option` so strategy selection can tell an
    /// absent section apart from one that is present but empty.
    #[serde(default)]
    pub watch: Option<WatchSection>,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub native_daemon: NativeDaemonSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct WatchSection {
    /// `"polling"` selects the polling strategy. `"events"` or any other
    /// string means OS notifications.
    #[serde(default)]
    pub watcher: Option<String>,

    /// Directory to watch, relative to the config file's directory.
    #[serde(default)]
    pub root: Option<String>,

    /// Glob patterns (relative to `root`) whose changes never trigger a rebuild.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Quiet period used to coalesce a burst of changes into one rebuild.
    #[serde(default)]
    pub debounce_ms: Option<u64>,

    /// Scan interval for the polling strategy.
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// Shell command that rebuilds the project.
    #[serde(default)]
    pub cmd: Option<String>,

    /// Run one build as soon as watching starts.
    #[serde(default = "default_on_start")]
    pub on_start: bool,
}

fn default_on_start() -> bool {
    true
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            cmd: None,
            on_start: default_on_start(),
        }
    }
}

/// `[native_daemon]` section: how to check whether the daemon is usable.
#[derive(Debug, Clone, Deserialize)]
pub struct NativeDaemonSection {
    #[serde(default = "default_daemon_program")]
    pub program: String,

    #[serde(default = "default_daemon_args")]
    pub args: Vec<String>,
}

fn default_daemon_program() -> String {
    "watchman".to_string()
}

fn default_daemon_args() -> Vec<String> {
    vec!["version".to_string()]
}

impl Default for NativeDaemonSection {
    fn default() -> Self {
        Self {
            program: default_daemon_program(),
            args: default_daemon_args(),
        }
    }
}

/// Values supplied on the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub watcher: Option<String>,
    pub build: Option<String>,
    pub root: Option<String>,
}

impl RawConfigFile {
    /// Layer CLI overrides on top of the file contents.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(ref watcher) = overrides.watcher {
            self.watch.get_or_insert_with(WatchSection::default).watcher = Some(watcher.clone());
        }
        if let Some(ref root) = overrides.root {
            self.watch.get_or_insert_with(WatchSection::default).root = Some(root.clone());
        }
        if let Some(ref cmd) = overrides.build {
            self.build.cmd = Some(cmd.clone());
        }
    }
}

/// Build settings after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    pub cmd: String,
    pub on_start: bool,
}

/// Validated configuration used by the rest of the application.
///
/// Construct via [`ConfigFile::resolve`] (or the loader), which guarantees a
/// build command is present and that every duration and glob is usable.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// The `[watch]` section exactly as given; input to strategy selection.
    pub watch: Option<WatchSection>,
    pub root: PathBuf,
    pub exclude: Vec<String>,
    pub debounce: Duration,
    pub poll_interval: Duration,
    pub build: BuildSettings,
    pub native_daemon: ProbeCommand,
}

impl ConfigFile {
    /// Validate `raw` and resolve relative paths against `base_dir`.
    pub fn resolve(raw: RawConfigFile, base_dir: &Path) -> Result<Self> {
        crate::config::validate::validate_config(&raw)?;

        let section = raw.watch.clone().unwrap_or_default();

        let root = match section.root {
            Some(ref r) => base_dir.join(r),
            None => base_dir.to_path_buf(),
        };

        // validate_config guarantees the command is present and non-empty.
        let cmd = raw.build.cmd.clone().unwrap_or_default();

        Ok(Self {
            watch: raw.watch,
            root,
            exclude: section.exclude,
            debounce: Duration::from_millis(section.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS)),
            poll_interval: Duration::from_millis(
                section.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS),
            ),
            build: BuildSettings {
                cmd,
                on_start: raw.build.on_start,
            },
            native_daemon: ProbeCommand::new(raw.native_daemon.program, raw.native_daemon.args),
        })
    }
}
