// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `buildwatch`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "buildwatch",
    version,
    about = "Watch a project, rebuild on change and report the outcome.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If omitted, `Buildwatch.toml` in the current directory is used when it
    /// exists; otherwise built-in defaults apply.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Change detection strategy: "polling" or "events".
    ///
    /// Overrides `watch.watcher` from the config file. Unknown values fall
    /// back to events.
    #[arg(long, value_name = "STRATEGY")]
    pub watcher: Option<String>,

    /// Shell command that rebuilds the project.
    ///
    /// Overrides `build.cmd` from the config file.
    #[arg(long, value_name = "CMD")]
    pub build: Option<String>,

    /// Directory to watch. Overrides `watch.root`.
    #[arg(long, value_name = "DIR")]
    pub root: Option<String>,

    /// Log each detected change and pass verbosity on to the watcher.
    #[arg(long, short)]
    pub verbose: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BUILDWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve config and watch options, print them, and exit.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
