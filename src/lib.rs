// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod options;
pub mod report;
pub mod types;
pub mod watch;

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{load_and_validate, ConfigFile, Overrides};
use crate::engine::WatchCoordinator;
use crate::exec::{CommandRunner, SystemCommandRunner};
use crate::options::{NativeDaemonProbe, OptionsResolver, WatchOptions};
use crate::report::{TerminalOutput, TracingAnalytics};
use crate::watch::{FsWatcher, FsWatcherSettings};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (+ CLI overrides)
/// - watch options resolution (strategy + native daemon probe)
/// - the notify-backed watcher and the build command
/// - terminal output and analytics sinks
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let overrides = Overrides {
        watcher: args.watcher.clone(),
        build: args.build.clone(),
        root: args.root.clone(),
    };
    let cfg = load_and_validate(args.config.as_deref().map(Path::new), &overrides)?;

    let probe = NativeDaemonProbe::new(SystemCommandRunner, cfg.native_daemon.clone());
    let resolver = OptionsResolver::new(cfg.watch.clone(), args.verbose, probe);

    if args.dry_run {
        let options = resolver.build_options().await;
        print_dry_run(&cfg, &resolver, &options);
        return Ok(());
    }

    let watcher = FsWatcher::new(FsWatcherSettings::from(&cfg));
    let mut coordinator =
        WatchCoordinator::new(watcher, resolver, TerminalOutput, TracingAnalytics);

    coordinator.start().await?;
    coordinator.run_until(shutdown_signal()).await?;

    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed we keep running
/// until the watcher goes away on its own.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

fn print_dry_run<R: CommandRunner>(
    cfg: &ConfigFile,
    resolver: &OptionsResolver<R>,
    options: &WatchOptions,
) {
    println!("buildwatch dry-run");
    println!("  root = {}", cfg.root.display());
    println!("  build.cmd = {}", cfg.build.cmd);
    println!("  build.on_start = {}", cfg.build.on_start);
    if !cfg.exclude.is_empty() {
        println!("  exclude = {:?}", cfg.exclude);
    }
    println!("  debounce = {:?}", cfg.debounce);
    println!();

    println!("watch options:");
    println!("  polling = {}", options.use_polling());
    if options.use_polling() {
        println!("  poll_interval = {:?}", cfg.poll_interval);
    } else {
        println!("  native_daemon.probe = {}", resolver.probe().command());
    }
    println!("  native_daemon = {}", options.use_native_daemon());
    println!("  verbose = {}", options.verbose());

    debug!("dry-run complete (no watching)");
}
