// src/watch/fs_watcher.rs

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use notify::{Config, Event, EventKind, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{BuildSettings, ConfigFile};
use crate::errors::{BuildwatchError, Result};
use crate::exec::run_build;
use crate::options::WatchOptions;
use crate::types::WatcherEvent;

use super::diagnostic::event_from_outcome;
use super::filter::ChangeFilter;
use super::ExternalWatcher;

/// Capacity of the outcome channel handed to the coordinator.
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct FsWatcherSettings {
    pub root: PathBuf,
    pub exclude: Vec<String>,
    pub debounce: Duration,
    pub poll_interval: Duration,
    pub build: BuildSettings,
}

impl From<&ConfigFile> for FsWatcherSettings {
    fn from(cfg: &ConfigFile) -> Self {
        Self {
            root: cfg.root.clone(),
            exclude: cfg.exclude.clone(),
            debounce: cfg.debounce,
            poll_interval: cfg.poll_interval,
            build: cfg.build.clone(),
        }
    }
}

struct Running {
    // Kept alive for as long as we watch; dropping it stops notify.
    _inner: Box<dyn Watcher + Send>,
    rebuild_task: JoinHandle<()>,
}

/// Watches `root` with `notify` and runs the build command on every
/// (debounced) burst of relevant changes.
pub struct FsWatcher {
    settings: FsWatcherSettings,
    running: Option<Running>,
}

impl fmt::Debug for FsWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsWatcher")
            .field("settings", &self.settings)
            .field("running", &self.running.is_some())
            .finish()
    }
}

impl FsWatcher {
    pub fn new(settings: FsWatcherSettings) -> Self {
        Self {
            settings,
            running: None,
        }
    }
}

impl ExternalWatcher for FsWatcher {
    fn start(&mut self, options: WatchOptions) -> Result<mpsc::Receiver<WatcherEvent>> {
        if self.running.is_some() {
            return Err(BuildwatchError::StartupError(
                "file watcher already running".to_string(),
            ));
        }

        let root = self.settings.root.clone();
        if !root.is_dir() {
            return Err(BuildwatchError::StartupError(format!(
                "watch root is not a directory: {}",
                root.display()
            )));
        }
        let root = root.canonicalize().unwrap_or(root);

        let filter = ChangeFilter::new(&self.settings.exclude)?;

        // Channel from the blocking notify callback into the async world.
        let (fs_tx, fs_rx) = mpsc::unbounded_channel::<Event>();
        let forward = move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = fs_tx.send(event) {
                    warn!("failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                warn!("file watch error: {err}");
            }
        };

        let mut watcher: Box<dyn Watcher + Send> = if options.use_polling() {
            // notify keeps mtimes at one-second resolution; hashing contents
            // catches edits that land within the same second.
            let config = Config::default()
                .with_poll_interval(self.settings.poll_interval)
                .with_compare_contents(true);
            Box::new(PollWatcher::new(forward, config)?)
        } else {
            if options.use_native_daemon() {
                info!("native watch daemon detected; change detection stays on OS notifications");
            }
            Box::new(RecommendedWatcher::new(forward, Config::default())?)
        };

        watcher.watch(&root, RecursiveMode::Recursive)?;

        info!(
            root = ?root,
            polling = options.use_polling(),
            "file watcher started"
        );

        let (tx, rx) = mpsc::channel::<WatcherEvent>(EVENT_CHANNEL_CAPACITY);

        let rebuild_task = tokio::spawn(rebuild_loop(RebuildLoop {
            root,
            filter,
            fs_rx,
            tx,
            build: self.settings.build.clone(),
            debounce: self.settings.debounce,
            verbose: options.verbose(),
        }));

        self.running = Some(Running {
            _inner: watcher,
            rebuild_task,
        });

        Ok(rx)
    }

    fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            running.rebuild_task.abort();
            debug!("file watcher stopped");
        }
    }
}

impl Drop for FsWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

struct RebuildLoop {
    root: PathBuf,
    filter: ChangeFilter,
    fs_rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::Sender<WatcherEvent>,
    build: BuildSettings,
    debounce: Duration,
    verbose: bool,
}

/// Debounce notify events, rebuild, and forward the outcome.
///
/// Exits when either side of the pipeline goes away.
async fn rebuild_loop(mut state: RebuildLoop) {
    if state.build.on_start && !build_and_report(&state.build.cmd, &state.tx).await {
        return;
    }

    while let Some(first) = state.fs_rx.recv().await {
        let mut changed = BTreeSet::new();
        collect_relevant(&state, &first, &mut changed);

        // Coalesce everything that arrives within the debounce window.
        let mut closed = false;
        loop {
            let next = tokio::time::timeout(state.debounce, state.fs_rx.recv()).await;
            match next {
                Ok(Some(event)) => collect_relevant(&state, &event, &mut changed),
                Ok(None) => {
                    closed = true;
                    break;
                }
                Err(_elapsed) => break,
            }
        }

        if !changed.is_empty() {
            if state.verbose {
                for path in &changed {
                    info!(path = %path, "file changed");
                }
            } else {
                debug!(count = changed.len(), "files changed");
            }

            if !build_and_report(&state.build.cmd, &state.tx).await {
                return;
            }
        }

        if closed {
            break;
        }
    }

    debug!("rebuild loop finished");
}

fn collect_relevant(state: &RebuildLoop, event: &Event, out: &mut BTreeSet<String>) {
    if matches!(event.kind, EventKind::Access(_)) {
        return;
    }
    for path in &event.paths {
        if let Some(rel) = state.filter.relevant(&state.root, path) {
            out.insert(rel);
        }
    }
}

/// Returns `false` once the coordinator has dropped its receiver.
async fn build_and_report(cmd: &str, tx: &mpsc::Sender<WatcherEvent>) -> bool {
    let event = event_from_outcome(run_build(cmd).await);
    if let Err(err) = tx.send(event).await {
        warn!("failed to send watcher event: {err}");
        return false;
    }
    true
}
