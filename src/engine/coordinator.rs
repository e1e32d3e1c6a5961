// src/engine/coordinator.rs

use std::fmt;
use std::future::Future;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::{BuildwatchError, Result};
use crate::exec::CommandRunner;
use crate::options::{OptionsResolver, WatchOptions};
use crate::report::{AnalyticsSink, OutputSink};
use crate::types::WatcherEvent;
use crate::watch::ExternalWatcher;

use super::core::{Emission, ReportCore, ReportState};
use super::CoordinatorState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Active,
    Stopped,
}

enum Wakeup {
    Event(WatcherEvent),
    ChannelClosed,
    Shutdown,
}

/// Owns a watch session: resolves options, starts the external watcher and
/// turns every event it delivers into terminal output and analytics.
///
/// All collaborators are injected. Events are consumed one at a time from the
/// watcher's channel, so handlers never overlap.
pub struct WatchCoordinator<W, R, O, A> {
    watcher: W,
    resolver: OptionsResolver<R>,
    output: O,
    analytics: A,
    core: ReportCore,
    phase: Phase,
    events: Option<mpsc::Receiver<WatcherEvent>>,
    options: Option<WatchOptions>,
}

impl<W, R, O, A> fmt::Debug for WatchCoordinator<W, R, O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchCoordinator")
            .field("core", &self.core)
            .field("phase", &self.phase)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<W, R, O, A> WatchCoordinator<W, R, O, A>
where
    W: ExternalWatcher,
    R: CommandRunner,
    O: OutputSink,
    A: AnalyticsSink,
{
    pub fn new(watcher: W, resolver: OptionsResolver<R>, output: O, analytics: A) -> Self {
        Self {
            watcher,
            resolver,
            output,
            analytics,
            core: ReportCore::new(),
            phase: Phase::Idle,
            events: None,
            options: None,
        }
    }

    pub fn state(&self) -> CoordinatorState {
        match self.phase {
            Phase::Idle => CoordinatorState::Idle,
            Phase::Stopped => CoordinatorState::Stopped,
            Phase::Active if self.core.state().had_error_since_last_success => {
                CoordinatorState::WatchingWithError
            }
            Phase::Active => CoordinatorState::Watching,
        }
    }

    pub fn report_state(&self) -> ReportState {
        self.core.state()
    }

    /// Options the watcher was started with, once `start()` succeeded.
    pub fn options(&self) -> Option<WatchOptions> {
        self.options
    }

    /// `Idle -> Watching`.
    ///
    /// Resolves the watch options (the only suspension point), then starts
    /// the external watcher. A watcher that fails to start is fatal for the
    /// session: the error is returned and the coordinator stays `Idle`.
    pub async fn start(&mut self) -> Result<WatchOptions> {
        if self.phase != Phase::Idle {
            return Err(BuildwatchError::StartupError(format!(
                "coordinator cannot start from state {:?}",
                self.state()
            )));
        }

        let options = self.resolver.build_options().await;
        info!(
            polling = options.use_polling(),
            native_daemon = options.use_native_daemon(),
            verbose = options.verbose(),
            "resolved watch options"
        );

        let events = self.watcher.start(options)?;

        self.events = Some(events);
        self.options = Some(options);
        self.phase = Phase::Active;

        info!("watching for changes");
        Ok(options)
    }

    /// Process a single event. Returns `false` when it was ignored because
    /// the coordinator is not watching.
    pub fn handle_event(&mut self, event: WatcherEvent) -> bool {
        if self.phase != Phase::Active {
            debug!(?event, phase = ?self.phase, "ignoring watcher event");
            return false;
        }

        for emission in self.core.step(&event) {
            self.emit(emission);
        }
        true
    }

    /// Consume events until the watcher closes its channel or `shutdown`
    /// resolves, then stop. Returns immediately if not started.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let wakeup = {
                let Some(events) = self.events.as_mut() else {
                    break;
                };
                tokio::select! {
                    _ = &mut shutdown => Wakeup::Shutdown,
                    maybe = events.recv() => match maybe {
                        Some(event) => Wakeup::Event(event),
                        None => Wakeup::ChannelClosed,
                    },
                }
            };

            match wakeup {
                Wakeup::Event(event) => {
                    self.handle_event(event);
                }
                Wakeup::ChannelClosed => {
                    warn!("watcher event channel closed; stopping");
                    break;
                }
                Wakeup::Shutdown => {
                    info!("shutdown requested");
                    break;
                }
            }
        }

        self.stop();
        Ok(())
    }

    /// `Watching | WatchingWithError -> Stopped`. Idempotent; a no-op when
    /// the coordinator never started.
    pub fn stop(&mut self) {
        match self.phase {
            Phase::Idle => debug!("stop requested before start; nothing to do"),
            Phase::Stopped => debug!("already stopped"),
            Phase::Active => {
                self.watcher.stop();
                // Dropping the receiver discards anything still queued.
                self.events = None;
                self.phase = Phase::Stopped;
                info!("stopped watching");
            }
        }
    }

    fn emit(&mut self, emission: Emission) {
        match emission {
            Emission::Output(line) => self.output.write_line(&line),
            Emission::Track(event) => self.analytics.track(event),
            Emission::TrackTiming(event) => self.analytics.track_timing(event),
            Emission::TrackError(event) => self.analytics.track_error(event),
        }
    }
}
