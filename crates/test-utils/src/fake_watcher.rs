use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use buildwatch::errors::{BuildwatchError, Result};
use buildwatch::options::WatchOptions;
use buildwatch::types::WatcherEvent;
use buildwatch::watch::ExternalWatcher;

#[derive(Debug, Default)]
struct ScriptState {
    sender: Option<mpsc::Sender<WatcherEvent>>,
    started_with: Vec<WatchOptions>,
    stop_calls: usize,
}

/// An external watcher whose events are pushed by the test through a
/// [`ScriptedWatcherHandle`].
#[derive(Debug)]
pub struct ScriptedWatcher {
    state: Arc<Mutex<ScriptState>>,
    fail_start: bool,
}

/// Test-side view of a [`ScriptedWatcher`] that was moved into a coordinator.
#[derive(Debug, Clone)]
pub struct ScriptedWatcherHandle {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedWatcher {
    pub fn new() -> (Self, ScriptedWatcherHandle) {
        Self::build(false)
    }

    /// A watcher whose `start` always fails.
    pub fn failing() -> (Self, ScriptedWatcherHandle) {
        Self::build(true)
    }

    fn build(fail_start: bool) -> (Self, ScriptedWatcherHandle) {
        let state = Arc::new(Mutex::new(ScriptState::default()));
        let watcher = Self {
            state: Arc::clone(&state),
            fail_start,
        };
        (watcher, ScriptedWatcherHandle { state })
    }
}

impl ExternalWatcher for ScriptedWatcher {
    fn start(&mut self, options: WatchOptions) -> Result<mpsc::Receiver<WatcherEvent>> {
        let mut state = self.state.lock().unwrap();
        state.started_with.push(options);

        if self.fail_start {
            return Err(BuildwatchError::StartupError(
                "scripted watcher refused to start".to_string(),
            ));
        }

        let (tx, rx) = mpsc::channel(16);
        state.sender = Some(tx);
        Ok(rx)
    }

    fn stop(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.stop_calls += 1;
        state.sender = None;
    }
}

impl ScriptedWatcherHandle {
    /// Deliver `event` to whoever holds the receiver.
    ///
    /// Returns `false` if the watcher is not running or the receiver is gone.
    pub async fn emit(&self, event: WatcherEvent) -> bool {
        let sender = self.state.lock().unwrap().sender.clone();
        match sender {
            Some(tx) => tx.send(event).await.is_ok(),
            None => false,
        }
    }

    /// Drop the sending side, closing the event channel.
    pub fn close(&self) {
        self.state.lock().unwrap().sender = None;
    }

    pub fn started_with(&self) -> Vec<WatchOptions> {
        self.state.lock().unwrap().started_with.clone()
    }

    pub fn stop_calls(&self) -> usize {
        self.state.lock().unwrap().stop_calls
    }
}
