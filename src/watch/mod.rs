// src/watch/mod.rs

//! The external watcher: detects changes, rebuilds, and reports the outcome
//! as a stream of [`WatcherEvent`]s.
//!
//! The coordinator only knows the [`ExternalWatcher`] trait. [`FsWatcher`] is
//! the production implementation on top of `notify`; tests script events
//! through their own implementation.

pub mod diagnostic;
pub mod filter;
pub mod fs_watcher;

use tokio::sync::mpsc;

use crate::errors::Result;
use crate::options::WatchOptions;
use crate::types::WatcherEvent;

pub use diagnostic::{error_from_output, event_from_outcome, find_location};
pub use filter::ChangeFilter;
pub use fs_watcher::{FsWatcher, FsWatcherSettings};

/// Something that can watch a project and report rebuild outcomes.
pub trait ExternalWatcher: Send {
    /// Start watching with `options`.
    ///
    /// The returned receiver is the single-consumer queue of outcomes, in
    /// delivery order. An error here means the watcher could not be
    /// constructed at all.
    fn start(&mut self, options: WatchOptions) -> Result<mpsc::Receiver<WatcherEvent>>;

    /// Stop producing events. Called at most once per successful `start`.
    fn stop(&mut self);
}
