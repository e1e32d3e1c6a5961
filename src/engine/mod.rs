// src/engine/mod.rs

//! Watch-and-report engine.
//!
//! The pure reporting state machine lives in [`core`]; the async shell that
//! owns the external watcher, the options resolver and the sinks is
//! [`coordinator`].

pub mod coordinator;
pub mod core;

pub use coordinator::WatchCoordinator;
pub use core::{Emission, ReportCore, ReportState};

/// Externally visible lifecycle state of a [`WatchCoordinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    /// Not started yet (or `start()` failed).
    Idle,
    /// Subscribed; the last outcome was a success (or nothing happened yet).
    Watching,
    /// Subscribed; the last outcome was a build error.
    WatchingWithError,
    /// Terminal. Events are ignored.
    Stopped,
}
