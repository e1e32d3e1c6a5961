// src/options/mod.rs

//! Decides how the external watcher should detect changes.
//!
//! - [`strategy`]: pure polling-vs-events selection from config.
//! - [`probe`]: asynchronous check for the optional native watch daemon.
//! - [`resolver`]: combines both with the verbosity flag into [`WatchOptions`].

pub mod probe;
pub mod resolver;
pub mod strategy;

pub use probe::NativeDaemonProbe;
pub use resolver::OptionsResolver;
pub use strategy::polling;

/// Immutable options bundle handed to the external watcher.
///
/// Fields are private so the only way to get a value is through the two
/// constructors, which keep polling and the native daemon mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    use_polling: bool,
    verbose: bool,
    use_native_daemon: bool,
}

impl WatchOptions {
    /// Polling strategy. Never uses the native daemon.
    pub fn polling(verbose: bool) -> Self {
        Self {
            use_polling: true,
            verbose,
            use_native_daemon: false,
        }
    }

    /// OS-event strategy, optionally backed by the native daemon.
    pub fn events(verbose: bool, use_native_daemon: bool) -> Self {
        Self {
            use_polling: false,
            verbose,
            use_native_daemon,
        }
    }

    pub fn use_polling(&self) -> bool {
        self.use_polling
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn use_native_daemon(&self) -> bool {
        self.use_native_daemon
    }
}
