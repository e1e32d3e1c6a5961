// src/options/resolver.rs

use tracing::debug;

use crate::config::WatchSection;
use crate::exec::CommandRunner;

use super::probe::NativeDaemonProbe;
use super::strategy::polling;
use super::WatchOptions;

/// Produces the [`WatchOptions`] for a watch session.
#[derive(Debug, Clone)]
pub struct OptionsResolver<R> {
    strategy: Option<WatchSection>,
    verbose: bool,
    probe: NativeDaemonProbe<R>,
}

impl<R: CommandRunner> OptionsResolver<R> {
    pub fn new(strategy: Option<WatchSection>, verbose: bool, probe: NativeDaemonProbe<R>) -> Self {
        Self {
            strategy,
            verbose,
            probe,
        }
    }

    pub fn probe(&self) -> &NativeDaemonProbe<R> {
        &self.probe
    }

    pub fn is_polling(&self) -> bool {
        polling(self.strategy.as_ref())
    }

    /// Resolve the options bundle. Infallible: the signature has no error
    /// path, and a failed probe simply means no native daemon.
    ///
    /// When polling is selected the probe is never run.
    pub async fn build_options(&self) -> WatchOptions {
        if self.is_polling() {
            debug!(verbose = self.verbose, "polling selected; skipping native daemon probe");
            return WatchOptions::polling(self.verbose);
        }

        let use_native_daemon = self.probe.probe().await;
        WatchOptions::events(self.verbose, use_native_daemon)
    }
}
