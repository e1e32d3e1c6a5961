// src/options/probe.rs

use tracing::{debug, info};

use crate::exec::{CommandRunner, ProbeCommand};

/// Checks whether the native watch daemon can be used on this host by
/// running its version command.
#[derive(Debug, Clone)]
pub struct NativeDaemonProbe<R> {
    runner: R,
    command: ProbeCommand,
}

impl<R: CommandRunner> NativeDaemonProbe<R> {
    pub fn new(runner: R, command: ProbeCommand) -> Self {
        Self { runner, command }
    }

    pub fn command(&self) -> &ProbeCommand {
        &self.command
    }

    /// `true` if the command exits successfully, `false` for any failure.
    ///
    /// "Not installed" and "installed but broken" are deliberately the same
    /// answer here.
    pub async fn probe(&self) -> bool {
        match self.runner.run(&self.command).await {
            Ok(()) => {
                info!(command = %self.command, "native watch daemon available");
                true
            }
            Err(err) => {
                debug!(command = %self.command, error = %err, "native watch daemon unavailable");
                false
            }
        }
    }
}
