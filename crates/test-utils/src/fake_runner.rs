use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use buildwatch::errors::{BuildwatchError, Result};
use buildwatch::exec::{CommandRunner, ProbeCommand};

/// A subprocess facility that never spawns anything.
///
/// - records every command it was asked to run
/// - resolves `Ok` or `Err` depending on how it was built
#[derive(Debug, Clone)]
pub struct FakeCommandRunner {
    succeed: bool,
    calls: Arc<Mutex<Vec<ProbeCommand>>>,
}

impl FakeCommandRunner {
    pub fn succeeding() -> Self {
        Self {
            succeed: true,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            succeed: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<ProbeCommand> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl CommandRunner for FakeCommandRunner {
    fn run<'a>(
        &'a self,
        command: &'a ProbeCommand,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        self.calls.lock().unwrap().push(command.clone());
        let succeed = self.succeed;

        Box::pin(async move {
            if succeed {
                Ok(())
            } else {
                Err(BuildwatchError::Other(anyhow!(
                    "'{command}' is not available"
                )))
            }
        })
    }
}
