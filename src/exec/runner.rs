// src/exec/runner.rs

//! Pluggable subprocess facility.
//!
//! Callers hand over a [`ProbeCommand`] and get back a future that resolves
//! `Ok(())` when the process exits successfully and `Err` on a non-zero exit
//! or when the process could not be run at all.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{anyhow, Context};
use tokio::process::Command;
use tracing::debug;

use crate::errors::Result;

/// A program plus its arguments. Not interpreted by a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ProbeCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl fmt::Display for ProbeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Trait abstracting how subprocesses are executed.
pub trait CommandRunner: Send + Sync {
    fn run<'a>(
        &'a self,
        command: &'a ProbeCommand,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Runs commands as real OS processes with all stdio discarded.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run<'a>(
        &'a self,
        command: &'a ProbeCommand,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(run_system(command))
    }
}

async fn run_system(command: &ProbeCommand) -> Result<()> {
    let status = Command::new(&command.program)
        .args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await
        .with_context(|| format!("spawning '{command}'"))?;

    debug!(%command, code = ?status.code(), "subprocess exited");

    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("'{command}' exited with {status}").into())
    }
}
