// src/exec/build.rs

//! Runs the project's build command once.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, info, warn};

/// What happened when the build command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Exit status was success.
    Succeeded { elapsed: Duration },
    /// The process ran but exited unsuccessfully.
    Failed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    /// The process could not be started or waited on.
    SpawnFailed { message: String },
}

/// Run `cmd` through the platform shell, capturing its output.
///
/// Never returns an error: every failure mode is folded into the outcome so
/// the rebuild loop can report it and keep watching.
pub async fn run_build(cmd: &str) -> BuildOutcome {
    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };

    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    info!(cmd = %cmd, "starting build");
    let started = Instant::now();

    let output = match command.output().await {
        Ok(output) => output,
        Err(err) => {
            warn!(cmd = %cmd, error = %err, "failed to run build command");
            return BuildOutcome::SpawnFailed {
                message: format!("failed to run build command '{cmd}': {err}"),
            };
        }
    };

    let elapsed = started.elapsed();
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    for line in stdout.lines() {
        debug!("build stdout: {}", line);
    }

    debug!(
        cmd = %cmd,
        code = ?output.status.code(),
        elapsed_ms = elapsed.as_millis() as u64,
        "build command exited"
    );

    if output.status.success() {
        BuildOutcome::Succeeded { elapsed }
    } else {
        BuildOutcome::Failed {
            code: output.status.code(),
            stdout,
            stderr,
        }
    }
}
