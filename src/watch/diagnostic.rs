// src/watch/diagnostic.rs

//! Turns the result of a build command into a watcher event.

use std::sync::LazyLock;

use regex::Regex;

use crate::exec::BuildOutcome;
use crate::types::{BuildError, ChangeEvent, WatcherEvent};

/// `path/to/file.ext:LINE[:COL]`, optionally preceded by whitespace or an
/// arrow (`--> src/lib.rs:3:1`) and optionally starting with a drive letter
/// (`C:\src\a.rs:3:1`). The path must contain a `.` or a separator so that
/// prose like `error: 2 warnings` is not mistaken for a location.
static LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)(?:^|\s)(?P<file>(?:[A-Za-z]:)?[\w.\\/-]*[.\\/][\w.\\/-]*):(?P<line>\d+)(?::(?P<col>\d+))?",
    )
    .expect("location regex is valid")
});

pub fn event_from_outcome(outcome: BuildOutcome) -> WatcherEvent {
    match outcome {
        BuildOutcome::Succeeded { elapsed } => {
            WatcherEvent::Change(ChangeEvent::from_duration(elapsed))
        }
        BuildOutcome::Failed {
            code,
            stdout,
            stderr,
        } => WatcherEvent::Error(error_from_output(code, &stdout, &stderr)),
        BuildOutcome::SpawnFailed { message } => WatcherEvent::Error(BuildError::new(message)),
    }
}

/// Build a [`BuildError`] from a failed command's output.
///
/// stderr is preferred; stdout is used when stderr is blank. The first
/// location found in that text becomes `file` / `line` / `column`.
pub fn error_from_output(code: Option<i32>, stdout: &str, stderr: &str) -> BuildError {
    let text = if stderr.trim().is_empty() {
        stdout.trim()
    } else {
        stderr.trim()
    };

    if text.is_empty() {
        let message = match code {
            Some(code) => format!("build command exited with code {code}"),
            None => "build command was terminated by a signal".to_string(),
        };
        return BuildError::new(message);
    }

    let mut error = BuildError::new(text).with_stack(text);
    if let Some((file, line, column)) = find_location(text) {
        error = error.with_file(file).with_line(line);
        if let Some(column) = column {
            error = error.with_column(column);
        }
    }
    error
}

/// First `file:line[:col]` in `text`.
pub fn find_location(text: &str) -> Option<(String, u32, Option<u32>)> {
    let caps = LOCATION.captures(text)?;
    let file = caps.name("file")?.as_str().to_string();
    let line = caps.name("line")?.as_str().parse().ok()?;
    let column = caps.name("col").and_then(|c| c.as_str().parse().ok());
    Some((file, line, column))
}
