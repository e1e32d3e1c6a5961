// src/report/mod.rs

//! User-facing reports and analytics payloads.
//!
//! - [`format`] turns change events and build errors into [`ReportLine`]s and
//!   analytics payloads. Pure, no IO.
//! - [`sink`] defines where those go: the terminal and the analytics backend.

pub mod format;
pub mod sink;

use colored::Colorize;

pub use crate::types::{BuildError, ChangeEvent};
pub use format::{
    format_change_report, format_error_report, ChangeReport, ErrorReport, REBUILD_EVENT_NAME,
    REBUILD_TIMING_CATEGORY, REBUILD_TIMING_LABEL, REBUILD_TIMING_VARIABLE,
};
pub use sink::{AnalyticsSink, OutputSink, TerminalOutput, TracingAnalytics};

/// Line separator appended after every write, and used for leading breaks.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Semantic colour of a report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

/// One line of user-facing output.
///
/// The sink appends [`LINE_ENDING`]; `leading_break` asks for one extra
/// line break before the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub tone: Tone,
    pub text: String,
    pub leading_break: bool,
}

impl ReportLine {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Success,
            text: text.into(),
            leading_break: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Error,
            text: text.into(),
            leading_break: false,
        }
    }

    pub fn with_leading_break(mut self) -> Self {
        self.leading_break = true;
        self
    }

    /// Text painted for a terminal (green / red). `colored` drops the escape
    /// codes itself when colours are disabled.
    pub fn render(&self) -> String {
        let painted = match self.tone {
            Tone::Success => self.text.as_str().green().to_string(),
            Tone::Error => self.text.as_str().red().to_string(),
        };
        self.with_break(painted)
    }

    /// Same layout as [`render`](Self::render) with no escape codes.
    pub fn render_plain(&self) -> String {
        self.with_break(self.text.clone())
    }

    fn with_break(&self, body: String) -> String {
        if self.leading_break {
            format!("{LINE_ENDING}{body}")
        } else {
            body
        }
    }
}

/// Payload for `AnalyticsSink::track`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsEvent {
    pub name: String,
    pub message: String,
}

/// Payload for `AnalyticsSink::track_timing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingEvent {
    pub category: String,
    pub variable: String,
    pub label: String,
    pub value: u64,
}

/// Payload for `AnalyticsSink::track_error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEvent {
    pub description: String,
}
