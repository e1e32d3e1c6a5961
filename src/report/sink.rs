// src/report/sink.rs

//! Output and analytics sinks.
//!
//! The coordinator only talks to these traits. Production uses
//! [`TerminalOutput`] + [`TracingAnalytics`]; tests record what was sent.

use std::io::{self, Write};

use tracing::{info, warn};

use super::{AnalyticsEvent, ErrorEvent, ReportLine, TimingEvent, LINE_ENDING};

/// Receives pre-formatted report lines. Each write ends with [`LINE_ENDING`].
pub trait OutputSink: Send {
    fn write_line(&mut self, line: &ReportLine);
}

/// Receives analytics payloads. Fire-and-forget.
pub trait AnalyticsSink: Send {
    fn track(&mut self, event: AnalyticsEvent);
    fn track_timing(&mut self, event: TimingEvent);
    fn track_error(&mut self, event: ErrorEvent);
}

/// Writes coloured lines to stdout.
#[derive(Debug, Default)]
pub struct TerminalOutput;

impl OutputSink for TerminalOutput {
    fn write_line(&mut self, line: &ReportLine) {
        let mut stdout = io::stdout().lock();
        let written = write!(stdout, "{}{LINE_ENDING}", line.render()).and_then(|_| stdout.flush());
        if let Err(err) = written {
            warn!(error = %err, "failed to write report line to stdout");
        }
    }
}

/// Emits analytics as structured `tracing` events under
/// `buildwatch::analytics`, so any subscriber can ship them.
#[derive(Debug, Default)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn track(&mut self, event: AnalyticsEvent) {
        info!(
            target: "buildwatch::analytics",
            name = %event.name,
            event_message = %event.message,
            "track"
        );
    }

    fn track_timing(&mut self, event: TimingEvent) {
        info!(
            target: "buildwatch::analytics",
            category = %event.category,
            variable = %event.variable,
            label = %event.label,
            value = event.value,
            "track timing"
        );
    }

    fn track_error(&mut self, event: ErrorEvent) {
        info!(
            target: "buildwatch::analytics",
            description = %event.description,
            "track error"
        );
    }
}
