// src/report/format.rs

use crate::types::{BuildError, ChangeEvent};

use super::{AnalyticsEvent, ErrorEvent, ReportLine, TimingEvent};

/// Analytics literals for a successful rebuild. Dashboards key on these.
pub const REBUILD_EVENT_NAME: &str = "ember rebuild";
pub const REBUILD_TIMING_CATEGORY: &str = "rebuild";
pub const REBUILD_TIMING_VARIABLE: &str = "rebuild time";
pub const REBUILD_TIMING_LABEL: &str = "broccoli rebuild time";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeReport {
    pub line: ReportLine,
    pub analytics_event: AnalyticsEvent,
    pub timing_event: TimingEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// `File: ...` (only when the error names a file), then the message.
    pub lines: Vec<ReportLine>,
    pub analytics_event: ErrorEvent,
}

pub fn format_change_report(event: &ChangeEvent) -> ChangeReport {
    let ms = event.total_time_millis();

    ChangeReport {
        line: ReportLine::success(format!("Build successful - {ms}ms.")).with_leading_break(),
        analytics_event: AnalyticsEvent {
            name: REBUILD_EVENT_NAME.to_string(),
            message: format!("broccoli rebuild time: {ms}ms"),
        },
        timing_event: TimingEvent {
            category: REBUILD_TIMING_CATEGORY.to_string(),
            variable: REBUILD_TIMING_VARIABLE.to_string(),
            label: REBUILD_TIMING_LABEL.to_string(),
            value: ms,
        },
    }
}

pub fn format_error_report(error: &BuildError) -> ErrorReport {
    let mut lines = Vec::with_capacity(2);

    if let Some(ref file) = error.file {
        lines.push(ReportLine::error(format!("File: {file}{}", location_suffix(error))));
    }
    lines.push(ReportLine::error(error.message.clone()));

    ErrorReport {
        lines,
        analytics_event: ErrorEvent {
            description: error.message.clone(),
        },
    }
}

/// ` (line:col)`, ` (line)` or nothing. A column without a line is dropped.
fn location_suffix(error: &BuildError) -> String {
    match (error.line, error.column) {
        (Some(line), Some(col)) => format!(" ({line}:{col})"),
        (Some(line), None) => format!(" ({line})"),
        (None, _) => String::new(),
    }
}
