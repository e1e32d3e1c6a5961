// src/engine/core.rs

//! Pure reporting state machine.
//!
//! [`ReportCore`] consumes [`WatcherEvent`]s and produces [`Emission`]s that
//! the async shell forwards to the output and analytics sinks. It has no
//! channels, no Tokio types and performs no IO, so it can be driven
//! directly from tests.

use tracing::{debug, info};

use crate::report::{
    format_change_report, format_error_report, AnalyticsEvent, ErrorEvent, ReportLine,
    TimingEvent,
};
use crate::types::WatcherEvent;

/// Whether the project is currently broken.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportState {
    /// Set by every error event, cleared by every successful change event.
    pub had_error_since_last_success: bool,
}

/// One side effect requested by the core, in the order it must happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    Output(ReportLine),
    Track(AnalyticsEvent),
    TrackTiming(TimingEvent),
    TrackError(ErrorEvent),
}

#[derive(Debug, Default)]
pub struct ReportCore {
    state: ReportState,
}

impl ReportCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ReportState {
        self.state
    }

    /// Handle one event, updating the error flag.
    ///
    /// - `Change`: success line, rebuild event, rebuild timing. Always clears
    ///   the error flag, whatever came before.
    /// - `Error`: error analytics, then the error lines. Sets the flag.
    pub fn step(&mut self, event: &WatcherEvent) -> Vec<Emission> {
        match event {
            WatcherEvent::Change(change) => {
                let report = format_change_report(change);

                if self.state.had_error_since_last_success {
                    info!("build recovered after previous error");
                }
                self.state.had_error_since_last_success = false;

                debug!(ms = report.timing_event.value, "rebuild succeeded");

                vec![
                    Emission::Output(report.line),
                    Emission::Track(report.analytics_event),
                    Emission::TrackTiming(report.timing_event),
                ]
            }
            WatcherEvent::Error(error) => {
                let report = format_error_report(error);

                self.state.had_error_since_last_success = true;

                debug!(
                    file = ?error.file,
                    line = ?error.line,
                    "rebuild failed"
                );

                let mut emissions = Vec::with_capacity(report.lines.len() + 1);
                emissions.push(Emission::TrackError(report.analytics_event));
                emissions.extend(report.lines.into_iter().map(Emission::Output));
                emissions
            }
        }
    }
}
