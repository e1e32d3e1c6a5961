use std::sync::{Arc, Mutex};

use buildwatch::report::{
    AnalyticsEvent, AnalyticsSink, ErrorEvent, OutputSink, ReportLine, TimingEvent, LINE_ENDING,
};

/// Output sink that keeps every line it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingOutput {
    lines: Arc<Mutex<Vec<ReportLine>>>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<ReportLine> {
        self.lines.lock().unwrap().clone()
    }

    /// Everything written so far, uncoloured, each write followed by
    /// [`LINE_ENDING`].
    pub fn plain_output(&self) -> String {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .map(|line| format!("{}{LINE_ENDING}", line.render_plain()))
            .collect()
    }
}

impl OutputSink for RecordingOutput {
    fn write_line(&mut self, line: &ReportLine) {
        self.lines.lock().unwrap().push(line.clone());
    }
}

/// Everything a [`RecordingAnalytics`] was sent, per channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsLog {
    pub tracks: Vec<AnalyticsEvent>,
    pub timings: Vec<TimingEvent>,
    pub errors: Vec<ErrorEvent>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingAnalytics {
    log: Arc<Mutex<AnalyticsLog>>,
}

impl RecordingAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> AnalyticsLog {
        self.log.lock().unwrap().clone()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn track(&mut self, event: AnalyticsEvent) {
        self.log.lock().unwrap().tracks.push(event);
    }

    fn track_timing(&mut self, event: TimingEvent) {
        self.log.lock().unwrap().timings.push(event);
    }

    fn track_error(&mut self, event: ErrorEvent) {
        self.log.lock().unwrap().errors.push(event);
    }
}
