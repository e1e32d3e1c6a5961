use std::num::NonZeroU32;
use std::time::Duration;

/// A completed (re)build, as reported by the external watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub total_time_nanos: u64,
}

impl ChangeEvent {
    pub fn new(total_time_nanos: u64) -> Self {
        Self { total_time_nanos }
    }

    /// Saturates at `u64::MAX` nanoseconds (about 584 years).
    pub fn from_duration(elapsed: Duration) -> Self {
        Self::new(u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX))
    }

    /// Whole milliseconds, truncated.
    pub fn total_time_millis(&self) -> u64 {
        self.total_time_nanos / 1_000_000
    }
}

/// A failed build.
///
/// Plain errors carry only `message` (and maybe `stack`); compiler-style
/// errors also carry a location. `column` is only shown when `line` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildError {
    pub message: String,
    pub file: Option<String>,
    pub line: Option<NonZeroU32>,
    pub column: Option<NonZeroU32>,
    pub stack: Option<String>,
}

impl BuildError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// `0` is not a valid line and leaves the line unset.
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = NonZeroU32::new(line);
        self
    }

    /// `0` is not a valid column and leaves the column unset.
    pub fn with_column(mut self, column: u32) -> Self {
        self.column = NonZeroU32::new(column);
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// Events produced by the external watcher, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatcherEvent {
    Change(ChangeEvent),
    Error(BuildError),
}
