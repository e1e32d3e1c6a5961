// src/options/strategy.rs

use crate::config::WatchSection;

/// The only `watcher` value that selects polling.
pub const POLLING: &str = "polling";

/// `true` iff the config asks for `watcher = "polling"`.
///
/// Absent config, absent field, `"events"` and unrecognised strings all mean
/// OS events. Matching is exact: `"Polling"` is not polling.
pub fn polling(config: Option<&WatchSection>) -> bool {
    config
        .and_then(|section| section.watcher.as_deref())
        .is_some_and(|watcher| watcher == POLLING)
}
