//! Shared helpers for `buildwatch` integration tests: recording sinks, a
//! scripted watcher, a fake subprocess runner and a couple of harness
//! utilities.

pub mod fake_runner;
pub mod fake_watcher;
pub mod sinks;

use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

pub use fake_runner::FakeCommandRunner;
pub use fake_watcher::{ScriptedWatcher, ScriptedWatcherHandle};
pub use sinks::{AnalyticsLog, RecordingAnalytics, RecordingOutput};

/// Upper bound for anything a test awaits.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Route `tracing` output through the test harness capture.
///
/// `RUST_LOG` picks the filter (default: `buildwatch=debug,info`). Output is
/// only shown for failing tests unless run with `--nocapture`.
pub fn init_tracing() {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    INSTALLED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("buildwatch=debug,info"));
        // Another harness may have installed a subscriber first.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Await `fut`, panicking after [`TEST_TIMEOUT`].
pub async fn with_timeout<F: Future>(fut: F) -> F::Output {
    match tokio::time::timeout(TEST_TIMEOUT, fut).await {
        Ok(output) => output,
        Err(_) => panic!("test did not finish within {TEST_TIMEOUT:?}"),
    }
}
