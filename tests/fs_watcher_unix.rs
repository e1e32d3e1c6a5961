#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::time::Duration;

use buildwatch::config::BuildSettings;
use buildwatch::options::WatchOptions;
use buildwatch::types::WatcherEvent;
use buildwatch::watch::{ExternalWatcher, FsWatcher, FsWatcherSettings};
use buildwatch_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn settings(root: &std::path::Path, cmd: &str, on_start: bool) -> FsWatcherSettings {
    FsWatcherSettings {
        root: root.to_path_buf(),
        exclude: vec!["ignored/**".to_string()],
        debounce: Duration::from_millis(50),
        poll_interval: Duration::from_millis(50),
        build: BuildSettings {
            cmd: cmd.to_string(),
            on_start,
        },
    }
}

#[tokio::test]
async fn initial_build_is_reported_as_change() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;

    let mut watcher = FsWatcher::new(settings(dir.path(), "true", true));
    let mut rx = watcher.start(WatchOptions::polling(false))?;

    let event = with_timeout(rx.recv()).await;
    assert!(matches!(event, Some(WatcherEvent::Change(_))), "got {event:?}");

    watcher.stop();
    Ok(())
}

#[tokio::test]
async fn failing_initial_build_is_reported_as_error() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;

    let mut watcher = FsWatcher::new(settings(dir.path(), "echo 'broken' >&2; exit 1", true));
    let mut rx = watcher.start(WatchOptions::events(false, false))?;

    match with_timeout(rx.recv()).await {
        Some(WatcherEvent::Error(error)) => assert_eq!(error.message, "broken"),
        other => panic!("expected error event, got {other:?}"),
    }

    watcher.stop();
    Ok(())
}

#[tokio::test]
async fn file_change_triggers_rebuild_with_polling() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("input.txt"), "one")?;

    let mut watcher = FsWatcher::new(settings(dir.path(), "true", false));
    let mut rx = watcher.start(WatchOptions::polling(true))?;

    // Let the poller take its initial snapshot.
    tokio::time::sleep(Duration::from_millis(200)).await;
    fs::write(dir.path().join("input.txt"), "two, longer")?;

    let event = with_timeout(rx.recv()).await;
    assert!(matches!(event, Some(WatcherEvent::Change(_))), "got {event:?}");

    watcher.stop();
    Ok(())
}

#[tokio::test]
async fn back_to_back_edits_within_a_second_each_rebuild_with_polling() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("input.txt");
    fs::write(&input, "aaa")?;

    let mut watcher = FsWatcher::new(settings(dir.path(), "true", false));
    let mut rx = watcher.start(WatchOptions::polling(false))?;

    tokio::time::sleep(Duration::from_millis(150)).await;
    fs::write(&input, "bbb")?;
    let first = with_timeout(rx.recv()).await;
    assert!(matches!(first, Some(WatcherEvent::Change(_))), "got {first:?}");

    // Same length, well inside the mtime's one-second granularity.
    fs::write(&input, "ccc")?;
    let second = with_timeout(rx.recv()).await;
    assert!(matches!(second, Some(WatcherEvent::Change(_))), "got {second:?}");

    watcher.stop();
    Ok(())
}

#[tokio::test]
async fn missing_root_is_a_startup_failure() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let mut watcher = FsWatcher::new(settings(&missing, "true", false));
    assert!(watcher.start(WatchOptions::events(false, false)).is_err());
}

#[tokio::test]
async fn stop_closes_the_event_channel() -> TestResult {
    let dir = tempfile::tempdir()?;

    let mut watcher = FsWatcher::new(settings(dir.path(), "true", false));
    let mut rx = watcher.start(WatchOptions::polling(false))?;
    watcher.stop();

    assert_eq!(with_timeout(rx.recv()).await, None);
    Ok(())
}
