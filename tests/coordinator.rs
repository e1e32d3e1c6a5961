use std::error::Error;

use tokio::sync::oneshot;

use buildwatch::config::WatchSection;
use buildwatch::engine::{CoordinatorState, WatchCoordinator};
use buildwatch::errors::BuildwatchError;
use buildwatch::exec::ProbeCommand;
use buildwatch::options::{NativeDaemonProbe, OptionsResolver, WatchOptions};
use buildwatch::report::{
    AnalyticsEvent, BuildError, ChangeEvent, ErrorEvent, Tone, LINE_ENDING,
};
use buildwatch::types::WatcherEvent;
use buildwatch_test_utils::{
    init_tracing, with_timeout, FakeCommandRunner, RecordingAnalytics, RecordingOutput,
    ScriptedWatcher, ScriptedWatcherHandle,
};

type TestResult = Result<(), Box<dyn Error>>;

type Coordinator =
    WatchCoordinator<ScriptedWatcher, FakeCommandRunner, RecordingOutput, RecordingAnalytics>;

struct Harness {
    coordinator: Coordinator,
    watcher: ScriptedWatcherHandle,
    runner: FakeCommandRunner,
    output: RecordingOutput,
    analytics: RecordingAnalytics,
}

fn harness_with(watcher: ScriptedWatcher, handle: ScriptedWatcherHandle, strategy: &str) -> Harness {
    init_tracing();

    let runner = FakeCommandRunner::succeeding();
    let probe = NativeDaemonProbe::new(
        runner.clone(),
        ProbeCommand::new("watchman", vec!["version".to_string()]),
    );
    let section = WatchSection {
        watcher: Some(strategy.to_string()),
        ..WatchSection::default()
    };
    let resolver = OptionsResolver::new(Some(section), false, probe);

    let output = RecordingOutput::new();
    let analytics = RecordingAnalytics::new();
    let coordinator = WatchCoordinator::new(watcher, resolver, output.clone(), analytics.clone());

    Harness {
        coordinator,
        watcher: handle,
        runner,
        output,
        analytics,
    }
}

fn harness() -> Harness {
    let (watcher, handle) = ScriptedWatcher::new();
    harness_with(watcher, handle, "events")
}

fn rebuild() -> WatcherEvent {
    WatcherEvent::Change(ChangeEvent::new(12_344_000_000))
}

fn plain_error(message: &str) -> WatcherEvent {
    WatcherEvent::Error(BuildError::new(message).with_stack("Error: foo\n    at <anonymous>"))
}

#[tokio::test]
async fn start_moves_idle_to_watching_with_resolved_options() -> TestResult {
    let mut h = harness();
    assert_eq!(h.coordinator.state(), CoordinatorState::Idle);

    let options = h.coordinator.start().await?;

    assert_eq!(options, WatchOptions::events(false, true));
    assert_eq!(h.coordinator.state(), CoordinatorState::Watching);
    assert_eq!(h.coordinator.options(), Some(options));
    assert_eq!(h.watcher.started_with(), vec![options]);
    assert_eq!(h.runner.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn polling_strategy_reaches_the_watcher_without_probing() -> TestResult {
    let (watcher, handle) = ScriptedWatcher::new();
    let mut h = harness_with(watcher, handle, "polling");

    h.coordinator.start().await?;

    assert_eq!(h.watcher.started_with(), vec![WatchOptions::polling(false)]);
    assert_eq!(h.runner.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn change_event_reports_success_and_tracks_analytics() -> TestResult {
    let mut h = harness();
    h.coordinator.start().await?;

    assert!(h.coordinator.handle_event(rebuild()));

    assert_eq!(
        h.output.plain_output(),
        format!("{LINE_ENDING}Build successful - 12344ms.{LINE_ENDING}")
    );
    assert_eq!(h.output.lines()[0].tone, Tone::Success);

    let log = h.analytics.log();
    assert_eq!(
        log.tracks,
        vec![AnalyticsEvent {
            name: "ember rebuild".to_string(),
            message: "broccoli rebuild time: 12344ms".to_string(),
        }]
    );
    assert_eq!(log.timings.len(), 1);
    assert_eq!(log.timings[0].value, 12344);
    assert!(log.errors.is_empty());
    Ok(())
}

#[tokio::test]
async fn error_event_tracks_error_and_enters_error_state() -> TestResult {
    let mut h = harness();
    h.coordinator.start().await?;

    h.coordinator.handle_event(plain_error("foo"));

    assert_eq!(
        h.analytics.log().errors,
        vec![ErrorEvent {
            description: "foo".to_string()
        }]
    );
    assert_eq!(h.output.plain_output(), format!("foo{LINE_ENDING}"));
    assert_eq!(h.coordinator.state(), CoordinatorState::WatchingWithError);
    assert!(h.coordinator.report_state().had_error_since_last_success);
    Ok(())
}

#[tokio::test]
async fn rich_error_prints_file_location_first() -> TestResult {
    let mut h = harness();
    h.coordinator.start().await?;

    h.coordinator.handle_event(WatcherEvent::Error(
        BuildError::new("buildFailed")
            .with_file("someFile")
            .with_line(24)
            .with_column(80),
    ));

    let outs: Vec<String> = h.output.plain_output().split(LINE_ENDING).map(str::to_string).collect();
    assert_eq!(outs[0], "File: someFile (24:80)");
    assert_eq!(outs[1], "buildFailed");
    assert!(h.output.lines().iter().all(|l| l.tone == Tone::Error));
    Ok(())
}

#[tokio::test]
async fn change_after_error_is_still_reported_and_clears_error_state() -> TestResult {
    let mut h = harness();
    h.coordinator.start().await?;

    h.coordinator.handle_event(plain_error("foo"));
    h.coordinator.handle_event(rebuild());

    assert_eq!(h.coordinator.state(), CoordinatorState::Watching);
    assert!(h.output.plain_output().contains("Build successful"));

    let log = h.analytics.log();
    assert_eq!(log.errors.len(), 1);
    assert_eq!(
        log.tracks,
        vec![AnalyticsEvent {
            name: "ember rebuild".to_string(),
            message: "broccoli rebuild time: 12344ms".to_string(),
        }]
    );
    Ok(())
}

#[tokio::test]
async fn startup_failure_propagates_and_leaves_coordinator_idle() {
    let (watcher, handle) = ScriptedWatcher::failing();
    let mut h = harness_with(watcher, handle, "events");

    let result = h.coordinator.start().await;

    assert!(result.is_err(), "expected startup failure");
    assert_eq!(h.coordinator.state(), CoordinatorState::Idle);

    // stop() after a failed start is a no-op.
    h.coordinator.stop();
    assert_eq!(h.coordinator.state(), CoordinatorState::Idle);
    assert_eq!(h.watcher.stop_calls(), 0);
}

#[tokio::test]
async fn starting_twice_is_rejected() -> TestResult {
    let mut h = harness();
    h.coordinator.start().await?;

    match h.coordinator.start().await {
        Err(BuildwatchError::StartupError(msg)) => assert!(msg.contains("cannot start")),
        other => panic!("expected StartupError, got {other:?}"),
    }
    assert_eq!(h.watcher.started_with().len(), 1);
    Ok(())
}

#[tokio::test]
async fn stop_is_idempotent_and_safe_before_start() -> TestResult {
    let mut h = harness();

    h.coordinator.stop();
    assert_eq!(h.coordinator.state(), CoordinatorState::Idle);

    h.coordinator.start().await?;
    h.coordinator.stop();
    h.coordinator.stop();

    assert_eq!(h.coordinator.state(), CoordinatorState::Stopped);
    assert_eq!(h.watcher.stop_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn events_are_ignored_before_start_and_after_stop() -> TestResult {
    let mut h = harness();

    assert!(!h.coordinator.handle_event(rebuild()));

    h.coordinator.start().await?;
    h.coordinator.stop();

    assert!(!h.coordinator.handle_event(plain_error("late")));
    assert!(!h.watcher.emit(rebuild()).await, "channel should be closed after stop");

    assert!(h.output.lines().is_empty());
    assert_eq!(h.analytics.log(), Default::default());
    assert_eq!(h.coordinator.state(), CoordinatorState::Stopped);
    Ok(())
}

#[tokio::test]
async fn run_until_processes_events_in_order_until_channel_closes() -> TestResult {
    let mut h = harness();
    h.coordinator.start().await?;

    assert!(h.watcher.emit(plain_error("first")).await);
    assert!(h.watcher.emit(rebuild()).await);
    assert!(h.watcher.emit(plain_error("second")).await);
    h.watcher.close();

    with_timeout(h.coordinator.run_until(std::future::pending())).await?;

    assert_eq!(
        h.analytics.log().errors,
        vec![
            ErrorEvent { description: "first".to_string() },
            ErrorEvent { description: "second".to_string() },
        ]
    );
    assert_eq!(h.analytics.log().tracks.len(), 1);
    assert_eq!(
        h.output.plain_output(),
        ["first", "", "Build successful - 12344ms.", "second", ""].join(LINE_ENDING)
    );
    assert_eq!(h.coordinator.state(), CoordinatorState::Stopped);
    Ok(())
}

#[tokio::test]
async fn run_until_stops_on_shutdown_signal() -> TestResult {
    let mut h = harness();
    h.coordinator.start().await?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let handle = h.watcher.clone();

    let driver = async {
        assert!(handle.emit(rebuild()).await);
        // Give the coordinator a chance to drain the event before shutdown.
        tokio::task::yield_now().await;
        let _ = shutdown_tx.send(());
    };

    let run = h.coordinator.run_until(async {
        let _ = shutdown_rx.await;
    });

    let (result, ()) = with_timeout(async { tokio::join!(run, driver) }).await;
    result?;

    assert_eq!(h.watcher.stop_calls(), 1);
    assert!(!h.watcher.emit(rebuild()).await);
    Ok(())
}

#[tokio::test]
async fn run_until_returns_immediately_when_not_started() -> TestResult {
    let mut h = harness();

    with_timeout(h.coordinator.run_until(std::future::pending())).await?;

    assert_eq!(h.coordinator.state(), CoordinatorState::Idle);
    Ok(())
}
