use buildwatch::cli::LogLevel;
use buildwatch::logging::log_filter;
use tracing::level_filters::LevelFilter;

fn max_level(cli: Option<LogLevel>, env: Option<&str>) -> Option<LevelFilter> {
    log_filter(cli, env).max_level_hint()
}

#[test]
fn cli_flag_wins_over_env() {
    assert_eq!(max_level(Some(LogLevel::Trace), Some("error")), Some(LevelFilter::TRACE));
    assert_eq!(
        max_level(Some(LogLevel::Warn), Some("buildwatch=debug")),
        Some(LevelFilter::WARN)
    );
}

#[test]
fn bare_env_level_is_used_without_flag() {
    assert_eq!(max_level(None, Some(" Warning ")), Some(LevelFilter::WARN));
    assert_eq!(max_level(None, Some("DEBUG")), Some(LevelFilter::DEBUG));
}

#[test]
fn env_directives_are_honoured() {
    assert_eq!(
        max_level(None, Some("buildwatch=debug,notify=warn")),
        Some(LevelFilter::DEBUG)
    );
}

#[test]
fn defaults_to_info() {
    assert_eq!(max_level(None, None), Some(LevelFilter::INFO));
    assert_eq!(max_level(None, Some("loud")), Some(LevelFilter::INFO));
}
