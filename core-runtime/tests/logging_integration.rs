//! Integration tests for logging system

use bridge_traits::logging::LogLevel;
use core_runtime::logging::{default_filter, redact_url, LogFormat, LoggingConfig};

#[test]
fn test_logging_initialization() {
    // We can only initialize once per process, so we test the config builder
    let config = LoggingConfig::default()
        .with_format(LogFormat::Json)
        .with_level(LogLevel::Debug)
        .with_spans(true);

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, LogLevel::Debug);
    assert!(config.enable_spans);
    assert!(config.logger_sink.is_none());
}

#[test]
fn test_url_redaction() {
    assert_eq!(
        redact_url("https://media.example/tracks/1.mp3?Signature=abc&Expires=1"),
        "https://media.example/tracks/1.mp3"
    );
    assert_eq!(redact_url("https://media.example/2.ogg"), "https://media.example/2.ogg");
    assert_eq!(redact_url("?only-query"), "");
    assert_eq!(redact_url(""), "");
}

#[test]
fn test_format_selection() {
    // Debug builds should default to Pretty
    #[cfg(debug_assertions)]
    {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Pretty);
    }

    // Release builds should default to JSON
    #[cfg(not(debug_assertions))]
    {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Json);
    }
}

#[test]
fn test_filter_configuration() {
    let config = LoggingConfig::default().with_filter("core_waveform=debug,core_playback=trace");

    assert_eq!(
        config.filter,
        Some("core_waveform=debug,core_playback=trace".to_string())
    );
}

#[test]
fn test_default_filter_levels() {
    let filter = default_filter(LogLevel::Trace);
    assert!(filter.contains("core_service=trace"));
    assert!(filter.contains("bridge_wasm=trace"));
    assert!(!filter.contains("core_auth"));
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_spans(false)
        .with_target(false);

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(!config.enable_spans);
    assert!(!config.display_target);
}
