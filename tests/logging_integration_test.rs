//! Integration tests for logging functionality
//!
//! A global subscriber can only be installed once per process, so only
//! `test_init_logging_creates_log_directory` installs one.

use ehrbridge::config::LoggingConfig;
use ehrbridge::domain::BridgeError;
use ehrbridge::logging::{init_logging, parse_log_level};
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "logs");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_init_logging_creates_log_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "hourly".to_string(),
    };
    assert!(!log_path.exists());

    let guard = init_logging("debug", &config).expect("Failed to initialize logging");
    assert!(log_path.is_dir());

    ehrbridge::log_batch_mapped!(1, 2, 3, 4);
    ehrbridge::log_validation_complete!(10, 1, 2);
    drop(guard);
}

#[test]
fn test_init_logging_rejects_unknown_level() {
    // Fails before any subscriber is installed
    let err = init_logging("loud", &LoggingConfig::default()).err().unwrap();
    assert!(matches!(err, BridgeError::Configuration(_)));
}

#[test]
fn test_parse_log_level_matches_config_levels() {
    for level in ["trace", "debug", "info", "warn", "error"] {
        assert!(parse_log_level(level).is_ok(), "{level} should parse");
    }
}

#[test]
fn test_logging_macros_without_subscriber() {
    let error = BridgeError::MissingInput("observations.json".to_string());
    ehrbridge::log_error_with_context!(&error, "Failed to load legacy batch");
    ehrbridge::log_validation_complete!(0usize, 0usize, 0usize);
}
