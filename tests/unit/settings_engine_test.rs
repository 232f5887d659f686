//! Unit tests for the settings engine.
//!
//! Settings are read-only for the host, so every case writes a file by hand
//! and loads it.

use std::path::PathBuf;

use rstest::rstest;
use tempfile::TempDir;

use widechat_session::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use widechat_session::types::errors::SettingsError;
use widechat_session::types::settings::{ApiScheme, SessionSettings};

fn engine_with(dir: &TempDir, content: &str) -> SettingsEngine {
    let path = dir.path().join("settings.json");
    std::fs::write(&path, content).unwrap();
    SettingsEngine::new(Some(path.to_string_lossy().to_string()))
}

#[test]
fn test_defaults() {
    let settings = SessionSettings::default();
    assert_eq!(settings.api.scheme, ApiScheme::Https);
    assert_eq!(settings.api.request_timeout_secs, 30);
    assert_eq!(settings.host.rate_limit_per_second, 200);
    assert_eq!(settings.host.queue_capacity, 64);
    assert_eq!(settings.logging.filter, "info");
    assert!(settings.storage.database_path.is_none());
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nowhere").join("settings.json");
    let mut engine = SettingsEngine::new(Some(path.to_string_lossy().to_string()));
    assert_eq!(engine.load().unwrap(), SessionSettings::default());
    assert!(!path.exists());
}

#[test]
fn test_full_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_with(
        &dir,
        r#"{
            "api": {"scheme": "http", "request_timeout_secs": 5},
            "storage": {"database_path": "/tmp/wc.db"},
            "logging": {"filter": "widechat_session=debug"},
            "host": {"rate_limit_per_second": 50, "queue_capacity": 8}
        }"#,
    );
    let settings = engine.load().unwrap();
    assert_eq!(settings.api.scheme, ApiScheme::Http);
    assert_eq!(settings.logging.filter, "widechat_session=debug");
    assert_eq!(settings.host.queue_capacity, 8);
    assert_eq!(engine.get_settings(), &settings);
    assert_eq!(engine.database_path(), PathBuf::from("/tmp/wc.db"));
}

#[test]
fn test_partial_nested_section_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_with(&dir, r#"{"api": {"scheme": "http"}}"#);
    let settings = engine.load().unwrap();
    assert_eq!(settings.api.scheme, ApiScheme::Http);
    assert_eq!(settings.api.request_timeout_secs, 30);
    assert_eq!(settings.host.queue_capacity, 64);
}

#[test]
fn test_malformed_file_is_serialization_error() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_with(&dir, "{ not json");
    assert!(matches!(engine.load(), Err(SettingsError::SerializationError(_))));
}

#[test]
fn test_unknown_scheme_is_serialization_error() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_with(&dir, r#"{"api": {"scheme": "ftp"}}"#);
    assert!(matches!(engine.load(), Err(SettingsError::SerializationError(_))));
    assert_eq!(engine.get_settings().api.scheme, ApiScheme::Https);
}

#[rstest]
#[case::timeout(r#"{"api": {"request_timeout_secs": 0}}"#)]
#[case::rate_limit(r#"{"host": {"rate_limit_per_second": 0}}"#)]
#[case::queue(r#"{"host": {"queue_capacity": 0}}"#)]
fn test_zero_limits_are_invalid(#[case] content: &str) {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_with(&dir, content);
    assert!(matches!(engine.load(), Err(SettingsError::InvalidValue(_))));
    assert_eq!(engine.get_settings(), &SessionSettings::default());
}

#[test]
fn test_default_database_path_lives_in_data_dir() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_with(&dir, "{}");
    engine.load().unwrap();
    assert!(engine.database_path().ends_with("widechat-session.db"));
}
