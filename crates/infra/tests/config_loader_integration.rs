//! Integration tests for configuration loading from files.

use std::path::PathBuf;

use clicktick_domain::ClickTickError;
use clicktick_infra::config;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn test_load_config_from_toml_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "clicktick.toml",
        r#"
[api]
base_url = "https://example.test/api/v2"
max_attempts = 5

[timer]
tick_interval_ms = 500
billable = true

[reporting]
daily_target_hours = 7.5

[logging]
level = "debug"
"#,
    );

    let config = config::load_from_file(Some(path)).expect("config");

    assert_eq!(config.api.base_url, "https://example.test/api/v2");
    assert_eq!(config.api.max_attempts, 5);
    assert_eq!(config.timer.tick_interval_ms, 500);
    assert!(config.timer.billable);
    assert_eq!(config.reporting.daily_target_hours, Some(7.5));
    assert_eq!(config.reporting.weekly_target_hours, None);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.storage.path, "clicktick-state.json");
}

#[test]
fn test_load_config_from_json_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "config.json",
        r#"{"storage": {"path": "/var/lib/clicktick/state.json"}, "logging": {"json": true}}"#,
    );

    let config = config::load_from_file(Some(path)).expect("config");

    assert_eq!(config.storage.path, "/var/lib/clicktick/state.json");
    assert!(config.logging.json);
    assert_eq!(config.timer.tick_interval_ms, 1_000);
}

#[test]
fn test_invalid_files_are_config_errors() {
    let dir = TempDir::new().expect("temp dir");
    let broken = write(&dir, "clicktick.toml", "[timer\ntick_interval_ms = ");

    let err = config::load_from_file(Some(broken)).unwrap_err();
    assert!(matches!(err, ClickTickError::Config(msg) if msg.contains("TOML")));

    let missing = dir.path().join("absent.toml");
    let err = config::load_from_file(Some(missing)).unwrap_err();
    assert!(matches!(err, ClickTickError::Config(msg) if msg.contains("not found")));
}
