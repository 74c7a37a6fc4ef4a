#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::PathBuf;

use diffstate_core::config::OP_LOAD_CONFIG;
use diffstate_core::logging_facility::test_capture::init_test_capture;
use diffstate_core::logging_facility::Profile;
use diffstate_core::{EngineConfig, ExErrorKind, HistoryLimit};
use diffstate_core_types::schema::{EVENT_END, EVENT_END_ERROR, FIELD_ERR_CODE};
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("diffstate.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_config_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        "history_limit = 25\nlog_profile = \"test\"\n[reconcile]\nmarker_field = \"status\"\n",
    );

    let config = EngineConfig::from_file(&path).unwrap();

    assert_eq!(config.history_limit().max(), Some(25));
    assert_eq!(config.log_profile, Profile::Test);
    assert_eq!(config.reconcile.marker_field, "status");
    assert_eq!(config.reconcile.id_field, "id");
}

#[test]
fn test_invalid_file_reports_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "history_limit = \"many\"\n");

    let err = EngineConfig::from_file(&path).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
}

#[test]
fn test_load_failures_are_logged_as_errors() {
    let capture = init_test_capture();
    let temp_dir = TempDir::new().unwrap();
    let bad = write_config(&temp_dir, "history_limit = 0\n");
    let missing = temp_dir.path().join("absent.toml");

    assert!(EngineConfig::from_file(&bad).is_err());
    assert_eq!(
        EngineConfig::from_file(&missing).unwrap_err().kind(),
        ExErrorKind::Io
    );

    let logged_for = |path: &PathBuf, code: &str| {
        let path = path.display().to_string();
        capture.count_events(|e| {
            e.op.as_deref() == Some(OP_LOAD_CONFIG)
                && e.event.as_deref() == Some(EVENT_END_ERROR)
                && e.fields.get("path") == Some(&path)
                && e.fields.get(FIELD_ERR_CODE) == Some(&code.to_string())
        })
    };
    assert_eq!(logged_for(&bad, "ERR_INVALID_CONFIG"), 1);
    assert_eq!(logged_for(&missing, "ERR_IO"), 1);
}

#[test]
fn test_successful_load_is_logged() {
    let capture = init_test_capture();
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "history_limit = 4\n");

    EngineConfig::from_file(&path).unwrap();

    let path = path.display().to_string();
    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some(OP_LOAD_CONFIG)
            && e.event.as_deref() == Some(EVENT_END)
            && e.fields.get("path") == Some(&path)
    });
    assert_eq!(ends, 1);
}

#[test]
fn test_default_config_is_unbounded() {
    let config = EngineConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.history_limit(), HistoryLimit::Unbounded);
}

#[test]
fn test_config_serializes_back_to_toml() {
    let config = EngineConfig::from_toml_str("history_limit = 3").unwrap();
    let rendered = toml::to_string(&config).unwrap();
    assert_eq!(EngineConfig::from_toml_str(&rendered).unwrap(), config);
}
