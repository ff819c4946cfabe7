//! Tests for config functionality.

use crate::config::{DEFAULT_RUN_DIR, LockConfig};
use crate::identity::ProcessIdentity;
use std::ffi::OsStr;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = LockConfig::default();

    assert_eq!(config.lock_file, None);
    assert_eq!(config.run_dir, PathBuf::from("/var/run"));
    assert_eq!(config.max_age_secs, 1);
    assert!(config.killable);
    assert!(config.enabled);
    assert_eq!(config.executable_name, None);
    assert!(!config.exclusive_create);
    assert_eq!(config.trace_file, None);
}

#[test]
fn test_parse_minimal_yaml() {
    let config = LockConfig::from_yaml("").unwrap();
    assert_eq!(config, LockConfig::default());
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
lock_file: /tmp/custom.pid
max_age_secs: 999999999
killable: false
"#;
    let config = LockConfig::from_yaml(yaml).unwrap();

    assert_eq!(config.lock_file, Some(PathBuf::from("/tmp/custom.pid")));
    assert_eq!(config.max_age_secs, 999_999_999);
    assert!(!config.killable);

    // Unspecified values should use defaults
    assert!(config.enabled);
    assert_eq!(config.run_dir, PathBuf::from(DEFAULT_RUN_DIR));
}

#[test]
fn test_unknown_fields_ignored() {
    let yaml = r#"
max_age_secs: 30
heartbeat_interval: 5
"#;
    let config = LockConfig::from_yaml(yaml).unwrap();
    assert_eq!(config.max_age_secs, 30);
}

#[test]
fn test_invalid_yaml_is_user_error() {
    let result = LockConfig::from_yaml("max_age_secs: [not, a, number]");
    let err = result.unwrap_err();
    assert!(err.to_string().contains("failed to parse config YAML"));
    assert_eq!(err.exit_code(), crate::exit_codes::USER_ERROR);
}

#[test]
fn test_short_executable_name_rejected() {
    let result = LockConfig::from_yaml("executable_name: ab");
    assert!(result.unwrap_err().to_string().contains("executable_name"));
}

#[test]
fn test_executable_name_with_separator_rejected() {
    let result = LockConfig::from_yaml("executable_name: bin/app");
    assert!(result.unwrap_err().to_string().contains("path separator"));
}

#[test]
fn test_empty_lock_file_rejected() {
    let config = LockConfig {
        lock_file: Some(PathBuf::new()),
        ..LockConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_yaml_round_trip_keeps_values() {
    let config = LockConfig {
        lock_file: Some(PathBuf::from("/run/lock/app.pid")),
        killable: false,
        max_age_secs: 60,
        ..LockConfig::default()
    };
    let yaml = config.to_yaml().unwrap();
    assert_eq!(LockConfig::from_yaml(&yaml).unwrap(), config);
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("lock.yaml");
    std::fs::write(&path, "max_age_secs: 12\nexclusive_create: true\n").unwrap();

    let config = LockConfig::load(&path).unwrap();
    assert_eq!(config.max_age_secs, 12);
    assert!(config.exclusive_create);
}

#[test]
fn test_load_missing_file_fails() {
    let result = LockConfig::load("/nonexistent/pidlocker.yaml");
    assert!(result.unwrap_err().to_string().contains("failed to read config file"));
}

#[test]
fn test_default_lock_path_uses_executable_name() {
    let config = LockConfig::default();
    let identity = ProcessIdentity::from_argv0(Some(OsStr::new("/opt/bin/reporter")), 10);

    assert_eq!(
        config.lock_path(&identity),
        PathBuf::from("/var/run/reporter.pid")
    );
}

#[test]
fn test_explicit_lock_path_wins() {
    let config = LockConfig {
        lock_file: Some(PathBuf::from("/tmp/elsewhere.pid")),
        ..LockConfig::default()
    };
    let identity = ProcessIdentity::from_argv0(Some(OsStr::new("reporter")), 10);

    assert_eq!(
        config.lock_path(&identity),
        PathBuf::from("/tmp/elsewhere.pid")
    );
}

#[test]
fn test_name_override_applies_to_identity_and_path() {
    let config = LockConfig {
        executable_name: Some("nightly-sync".to_string()),
        run_dir: PathBuf::from("/run/user/1000"),
        ..LockConfig::default()
    };
    let identity = config.apply_identity(ProcessIdentity::from_argv0(None, 10));

    assert_eq!(identity.executable_name(), "nightly-sync");
    assert_eq!(
        config.lock_path(&identity),
        PathBuf::from("/run/user/1000/nightly-sync.pid")
    );
}
