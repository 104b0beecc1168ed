//! Loading [`TrackerConfig`] from disk and from the environment.

use std::fs;

use harness_tracker::config::CONFIG_PATH_ENV;
use harness_tracker::{SweepOrder, TrackerConfig};
use serial_test::serial;
use tempfile::TempDir;

#[test]
fn load_from_reads_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tracker.toml");
    fs::write(&path, "cleanup_order = \"reverse\"\nvalidate_registry = true\n").unwrap();

    let config = TrackerConfig::load_from(&path).unwrap();

    assert_eq!(config.cleanup_order, SweepOrder::Reverse);
    assert!(config.validate_registry);
}

#[test]
fn load_from_partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tracker.toml");
    fs::write(&path, "validate_registry = true\n").unwrap();

    let config = TrackerConfig::load_from(&path).unwrap();

    assert_eq!(config.cleanup_order, SweepOrder::Initialization);
    assert!(config.validate_registry);
}

#[test]
fn load_from_invalid_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tracker.toml");
    fs::write(&path, "cleanup_order = [\n").unwrap();

    let err = TrackerConfig::load_from(&path).unwrap_err();
    let msg = format!("{err:#}");

    assert!(msg.contains("Failed to parse tracker config"));
    assert!(msg.contains("tracker.toml"));
}

#[test]
fn load_from_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();

    let err = TrackerConfig::load_from(&dir.path().join("absent.toml")).unwrap_err();

    assert!(err.to_string().contains("Failed to read tracker config"));
}

#[test]
#[serial]
fn load_uses_environment_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tracker.toml");
    fs::write(&path, "cleanup_order = \"reverse\"\n").unwrap();

    // SAFETY: serialized with the other tests touching this variable
    unsafe { std::env::set_var(CONFIG_PATH_ENV, &path) };
    let loaded = TrackerConfig::load();
    unsafe { std::env::remove_var(CONFIG_PATH_ENV) };

    assert_eq!(loaded.unwrap().cleanup_order, SweepOrder::Reverse);
}

#[test]
#[serial]
fn load_without_environment_uses_defaults() {
    // SAFETY: serialized with the other tests touching this variable
    unsafe { std::env::remove_var(CONFIG_PATH_ENV) };

    assert_eq!(TrackerConfig::load().unwrap(), TrackerConfig::default());
}
