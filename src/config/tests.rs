//! Tests for config functionality.

use crate::config::{LockConfig, StorageConfig};
use crate::error::ConfigError;
use crate::lock::{Lock, LockOptions};
use crate::storage::{StorageLayer, StorageRegistry};
use tempfile::TempDir;

#[test]
fn test_parse_minimal_yaml() {
    let config = LockConfig::from_yaml("time_to_live: 30").unwrap();

    assert_eq!(config.lock.time_to_live, 30);
    assert!(!config.lock.destroy_previous_lock);
    assert_eq!(config.lock.process_id, None);
    assert_eq!(config.storage.layer, "filesystem");
    assert!(config.storage.options.as_object().unwrap().is_empty());
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
storage:
  layer: Filesystem
  options:
    path: /run/app.lock
    mode: 0o644
time_to_live: 300
destroy_previous_lock: true
process_id: worker-1
"#;
    let config = LockConfig::from_yaml(yaml).unwrap();

    assert_eq!(config.storage.layer, "Filesystem");
    assert_eq!(config.storage.options["path"], "/run/app.lock");
    assert_eq!(config.storage.options["mode"], 0o644);
    assert_eq!(
        config.lock,
        LockOptions::new(300)
            .with_destroy_previous_lock(true)
            .with_process_id("worker-1")
    );
}

#[test]
fn test_unknown_fields_are_ignored() {
    let yaml = r#"
time_to_live: 10
future_option: true
"#;
    let config = LockConfig::from_yaml(yaml).unwrap();
    assert_eq!(config.lock.time_to_live, 10);
}

#[test]
fn test_missing_ttl_is_rejected() {
    let err = LockConfig::from_yaml("destroy_previous_lock: true").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_zero_ttl_is_rejected() {
    let err = LockConfig::from_yaml("time_to_live: 0").unwrap_err();
    assert_eq!(
        err.to_string(),
        "config validation failed: time_to_live must be greater than 0"
    );
}

#[test]
fn test_empty_layer_is_rejected() {
    let yaml = r#"
time_to_live: 5
storage:
  layer: ""
"#;
    let err = LockConfig::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_non_mapping_options_are_rejected() {
    let yaml = r#"
time_to_live: 5
storage:
  options: [1, 2]
"#;
    let err = LockConfig::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("storage.options must be a mapping"));
}

#[test]
fn test_yaml_roundtrip_keeps_lock_options() {
    let config = LockConfig::new(
        StorageConfig::filesystem("/tmp/app.lock"),
        LockOptions::new(12).with_destroy_previous_lock(true),
    );

    let parsed = LockConfig::from_yaml(&config.to_yaml().unwrap()).unwrap();

    assert_eq!(parsed, config);
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = LockConfig::load(temp_dir.path().join("missing.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().starts_with("failed to read config file"));
}

#[test]
fn test_load_and_acquire_through_registry() {
    let temp_dir = TempDir::new().unwrap();
    let lock_path = temp_dir.path().join("app.lock");
    let config_path = temp_dir.path().join("lock.yaml");
    let config = LockConfig::new(
        StorageConfig::filesystem(lock_path.to_string_lossy()),
        LockOptions::new(60).with_process_id("from-config"),
    );
    std::fs::write(&config_path, config.to_yaml().unwrap()).unwrap();

    let loaded = LockConfig::load(&config_path).unwrap();
    let storage = loaded.open_storage(&StorageRegistry::new()).unwrap();
    let lock = Lock::acquire(&storage, &loaded.lock).unwrap();

    assert_eq!(std::fs::read_to_string(&lock_path).unwrap(), "from-config");
    assert_eq!(storage.get().unwrap(), "from-config");
    lock.release().unwrap();
    assert!(!lock_path.exists());
}

#[test]
fn test_unknown_layer_in_config() {
    let config = LockConfig::from_yaml("time_to_live: 5\nstorage:\n  layer: redis\n").unwrap();
    let err = config.open_storage(&StorageRegistry::new()).err().unwrap();
    assert!(matches!(err, ConfigError::UnknownLayer(_)));
}
