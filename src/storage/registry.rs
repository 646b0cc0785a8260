//! Storage layer lookup by name.
//!
//! Names map to constructor functions through an explicit allow-list. Names
//! are checked against a strict pattern first, so a configuration value can
//! never smuggle a path or module reference into the lookup.

use super::{FilesystemStorage, MemoryStorage, StorageLayer};
use crate::error::{ConfigError, StorageError};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Builds a storage layer from an options bag.
pub type StorageConstructor = fn(&Value) -> Result<Box<dyn StorageLayer>, StorageError>;

static LAYER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("valid layer name regex"));

/// Registry of known storage layers.
#[derive(Clone)]
pub struct StorageRegistry {
    constructors: BTreeMap<String, StorageConstructor>,
}

impl fmt::Debug for StorageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageRegistry")
            .field("layers", &self.names())
            .finish()
    }
}

impl Default for StorageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageRegistry {
    /// Registry preloaded with the `filesystem` and `memory` layers.
    pub fn new() -> Self {
        let mut constructors: BTreeMap<String, StorageConstructor> = BTreeMap::new();
        constructors.insert("filesystem".to_string(), open_filesystem);
        constructors.insert("memory".to_string(), open_memory);
        Self { constructors }
    }

    /// Registry with no layers at all.
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Register a custom layer, replacing any layer of the same name.
    pub fn register(
        &mut self,
        name: &str,
        constructor: StorageConstructor,
    ) -> Result<(), ConfigError> {
        let key = normalize(name)?;
        self.constructors.insert(key, constructor);
        Ok(())
    }

    /// Instantiate the layer registered under `name`.
    ///
    /// # Returns
    ///
    /// * `Ok(Box<dyn StorageLayer>)` - Layer built from `options`
    /// * `Err(ConfigError::InvalidLayerName)` - Name fails the name pattern
    /// * `Err(ConfigError::UnknownLayer)` - Name is not registered
    /// * `Err(ConfigError::Storage)` - The layer rejected its options
    pub fn open(&self, name: &str, options: &Value) -> Result<Box<dyn StorageLayer>, ConfigError> {
        let key = normalize(name)?;
        let constructor = self
            .constructors
            .get(&key)
            .ok_or_else(|| ConfigError::UnknownLayer(name.to_string()))?;

        tracing::debug!(layer = %key, "opening storage layer");
        Ok(constructor(options)?)
    }

    pub fn contains(&self, name: &str) -> bool {
        normalize(name).is_ok_and(|key| self.constructors.contains_key(&key))
    }

    /// Registered layer names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }
}

fn open_filesystem(options: &Value) -> Result<Box<dyn StorageLayer>, StorageError> {
    Ok(Box::new(FilesystemStorage::from_options(options)?))
}

fn open_memory(options: &Value) -> Result<Box<dyn StorageLayer>, StorageError> {
    Ok(Box::new(MemoryStorage::from_options(options)?))
}

fn normalize(name: &str) -> Result<String, ConfigError> {
    if !LAYER_NAME.is_match(name) {
        return Err(ConfigError::InvalidLayerName(name.to_string()));
    }
    Ok(name.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn open_custom(_: &Value) -> Result<Box<dyn StorageLayer>, StorageError> {
        Ok(Box::new(MemoryStorage::new("custom-slot")))
    }

    #[test]
    fn invalid_layer_name_is_rejected() {
        let registry = StorageRegistry::new();
        let err = registry.open("../Layer", &json!({})).err().unwrap();
        assert!(matches!(err, ConfigError::InvalidLayerName(_)));
        assert!(err.to_string().starts_with("invalid layer"));
    }

    #[test]
    fn builtin_layer_is_resolved_case_insensitively() {
        let registry = StorageRegistry::new();
        let layer = registry
            .open("Filesystem", &json!({"path": "/tmp/proclock-test.lock"}))
            .unwrap();
        assert_eq!(layer.location(), "/tmp/proclock-test.lock");
    }

    #[test]
    fn unknown_layer_is_rejected() {
        let registry = StorageRegistry::new();
        let err = registry.open("Unknown", &json!({})).err().unwrap();
        assert!(matches!(err, ConfigError::UnknownLayer(ref name) if name == "Unknown"));
    }

    #[test]
    fn layer_option_errors_surface() {
        let registry = StorageRegistry::new();
        let err = registry.open("filesystem", &json!({})).err().unwrap();
        assert!(matches!(
            err,
            ConfigError::Storage(StorageError::InvalidConfig(_))
        ));
    }

    #[test]
    fn custom_layer_can_be_registered() {
        let mut registry = StorageRegistry::empty();
        assert!(!registry.contains("custom"));

        registry.register("Custom", open_custom).unwrap();

        assert!(registry.contains("custom"));
        let layer = registry.open("custom", &Value::Null).unwrap();
        assert_eq!(layer.location(), "custom-slot");
        assert_eq!(registry.names(), vec!["custom"]);
    }

    #[test]
    fn custom_layer_name_is_validated() {
        let mut registry = StorageRegistry::empty();
        let err = registry.register("\\vendor\\Layer", open_custom).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLayerName(_)));
    }

    #[test]
    fn default_names() {
        assert_eq!(StorageRegistry::new().names(), vec!["filesystem", "memory"]);
    }
}
