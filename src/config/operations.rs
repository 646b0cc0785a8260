//! Config loading, validation, and storage resolution.

use super::model::LockConfig;
use crate::error::ConfigError;
use crate::storage::{StorageLayer, StorageRegistry};
use std::path::Path;

impl LockConfig {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(LockConfig)` - Successfully loaded and validated config
    /// * `Err(ConfigError::Read)` - The file could not be read
    /// * `Err(ConfigError::Parse)` / `Err(ConfigError::Invalid)` - Bad content
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: LockConfig = serde_yaml::from_str(yaml)?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `time_to_live` must be positive
    /// - `storage.layer` must be non-empty
    /// - `storage.options` must be a mapping
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lock.time_to_live == 0 {
            return Err(ConfigError::Invalid(
                "time_to_live must be greater than 0".to_string(),
            ));
        }

        if self.storage.layer.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.layer must be non-empty".to_string(),
            ));
        }

        if !self.storage.options.is_object() {
            return Err(ConfigError::Invalid(
                "storage.options must be a mapping".to_string(),
            ));
        }

        Ok(())
    }

    /// Open the configured storage layer through `registry`.
    pub fn open_storage(
        &self,
        registry: &StorageRegistry,
    ) -> Result<Box<dyn StorageLayer>, ConfigError> {
        registry.open(&self.storage.layer, &self.storage.options)
    }
}
