//! Storage description used by the configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which storage layer to open, and with what options.
///
/// `options` is handed to the layer's constructor untouched, for example
/// `{ path: /run/app.lock, mode: 0o644 }` for the filesystem layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Registered layer name (case-insensitive).
    #[serde(default = "default_layer")]
    pub layer: String,

    /// Layer-specific options.
    #[serde(default = "default_options")]
    pub options: Value,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            layer: default_layer(),
            options: default_options(),
        }
    }
}

impl StorageConfig {
    /// Filesystem layer at `path` with the default mode.
    pub fn filesystem(path: impl Into<String>) -> Self {
        Self {
            layer: default_layer(),
            options: serde_json::json!({ "path": path.into() }),
        }
    }
}

pub fn default_layer() -> String {
    "filesystem".to_string()
}

pub fn default_options() -> Value {
    Value::Object(serde_json::Map::new())
}
