//! LockConfig struct definition.

use super::types::StorageConfig;
use crate::lock::LockOptions;
use serde::{Deserialize, Serialize};

/// Full configuration of one lock.
///
/// ```yaml
/// storage:
///   layer: filesystem
///   options:
///     path: /run/nightly-report.lock
///     mode: 0o644
/// time_to_live: 300
/// destroy_previous_lock: true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockConfig {
    /// Storage layer to keep the record in.
    #[serde(default)]
    pub storage: StorageConfig,

    /// TTL, reclaim policy and optional identity.
    #[serde(flatten)]
    pub lock: LockOptions,
}

impl LockConfig {
    pub fn new(storage: StorageConfig, lock: LockOptions) -> Self {
        Self { storage, lock }
    }
}
