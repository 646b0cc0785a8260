//! Lock state and acquisition options.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a [`Lock`](super::Lock) instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// Record claimed by the constructor, not validated since.
    Acquired,
    /// The last `validate` found this instance still owning the record.
    Validated,
    /// The last `validate` failed; the lock must not be treated as held.
    Invalidated,
    /// Release sequence ran. Terminal.
    Released,
}

impl LockState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockState::Acquired => "acquired",
            LockState::Validated => "validated",
            LockState::Invalidated => "invalidated",
            LockState::Released => "released",
        }
    }

    /// Whether the instance may still be treated as the holder.
    pub fn is_held(&self) -> bool {
        matches!(self, LockState::Acquired | LockState::Validated)
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options accepted by [`Lock::acquire`](super::Lock::acquire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockOptions {
    /// Seconds after which an existing record counts as stale.
    pub time_to_live: u64,

    /// Whether a stale record may be deleted and replaced.
    #[serde(default)]
    pub destroy_previous_lock: bool,

    /// Explicit holder identity. Generated when absent or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<String>,
}

impl LockOptions {
    pub fn new(time_to_live: u64) -> Self {
        Self {
            time_to_live,
            destroy_previous_lock: false,
            process_id: None,
        }
    }

    pub fn with_destroy_previous_lock(mut self, destroy: bool) -> Self {
        self.destroy_previous_lock = destroy;
        self
    }

    pub fn with_process_id(mut self, process_id: impl Into<String>) -> Self {
        self.process_id = Some(process_id.into());
        self
    }

    /// The explicit identity, if one was given and is not empty.
    pub fn explicit_process_id(&self) -> Option<&str> {
        self.process_id.as_deref().filter(|id| !id.is_empty())
    }
}
