//! Error types for proclock.
//!
//! Uses thiserror for derive macros. Every lock failure carries a stable
//! [`LockErrorKind`] so callers branch on the kind, never on message text.

use crate::codes;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The storage operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageAction {
    Check,
    Read,
    Write,
    Delete,
    ReadModificationTime,
    UpdateModificationTime,
}

impl StorageAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageAction::Check => "check",
            StorageAction::Read => "read",
            StorageAction::Write => "write",
            StorageAction::Delete => "delete",
            StorageAction::ReadModificationTime => "read modification time of",
            StorageAction::UpdateModificationTime => "update modification time of",
        }
    }
}

impl fmt::Display for StorageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a storage layer.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The operation needs a record and there is none at the location.
    #[error("no record at '{location}'")]
    NotFound { location: String },

    /// An I/O call of the backend failed.
    #[error("cannot {action} record at '{location}': {source}")]
    Io {
        action: StorageAction,
        location: String,
        #[source]
        source: io::Error,
    },

    /// The backend was configured with invalid options.
    #[error("invalid storage configuration: {0}")]
    InvalidConfig(String),

    /// Free-form failure of a custom backend.
    #[error("{0}")]
    Backend(String),
}

impl StorageError {
    pub(crate) fn io(action: StorageAction, location: impl Into<String>, source: io::Error) -> Self {
        StorageError::Io {
            action,
            location: location.into(),
            source,
        }
    }
}

/// Programmatically matchable kind of a [`LockError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockErrorKind {
    ExistingLockValid,
    LockExists,
    CannotDestroyPrevious,
    CannotCreate,
    Destroyed,
    WrongProcessId,
    CannotUpdate,
    CannotDelete,
    Storage,
}

/// Failure of a lock lifecycle operation.
#[derive(Error, Debug)]
pub enum LockError {
    /// Another holder refreshed the record less than TTL seconds ago.
    #[error("previous lock is still valid (age {age_secs}s, ttl {ttl_secs}s)")]
    ExistingLockValid { age_secs: i64, ttl_secs: u64 },

    /// A stale record exists and reclaiming it was not requested.
    #[error("lock already exists (stale for {age_secs}s)")]
    LockExists { age_secs: i64 },

    #[error("cannot destroy previous lock: {0}")]
    CannotDestroyPrevious(#[source] StorageError),

    #[error("cannot create lock: {0}")]
    CannotCreate(#[source] StorageError),

    /// The record vanished while this instance believed it held it.
    #[error("lock destroyed")]
    Destroyed,

    /// The record was overwritten by another acquisition.
    #[error("lock contains wrong process id '{found}' instead of '{expected}'")]
    WrongProcessId { found: String, expected: String },

    #[error("cannot update lock: {0}")]
    CannotUpdate(#[source] StorageError),

    #[error("cannot delete lock: {0}")]
    CannotDelete(#[source] StorageError),

    /// A storage call the protocol does not wrap failed (existence check, read, stat).
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LockError {
    pub fn kind(&self) -> LockErrorKind {
        match self {
            LockError::ExistingLockValid { .. } => LockErrorKind::ExistingLockValid,
            LockError::LockExists { .. } => LockErrorKind::LockExists,
            LockError::CannotDestroyPrevious(_) => LockErrorKind::CannotDestroyPrevious,
            LockError::CannotCreate(_) => LockErrorKind::CannotCreate,
            LockError::Destroyed => LockErrorKind::Destroyed,
            LockError::WrongProcessId { .. } => LockErrorKind::WrongProcessId,
            LockError::CannotUpdate(_) => LockErrorKind::CannotUpdate,
            LockError::CannotDelete(_) => LockErrorKind::CannotDelete,
            LockError::Storage(_) => LockErrorKind::Storage,
        }
    }

    /// Returns the stable numeric code for this error.
    pub fn code(&self) -> i32 {
        codes::for_kind(self.kind())
    }
}

/// Failure while loading configuration or resolving a storage layer by name.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("config validation failed: {0}")]
    Invalid(String),

    #[error("invalid layer '{0}'")]
    InvalidLayerName(String),

    #[error("unknown layer '{0}'")]
    UnknownLayer(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type alias for lock operations.
pub type Result<T> = std::result::Result<T, LockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_process_id_message_names_both_identities() {
        let err = LockError::WrongProcessId {
            found: "wrong".to_string(),
            expected: "mine".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "lock contains wrong process id 'wrong' instead of 'mine'"
        );
        assert_eq!(err.kind(), LockErrorKind::WrongProcessId);
    }

    #[test]
    fn wrapped_storage_errors_keep_their_message() {
        let err = LockError::CannotCreate(StorageError::NotFound {
            location: "/tmp/x".to_string(),
        });
        assert_eq!(err.to_string(), "cannot create lock: no record at '/tmp/x'");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn io_error_message_names_action_and_location() {
        let err = StorageError::io(
            StorageAction::Delete,
            "/tmp/lock",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.to_string(), "cannot delete record at '/tmp/lock': gone");
    }

    #[test]
    fn raw_storage_errors_convert_transparently() {
        let err: LockError = StorageError::Backend("boom".to_string()).into();
        assert_eq!(err.kind(), LockErrorKind::Storage);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn codes_follow_kinds() {
        assert_eq!(LockError::Destroyed.code(), codes::DESTROYED);
        assert_eq!(
            LockError::LockExists { age_secs: 5 }.code(),
            codes::LOCK_EXISTS
        );
    }
}
