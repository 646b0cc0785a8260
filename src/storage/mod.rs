//! Storage layer contract for lock records.
//!
//! A storage layer keeps exactly one lock record at a configured location:
//! the holder's identity string plus a modification timestamp. The lock
//! protocol only ever talks to a backend through [`StorageLayer`], so any
//! backend honoring the contract (file, key-value store, database row,
//! in-process cell) is interchangeable.
//!
//! # Contract
//!
//! - Every call either applies its whole effect or fails with a
//!   [`StorageError`]; no call silently does nothing.
//! - Timestamps have whole-second resolution.
//! - Atomicity across calls is NOT provided. Whatever a single backend call
//!   guarantees is all the lock protocol gets.

mod filesystem;
mod memory;
mod registry;

pub use crate::error::StorageAction;
pub use filesystem::{DEFAULT_MODE, FilesystemStorage};
pub use memory::MemoryStorage;
pub use registry::{StorageConstructor, StorageRegistry};

use crate::error::StorageError;
use chrono::{DateTime, TimeZone, Utc};

/// Capability set a lock backend must implement.
pub trait StorageLayer {
    /// Returns true iff a record currently exists.
    fn exists(&self) -> Result<bool, StorageError>;

    /// Returns the stored identity.
    ///
    /// Fails if no record exists or the read fails.
    fn get(&self) -> Result<String, StorageError>;

    /// Writes `data` as the record content, creating the record if absent.
    ///
    /// The modification time becomes "now".
    fn set(&self, data: &str) -> Result<(), StorageError>;

    /// Removes the record. Fails if there is none.
    fn delete(&self) -> Result<(), StorageError>;

    /// Returns the record's last modification time.
    fn get_modification_time(&self) -> Result<DateTime<Utc>, StorageError>;

    /// Sets the modification time to `time`, or to now when `None`, without
    /// touching the content. Fails if there is no record.
    fn update_modification_time(&self, time: Option<DateTime<Utc>>) -> Result<(), StorageError>;

    /// Human-readable location used in log fields and messages.
    fn location(&self) -> String;
}

impl<T: StorageLayer + ?Sized> StorageLayer for &T {
    fn exists(&self) -> Result<bool, StorageError> {
        (**self).exists()
    }

    fn get(&self) -> Result<String, StorageError> {
        (**self).get()
    }

    fn set(&self, data: &str) -> Result<(), StorageError> {
        (**self).set(data)
    }

    fn delete(&self) -> Result<(), StorageError> {
        (**self).delete()
    }

    fn get_modification_time(&self) -> Result<DateTime<Utc>, StorageError> {
        (**self).get_modification_time()
    }

    fn update_modification_time(&self, time: Option<DateTime<Utc>>) -> Result<(), StorageError> {
        (**self).update_modification_time(time)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

impl<T: StorageLayer + ?Sized> StorageLayer for Box<T> {
    fn exists(&self) -> Result<bool, StorageError> {
        (**self).exists()
    }

    fn get(&self) -> Result<String, StorageError> {
        (**self).get()
    }

    fn set(&self, data: &str) -> Result<(), StorageError> {
        (**self).set(data)
    }

    fn delete(&self) -> Result<(), StorageError> {
        (**self).delete()
    }

    fn get_modification_time(&self) -> Result<DateTime<Utc>, StorageError> {
        (**self).get_modification_time()
    }

    fn update_modification_time(&self, time: Option<DateTime<Utc>>) -> Result<(), StorageError> {
        (**self).update_modification_time(time)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

/// Current time truncated to whole seconds.
pub(crate) fn now_secs() -> DateTime<Utc> {
    truncate_to_secs(Utc::now())
}

/// Drops the sub-second part of a timestamp.
pub(crate) fn truncate_to_secs(time: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_opt(time.timestamp(), 0)
        .single()
        .unwrap_or(time)
}
