//! In-process storage layer.
//!
//! Keeps the record in a `RefCell`, so it is confined to one thread. Useful
//! for tests and for coordinating lock holders inside a single program.

use super::{StorageLayer, now_secs, truncate_to_secs};
use crate::error::StorageError;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cell::RefCell;

#[derive(Debug, Clone)]
struct MemoryRecord {
    data: String,
    modified: DateTime<Utc>,
}

/// Storage layer holding the record in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    location: String,
    record: RefCell<Option<MemoryRecord>>,
}

impl MemoryStorage {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            record: RefCell::new(None),
        }
    }

    /// Build from an options bag. `location` is optional and must be a string.
    pub fn from_options(options: &Value) -> Result<Self, StorageError> {
        let location = match options.get("location") {
            None | Some(Value::Null) => "memory".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(StorageError::InvalidConfig(
                    "'location' option must be a string".to_string(),
                ));
            }
        };
        Ok(Self::new(location))
    }

    fn not_found(&self) -> StorageError {
        StorageError::NotFound {
            location: self.location.clone(),
        }
    }
}

impl StorageLayer for MemoryStorage {
    fn exists(&self) -> Result<bool, StorageError> {
        Ok(self.record.borrow().is_some())
    }

    fn get(&self) -> Result<String, StorageError> {
        self.record
            .borrow()
            .as_ref()
            .map(|r| r.data.clone())
            .ok_or_else(|| self.not_found())
    }

    fn set(&self, data: &str) -> Result<(), StorageError> {
        *self.record.borrow_mut() = Some(MemoryRecord {
            data: data.to_string(),
            modified: now_secs(),
        });
        Ok(())
    }

    fn delete(&self) -> Result<(), StorageError> {
        match self.record.borrow_mut().take() {
            Some(_) => Ok(()),
            None => Err(self.not_found()),
        }
    }

    fn get_modification_time(&self) -> Result<DateTime<Utc>, StorageError> {
        self.record
            .borrow()
            .as_ref()
            .map(|r| r.modified)
            .ok_or_else(|| self.not_found())
    }

    fn update_modification_time(&self, time: Option<DateTime<Utc>>) -> Result<(), StorageError> {
        let mut slot = self.record.borrow_mut();
        let record = slot.as_mut().ok_or_else(|| self.not_found())?;
        record.modified = time.map(truncate_to_secs).unwrap_or_else(now_secs);
        Ok(())
    }

    fn location(&self) -> String {
        self.location.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn empty_storage_reports_missing_record() {
        let storage = MemoryStorage::new("mem");
        assert!(!storage.exists().unwrap());
        assert!(matches!(storage.get(), Err(StorageError::NotFound { .. })));
        assert!(storage.get_modification_time().is_err());
        assert!(storage.delete().is_err());
        assert!(storage.update_modification_time(None).is_err());
    }

    #[test]
    fn common_functionality() {
        let storage = MemoryStorage::new("mem");
        storage.set("test").unwrap();
        assert!(storage.exists().unwrap());
        assert_eq!(storage.get().unwrap(), "test");

        let past = storage.get_modification_time().unwrap() - Duration::minutes(10);
        storage.update_modification_time(Some(past)).unwrap();
        assert_eq!(storage.get_modification_time().unwrap(), past);
        assert_eq!(storage.get().unwrap(), "test");

        storage.delete().unwrap();
        assert!(!storage.exists().unwrap());
    }

    #[test]
    fn options_are_validated() {
        let storage = MemoryStorage::from_options(&json!({"location": "slot-a"})).unwrap();
        assert_eq!(storage.location(), "slot-a");

        let storage = MemoryStorage::from_options(&json!({})).unwrap();
        assert_eq!(storage.location(), "memory");

        let err = MemoryStorage::from_options(&json!({"location": 5})).unwrap_err();
        assert!(err.to_string().contains("'location' option must be a string"));
    }
}
