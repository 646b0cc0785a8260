//! Filesystem storage layer.
//!
//! The record is a single file: its content is the holder identity and its
//! modification time is the heartbeat. Correctness rests on the filesystem's
//! own guarantees for individual calls on one path; nothing here makes the
//! sequence of calls transactional.

use super::{StorageLayer, now_secs, truncate_to_secs};
use crate::error::{StorageAction, StorageError};
use crate::fs::atomic_write;
use chrono::{DateTime, TimeZone, Utc};
use filetime::FileTime;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default permission bits applied to the lock file.
pub const DEFAULT_MODE: u32 = 0o666;

/// Storage layer keeping the record in one file.
#[derive(Debug, Clone)]
pub struct FilesystemStorage {
    path: PathBuf,
    mode: u32,
}

impl FilesystemStorage {
    /// Create a storage layer for `path` applying `mode` after each write.
    ///
    /// # Returns
    ///
    /// * `Ok(FilesystemStorage)` - Valid configuration
    /// * `Err(StorageError::InvalidConfig)` - Empty path or mode outside `0o7777`
    pub fn new<P: Into<PathBuf>>(path: P, mode: u32) -> Result<Self, StorageError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(StorageError::InvalidConfig(
                "'path' option must not be empty".to_string(),
            ));
        }
        if mode > 0o7777 {
            return Err(StorageError::InvalidConfig(format!(
                "'mode' option {:#o} is not a permission value",
                mode
            )));
        }
        Ok(Self { path, mode })
    }

    /// Create a storage layer for `path` with [`DEFAULT_MODE`].
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Result<Self, StorageError> {
        Self::new(path, DEFAULT_MODE)
    }

    /// Build from an options bag.
    ///
    /// Recognized keys:
    /// - `path`: required, non-empty string
    /// - `mode`: optional unsigned integer (default `0o666`)
    pub fn from_options(options: &Value) -> Result<Self, StorageError> {
        let path = match options.get("path") {
            None | Some(Value::Null) => {
                return Err(StorageError::InvalidConfig(
                    "'path' option required".to_string(),
                ));
            }
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(StorageError::InvalidConfig(
                    "'path' option must be a string".to_string(),
                ));
            }
        };

        let mode = match options.get("mode") {
            None | Some(Value::Null) => DEFAULT_MODE,
            Some(value) => value
                .as_u64()
                .and_then(|m| u32::try_from(m).ok())
                .ok_or_else(|| {
                    StorageError::InvalidConfig("'mode' option must be an integer".to_string())
                })?,
        };

        Self::new(path, mode)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }

    fn io_error(&self, action: StorageAction, source: io::Error) -> StorageError {
        StorageError::io(action, self.location(), source)
    }

    #[cfg(unix)]
    fn apply_mode(&self) {
        use std::os::unix::fs::PermissionsExt;

        if let Err(e) = fs::set_permissions(&self.path, fs::Permissions::from_mode(self.mode)) {
            tracing::warn!(
                location = %self.path.display(),
                mode = %format!("{:#o}", self.mode),
                error = %e,
                "failed to apply lock file mode"
            );
        }
    }

    #[cfg(not(unix))]
    fn apply_mode(&self) {}
}

impl StorageLayer for FilesystemStorage {
    /// A location that cannot be examined counts as having no record, so
    /// the subsequent write is the call that reports the failure.
    fn exists(&self) -> Result<bool, StorageError> {
        match fs::metadata(&self.path) {
            Ok(_) => Ok(true),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::NotFound
                        | io::ErrorKind::NotADirectory
                        | io::ErrorKind::PermissionDenied
                ) =>
            {
                Ok(false)
            }
            Err(e) => Err(self.io_error(StorageAction::Check, e)),
        }
    }

    fn get(&self) -> Result<String, StorageError> {
        let bytes = fs::read(&self.path).map_err(|e| self.io_error(StorageAction::Read, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn set(&self, data: &str) -> Result<(), StorageError> {
        atomic_write(&self.path, data.as_bytes())
            .map_err(|e| self.io_error(StorageAction::Write, e))?;
        self.apply_mode();
        Ok(())
    }

    fn delete(&self) -> Result<(), StorageError> {
        fs::remove_file(&self.path).map_err(|e| self.io_error(StorageAction::Delete, e))
    }

    fn get_modification_time(&self) -> Result<DateTime<Utc>, StorageError> {
        let metadata = fs::metadata(&self.path)
            .map_err(|e| self.io_error(StorageAction::ReadModificationTime, e))?;
        let mtime = FileTime::from_last_modification_time(&metadata);

        Utc.timestamp_opt(mtime.unix_seconds(), 0)
            .single()
            .ok_or_else(|| {
                self.io_error(
                    StorageAction::ReadModificationTime,
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("timestamp {} out of range", mtime.unix_seconds()),
                    ),
                )
            })
    }

    fn update_modification_time(&self, time: Option<DateTime<Utc>>) -> Result<(), StorageError> {
        let time = time.map(truncate_to_secs).unwrap_or_else(now_secs);
        filetime::set_file_mtime(&self.path, FileTime::from_unix_time(time.timestamp(), 0))
            .map_err(|e| self.io_error(StorageAction::UpdateModificationTime, e))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
