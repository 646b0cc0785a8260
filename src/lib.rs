//! Proclock: cooperative, time-bounded process locks.
//!
//! Independent processes coordinate exclusive access to a resource (typically
//! "only one instance of this program may run") through a single lock record
//! kept in a pluggable storage layer. The reference layer is a file whose
//! content is the holder identity and whose modification time is the
//! heartbeat.
//!
//! ```no_run
//! use proclock::{FilesystemStorage, Lock, LockOptions};
//!
//! let storage = FilesystemStorage::with_path("/tmp/nightly-report.lock")?;
//! let mut lock = Lock::acquire(&storage, &LockOptions::new(300))?;
//! // ... work, calling lock.update() more often than every 300s ...
//! lock.update()?;
//! lock.release()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! This is best-effort exclusion, not consensus: acquisition is a sequence of
//! independent storage calls and two processes racing through it can both
//! win. Staleness (age at or beyond the TTL) is the only crash-recovery
//! signal.

pub mod codes;
pub mod config;
pub mod error;
pub mod fs;
pub mod lock;
pub mod storage;

pub use config::{LockConfig, StorageConfig};
pub use error::{ConfigError, LockError, LockErrorKind, Result, StorageError};
pub use lock::{Lock, LockOptions, LockState, with_lock};
pub use storage::{FilesystemStorage, MemoryStorage, StorageLayer, StorageRegistry};
