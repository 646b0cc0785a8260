//! Lock acquisition and scoped use.

use super::guard::Lock;
use super::identity::generate_process_id;
use super::types::LockOptions;
use crate::error::{LockError, Result};
use crate::storage::StorageLayer;
use chrono::Utc;

impl<S: StorageLayer> Lock<S> {
    /// Acquire the lock record behind `storage`.
    ///
    /// The steps are independent storage calls (existence check, age check,
    /// optional delete of a stale record, write). Two processes racing
    /// between those calls can both succeed; callers needing more than
    /// best-effort exclusion need a backend with its own atomicity.
    ///
    /// # Returns
    ///
    /// * `Ok(Lock)` - Record written with this instance's identity
    /// * `Err(LockError::ExistingLockValid)` - Record younger than the TTL
    /// * `Err(LockError::LockExists)` - Stale record, reclaiming not requested
    /// * `Err(LockError::CannotDestroyPrevious)` - Stale record could not be deleted
    /// * `Err(LockError::CannotCreate)` - Record could not be written
    /// * `Err(LockError::Storage)` - Existence check or age lookup failed
    pub fn acquire(storage: S, options: &LockOptions) -> Result<Self> {
        let process_id = options
            .explicit_process_id()
            .map(str::to_string)
            .unwrap_or_else(generate_process_id);
        let ttl_secs = options.time_to_live;

        if storage.exists()? {
            let modified = storage.get_modification_time()?;
            let age_secs = Utc::now().timestamp() - modified.timestamp();

            tracing::debug!(
                location = %storage.location(),
                age_secs,
                ttl_secs,
                "existing lock record found"
            );

            if age_secs < i64::try_from(ttl_secs).unwrap_or(i64::MAX) {
                return Err(LockError::ExistingLockValid { age_secs, ttl_secs });
            }
            if !options.destroy_previous_lock {
                return Err(LockError::LockExists { age_secs });
            }

            storage.delete().map_err(LockError::CannotDestroyPrevious)?;
            tracing::debug!(
                location = %storage.location(),
                age_secs,
                "stale lock record destroyed"
            );
        }

        storage.set(&process_id).map_err(LockError::CannotCreate)?;

        tracing::info!(
            process_id = %process_id,
            location = %storage.location(),
            ttl_secs,
            "lock acquired"
        );
        Ok(Lock::claimed(storage, process_id))
    }
}

/// Run `f` while holding the lock behind `storage`.
///
/// The release sequence runs on every exit of `f`: normal return, error, or
/// panic (through `Drop`). A release failure is returned when `f` succeeded;
/// when `f` failed, its error is returned and the release failure is logged.
///
/// ```no_run
/// use proclock::{FilesystemStorage, LockError, LockOptions, with_lock};
///
/// let storage = FilesystemStorage::with_path("/tmp/nightly-report.lock")?;
/// with_lock(&storage, &LockOptions::new(300), |lock| {
///     // ... long work ...
///     lock.update()?;
///     Ok::<(), LockError>(())
/// })?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn with_lock<S, T, E, F>(storage: S, options: &LockOptions, f: F) -> std::result::Result<T, E>
where
    S: StorageLayer,
    E: From<LockError>,
    F: FnOnce(&mut Lock<S>) -> std::result::Result<T, E>,
{
    let mut lock = Lock::acquire(storage, options)?;
    let outcome = f(&mut lock);
    let released = lock.release();

    match (outcome, released) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(release_error)) => {
            tracing::warn!(error = %release_error, "failed to release lock after error");
            Err(e)
        }
    }
}
