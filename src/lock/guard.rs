//! The lock handle and its validation, heartbeat and release.

use super::types::LockState;
use crate::error::{LockError, Result};
use crate::storage::StorageLayer;
use chrono::{DateTime, Utc};
use std::fmt;

/// A held lock record.
///
/// Obtained through [`Lock::acquire`] or [`with_lock`](super::with_lock).
/// The storage handle `S` may be a reference, so the caller keeps ownership
/// of the backend itself.
///
/// When dropped without an explicit [`release`](Lock::release), the release
/// sequence runs anyway and a failure is logged as a warning. If the process
/// dies instead, the record is abandoned and the next acquirer reclaims it
/// once its TTL has passed.
pub struct Lock<S: StorageLayer> {
    storage: S,
    process_id: String,
    state: LockState,
}

impl<S: StorageLayer> Lock<S> {
    /// Wrap a record this process has just claimed.
    pub(super) fn claimed(storage: S, process_id: String) -> Self {
        Self {
            storage,
            process_id,
            state: LockState::Acquired,
        }
    }

    pub fn process_id(&self) -> &str {
        &self.process_id
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Check that the record still exists and still carries this identity.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - This instance still holds the lock
    /// * `Err(LockError::Destroyed)` - The record is gone
    /// * `Err(LockError::WrongProcessId)` - Another acquisition overwrote the record
    pub fn validate(&mut self) -> Result<()> {
        let outcome = self.check_record();
        self.state = match outcome {
            Ok(()) => LockState::Validated,
            Err(_) => LockState::Invalidated,
        };
        outcome
    }

    /// Refresh the record's modification time to now.
    ///
    /// Long-running holders call this more often than the TTL so other
    /// processes keep seeing the lock as valid.
    pub fn update(&mut self) -> Result<()> {
        self.heartbeat(None)
    }

    /// Set the record's modification time to `time`.
    pub fn update_to(&mut self, time: DateTime<Utc>) -> Result<()> {
        self.heartbeat(Some(time))
    }

    /// Release the lock, reporting failures.
    ///
    /// A record that was already destroyed or taken over is reported as
    /// such rather than ignored. The instance is released either way.
    pub fn release(mut self) -> Result<()> {
        self.release_record()
    }

    fn heartbeat(&mut self, time: Option<DateTime<Utc>>) -> Result<()> {
        self.validate()?;
        self.storage
            .update_modification_time(time)
            .map_err(LockError::CannotUpdate)?;

        tracing::debug!(
            process_id = %self.process_id,
            location = %self.storage.location(),
            "lock heartbeat written"
        );
        Ok(())
    }

    fn check_record(&self) -> Result<()> {
        if !self.storage.exists()? {
            return Err(LockError::Destroyed);
        }

        let found = self.storage.get()?;
        if found != self.process_id {
            return Err(LockError::WrongProcessId {
                found,
                expected: self.process_id.clone(),
            });
        }

        Ok(())
    }

    fn release_record(&mut self) -> Result<()> {
        let outcome = self
            .check_record()
            .and_then(|()| self.storage.delete().map_err(LockError::CannotDelete));
        self.state = LockState::Released;

        if outcome.is_ok() {
            tracing::info!(
                process_id = %self.process_id,
                location = %self.storage.location(),
                "lock released"
            );
        }
        outcome
    }
}

impl<S: StorageLayer> fmt::Debug for Lock<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lock")
            .field("process_id", &self.process_id)
            .field("state", &self.state)
            .field("location", &self.storage.location())
            .finish()
    }
}

impl<S: StorageLayer> Drop for Lock<S> {
    fn drop(&mut self) {
        if self.state != LockState::Released
            && let Err(e) = self.release_record()
        {
            tracing::warn!(
                process_id = %self.process_id,
                location = %self.storage.location(),
                error = %e,
                "failed to release lock"
            );
        }
    }
}
