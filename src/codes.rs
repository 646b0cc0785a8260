//! Stable numeric codes for lock failures.
//!
//! These codes are part of the public contract and never change:
//! - 1: Cannot create lock
//! - 2: Cannot delete lock
//! - 3: Cannot destroy previous lock
//! - 4: Cannot update lock
//! - 5: Lock exists (stale, not reclaimed)
//! - 6: Lock destroyed
//! - 7: Lock contains wrong process id
//! - 8: Previous lock is still valid
//! - 9: Raw storage failure

use crate::error::LockErrorKind;

pub const CANNOT_CREATE: i32 = 1;
pub const CANNOT_DELETE: i32 = 2;
pub const CANNOT_DESTROY_PREVIOUS: i32 = 3;
pub const CANNOT_UPDATE: i32 = 4;
pub const LOCK_EXISTS: i32 = 5;
pub const DESTROYED: i32 = 6;
pub const WRONG_PROCESS_ID: i32 = 7;
pub const EXISTING_LOCK_VALID: i32 = 8;
pub const STORAGE: i32 = 9;

/// Maps an error kind to its code.
pub fn for_kind(kind: LockErrorKind) -> i32 {
    match kind {
        LockErrorKind::CannotCreate => CANNOT_CREATE,
        LockErrorKind::CannotDelete => CANNOT_DELETE,
        LockErrorKind::CannotDestroyPrevious => CANNOT_DESTROY_PREVIOUS,
        LockErrorKind::CannotUpdate => CANNOT_UPDATE,
        LockErrorKind::LockExists => LOCK_EXISTS,
        LockErrorKind::Destroyed => DESTROYED,
        LockErrorKind::WrongProcessId => WRONG_PROCESS_ID,
        LockErrorKind::ExistingLockValid => EXISTING_LOCK_VALID,
        LockErrorKind::Storage => STORAGE,
    }
}
