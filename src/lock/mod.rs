//! Lock lifecycle for proclock.
//!
//! A lock is a single record in a [`StorageLayer`](crate::storage::StorageLayer):
//! the holder's identity plus a modification time acting as heartbeat.
//!
//! # Lifecycle
//!
//! ```text
//! acquire ──> Acquired ──validate ok──> Validated
//!                │                          │
//!                │                    validate fails
//!                │                          v
//!                └────validate fails──> Invalidated
//!
//! any state ──release / drop──> Released
//! ```
//!
//! - **Acquire**: an existing record younger than the TTL blocks acquisition.
//!   An older (stale) one blocks it too unless `destroy_previous_lock` is
//!   set, in which case it is deleted and replaced.
//! - **Validate**: the record must exist and carry this instance's identity.
//! - **Update**: validate, then refresh the modification time.
//! - **Release**: validate, then delete. Runs from `Drop` when not called
//!   explicitly; [`with_lock`] gives the same guarantee with error reporting.
//!
//! There is no retry anywhere. Every failure goes straight to the caller.

mod guard;
mod identity;
mod operations;
mod types;


// Re-export public API
pub use guard::Lock;
pub use identity::generate_process_id;
pub use operations::with_lock;
pub use types::{LockOptions, LockState};
