//! Configuration model for proclock.
//!
//! A `LockConfig` names the storage layer and its options, plus the lock
//! options, and can be loaded from YAML. Unknown fields are ignored for
//! forward compatibility.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::LockConfig;
pub use types::StorageConfig;
