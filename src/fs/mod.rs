//! Filesystem utilities for proclock.
//!
//! Provides the atomic replace used by the filesystem storage layer so a
//! lock record is never observed half-written.

pub mod atomic;

pub use atomic::atomic_write;
