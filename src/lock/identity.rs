//! Holder identity generation.
//!
//! Identities look like `user@HOST/4242/9f1c...` (owner, OS process id, a
//! UUID v4 in simple form). Only the 122 random bits of the UUID matter for
//! uniqueness: n identities collide with probability about n^2 / 2^123,
//! whatever the host and pid parts are. Those parts exist so a human reading
//! a lock file can tell who holds it.

use uuid::Uuid;

/// Generate a fresh holder identity.
pub fn generate_process_id() -> String {
    format!(
        "{}/{}/{}",
        owner_string(),
        std::process::id(),
        Uuid::new_v4().simple()
    )
}

/// Get the `user@HOST` owner string.
pub(crate) fn owner_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}
