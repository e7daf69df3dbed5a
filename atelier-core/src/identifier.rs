//! ID generation utilities.
//!
//! Prefixed UUID v4 identifiers for messages and artifacts, plus timestamp
//! helpers used across the workspace.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a unique message ID.
///
/// Returns a UUID v4 string prefixed with "msg_".
///
/// # Example
///
/// ```rust
/// use atelier_core::identifier::generate_message_id;
///
/// let id = generate_message_id();
/// assert!(id.starts_with("msg_"));
/// ```
#[must_use]
pub fn generate_message_id() -> String {
    format!("msg_{}", Uuid::new_v4().simple())
}

/// Generate a unique artifact ID.
///
/// Returns a UUID v4 string prefixed with "artifact_". Models usually pick
/// their own human-readable ids; this is the fallback for callers that
/// create artifacts programmatically.
#[must_use]
pub fn generate_artifact_id() -> String {
    format!("artifact_{}", Uuid::new_v4().simple())
}

/// Get the current UTC timestamp.
#[must_use]
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}
