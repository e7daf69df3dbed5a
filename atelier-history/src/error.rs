//! Projection errors.

use thiserror::Error;

/// Typed failures when projecting an artifact operation.
///
/// These are local, recoverable results — the caller renders them (or lets
/// the model retry); nothing here aborts a turn, and a failed projection
/// leaves the version history untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// The operation referenced an id with no version history.
    #[error("artifact `{id}` not found")]
    ArtifactNotFound {
        /// The unknown artifact id.
        id: String,
    },

    /// The latest version is still streaming; operations need a complete
    /// base to derive from.
    #[error("artifact `{id}` is still streaming and cannot be modified")]
    ArtifactIncomplete {
        /// The artifact id.
        id: String,
    },

    /// `old_str` was not found exactly once, even after the trimmed
    /// fallback.
    #[error("text to replace not found in artifact `{id}`")]
    StringNotFound {
        /// The artifact id.
        id: String,
    },
}

/// Result type for projection operations.
pub type ProjectionResult<T> = Result<T, ProjectionError>;
