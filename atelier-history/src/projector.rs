//! Artifact operation projection.
//!
//! Applies an explicit update or rewrite operation onto the latest version
//! of its target artifact, producing the successor version or a typed
//! failure. The input map is never modified; appending the result to the
//! history is the caller's move.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use atelier_core::{now_utc, ArtifactOperation, ArtifactVersion, VersionOrigin};

use crate::error::{ProjectionError, ProjectionResult};

/// Apply `op` against the latest versions, stamping the current time.
///
/// # Errors
///
/// - [`ProjectionError::ArtifactNotFound`] when the id has no history
/// - [`ProjectionError::ArtifactIncomplete`] when the latest version is
///   still streaming
/// - [`ProjectionError::StringNotFound`] when an update's `old_str` does
///   not occur exactly once, even after the trimmed fallback
pub fn apply(
    op: &ArtifactOperation,
    latest: &IndexMap<String, ArtifactVersion>,
) -> ProjectionResult<ArtifactVersion> {
    apply_at(op, latest, now_utc())
}

/// Apply `op` with an explicit logical timestamp.
///
/// Used by history replay, where the new version inherits the timestamp of
/// the message that carried the operation.
///
/// # Errors
///
/// Same as [`apply`].
pub fn apply_at(
    op: &ArtifactOperation,
    latest: &IndexMap<String, ArtifactVersion>,
    at: DateTime<Utc>,
) -> ProjectionResult<ArtifactVersion> {
    let id = op.artifact_id();
    let base = latest
        .get(id)
        .ok_or_else(|| ProjectionError::ArtifactNotFound { id: id.to_string() })?;
    if !base.is_complete {
        return Err(ProjectionError::ArtifactIncomplete {
            id: id.to_string(),
        });
    }

    match op {
        ArtifactOperation::Update {
            id,
            old_str,
            new_str,
        } => {
            let content = replace_single(&base.content, old_str, new_str)
                .ok_or_else(|| ProjectionError::StringNotFound { id: id.clone() })?;
            Ok(base.derive(content, VersionOrigin::Updated, at))
        }
        ArtifactOperation::Rewrite {
            content,
            kind,
            language,
            title,
            ..
        } => {
            let mut version = base.derive(content.clone(), VersionOrigin::Rewritten, at);
            if let Some(kind) = kind {
                version.kind = *kind;
            }
            if let Some(language) = language {
                version.language = Some(language.clone());
            }
            if let Some(title) = title {
                version.title = title.clone();
            }
            Ok(version)
        }
    }
}

/// Replace `old` with `new` when `old` occurs exactly once.
///
/// When `old` does not occur verbatim, falls back to the
/// whitespace-trimmed forms of both strings. Zero or multiple matches
/// yield `None`.
fn replace_single(content: &str, old: &str, new: &str) -> Option<String> {
    if old.is_empty() {
        return None;
    }
    match content.matches(old).count() {
        1 => Some(content.replacen(old, new, 1)),
        0 => {
            let old_trimmed = old.trim();
            if old_trimmed.is_empty() || old_trimmed == old {
                return None;
            }
            match content.matches(old_trimmed).count() {
                1 => Some(content.replacen(old_trimmed, new.trim(), 1)),
                _ => None,
            }
        }
        _ => None,
    }
}
