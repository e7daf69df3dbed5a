//! Artifact lifecycle events.
//!
//! The streaming parser reports artifact activity as a sequence of typed
//! events so the consumer can render in-progress content without waiting for
//! the closing delimiter.

use serde::{Deserialize, Serialize};

use atelier_core::ArtifactKind;

/// Event emitted while streaming a model turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_kind", rename_all = "snake_case")]
pub enum ArtifactStreamEvent {
    /// An opening tag was resolved.
    ArtifactStart(ArtifactStartEvent),
    /// Partial content for the open artifact.
    ArtifactDelta(ArtifactDeltaEvent),
    /// The open artifact ended — completed, or interrupted at end of stream.
    ArtifactEnd(ArtifactEndEvent),
}

impl ArtifactStreamEvent {
    /// Create a start event.
    #[must_use]
    pub fn started(
        id: impl Into<String>,
        kind: ArtifactKind,
        language: Option<String>,
        title: impl Into<String>,
        continued: bool,
    ) -> Self {
        Self::ArtifactStart(ArtifactStartEvent {
            id: id.into(),
            kind,
            language,
            title: title.into(),
            continued,
        })
    }

    /// Create a content-delta event.
    #[must_use]
    pub fn content_delta(id: impl Into<String>, delta: impl Into<String>) -> Self {
        Self::ArtifactDelta(ArtifactDeltaEvent {
            id: id.into(),
            delta: delta.into(),
        })
    }

    /// Create an end event for a completed artifact.
    #[must_use]
    pub fn completed(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ArtifactEnd(ArtifactEndEvent {
            id: id.into(),
            content: content.into(),
            is_complete: true,
        })
    }

    /// Create an end event for an artifact cut off at end of stream.
    #[must_use]
    pub fn interrupted(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ArtifactEnd(ArtifactEndEvent {
            id: id.into(),
            content: content.into(),
            is_complete: false,
        })
    }

    /// The id of the artifact this event concerns.
    #[must_use]
    pub fn artifact_id(&self) -> &str {
        match self {
            Self::ArtifactStart(e) => &e.id,
            Self::ArtifactDelta(e) => &e.id,
            Self::ArtifactEnd(e) => &e.id,
        }
    }

    /// Check if this is a start event.
    #[must_use]
    pub fn is_start(&self) -> bool {
        matches!(self, Self::ArtifactStart(_))
    }

    /// Check if this is a delta event.
    #[must_use]
    pub fn is_delta(&self) -> bool {
        matches!(self, Self::ArtifactDelta(_))
    }

    /// Check if this is an end event.
    #[must_use]
    pub fn is_end(&self) -> bool {
        matches!(self, Self::ArtifactEnd(_))
    }
}

/// An opening tag was resolved and an artifact is now streaming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactStartEvent {
    /// Artifact identifier.
    pub id: String,
    /// Content kind from the `type` attribute.
    pub kind: ArtifactKind,
    /// Optional language hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Display title.
    pub title: String,
    /// Whether the tag resumes a previously incomplete artifact.
    pub continued: bool,
}

/// Partial content for the currently open artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDeltaEvent {
    /// Artifact identifier.
    pub id: String,
    /// Raw content fragment, exactly as streamed.
    pub delta: String,
}

/// The open artifact ended.
///
/// `content` is the full accumulated content — for a continuation, already
/// merged with the prior incomplete version's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactEndEvent {
    /// Artifact identifier.
    pub id: String,
    /// Full content of this occurrence.
    pub content: String,
    /// False when the stream ended before the closing delimiter.
    pub is_complete: bool,
}
