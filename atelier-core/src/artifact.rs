//! Artifact data model.
//!
//! An artifact is a named, versioned content block (code, document, diagram)
//! distinct from the narrative text around it. Versions are immutable
//! snapshots: every mutation — streaming completion, continuation, update,
//! rewrite — appends a new [`ArtifactVersion`] rather than editing an old one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content type of an artifact.
///
/// Parsed from the `type` attribute of an opening tag. Unknown values fall
/// back to [`ArtifactKind::PlainText`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Source code in some programming language.
    Code,
    /// Markdown document.
    Markdown,
    /// Standalone HTML page.
    Html,
    /// SVG image.
    Svg,
    /// Diagram source (e.g. Mermaid).
    Diagram,
    /// Renderable UI component.
    Component,
    /// Plain text. The default when no `type` attribute is present.
    PlainText,
}

impl ArtifactKind {
    /// Parse a `type` attribute value.
    ///
    /// Accepts both the MIME-style values the wire protocol uses and bare
    /// shorthand names. Anything unrecognized is plain text.
    #[must_use]
    pub fn from_type_attr(value: &str) -> Self {
        match value.trim() {
            "application/vnd.ant.code" | "code" => Self::Code,
            "text/markdown" | "markdown" => Self::Markdown,
            "text/html" | "html" => Self::Html,
            "image/svg+xml" | "svg" => Self::Svg,
            "application/vnd.ant.mermaid" | "mermaid" | "diagram" => Self::Diagram,
            "application/vnd.ant.react" | "react" | "component" => Self::Component,
            _ => Self::PlainText,
        }
    }

    /// Canonical `type` attribute value for this kind.
    #[must_use]
    pub fn as_type_attr(&self) -> &'static str {
        match self {
            Self::Code => "application/vnd.ant.code",
            Self::Markdown => "text/markdown",
            Self::Html => "text/html",
            Self::Svg => "image/svg+xml",
            Self::Diagram => "application/vnd.ant.mermaid",
            Self::Component => "application/vnd.ant.react",
            Self::PlainText => "text/plain",
        }
    }
}

impl Default for ArtifactKind {
    fn default() -> Self {
        Self::PlainText
    }
}

/// How a version came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionOrigin {
    /// A fresh opening tag introduced this artifact version.
    Created,
    /// A `continue="true"` tag resumed a previously incomplete version.
    Continued,
    /// An explicit update operation (exact substring replacement).
    Updated,
    /// An explicit rewrite operation (full content replacement).
    Rewritten,
}

/// Immutable snapshot of one artifact version.
///
/// Version numbers for a given id form a contiguous run starting at 1. At
/// most one version per id may be incomplete, and it is always the
/// highest-numbered one — an in-flight stream that has not yet seen its
/// closing marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactVersion {
    /// Identifier, stable across all versions of the same artifact.
    pub id: String,
    /// Content type.
    pub kind: ArtifactKind,
    /// Optional free-form language hint (for code artifacts).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Display label.
    pub title: String,
    /// Full text of this version, not a diff.
    pub content: String,
    /// 1-based, strictly increasing per id.
    pub version_number: u32,
    /// Logical ordering key. `version_number` is the ordering authority;
    /// this records when the source message was produced.
    pub created_at: DateTime<Utc>,
    /// False only while the closing delimiter has not been seen.
    pub is_complete: bool,
    /// How this version came to exist.
    pub origin: VersionOrigin,
}

/// Default title for artifacts whose opening tag carries none.
pub const DEFAULT_TITLE: &str = "Untitled";

impl ArtifactVersion {
    /// Create a complete version 1 with defaults for the optional fields.
    #[must_use]
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ArtifactKind::default(),
            language: None,
            title: DEFAULT_TITLE.to_string(),
            content: content.into(),
            version_number: 1,
            created_at: crate::identifier::now_utc(),
            is_complete: true,
            origin: VersionOrigin::Created,
        }
    }

    /// Set the content kind.
    #[must_use]
    pub fn with_kind(mut self, kind: ArtifactKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the language hint.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the display title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the version number.
    #[must_use]
    pub fn with_version_number(mut self, version_number: u32) -> Self {
        self.version_number = version_number;
        self
    }

    /// Set the logical timestamp.
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Mark the version as incomplete (closing delimiter not yet seen).
    #[must_use]
    pub fn incomplete(mut self) -> Self {
        self.is_complete = false;
        self
    }

    /// Set the origin.
    #[must_use]
    pub fn with_origin(mut self, origin: VersionOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Derive the successor version with new content.
    ///
    /// Copies identity and metadata, bumps the version number, and is always
    /// complete — derivation is only legal from a complete base.
    #[must_use]
    pub fn derive(
        &self,
        content: impl Into<String>,
        origin: VersionOrigin,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: self.id.clone(),
            kind: self.kind,
            language: self.language.clone(),
            title: self.title.clone(),
            content: content.into(),
            version_number: self.version_number + 1,
            created_at,
            is_complete: true,
            origin,
        }
    }
}

/// A parse-result unit over a span of message text.
///
/// Segments are transient view objects recomputed from message history plus
/// live stream state; they carry no identity of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// Narrative text between artifacts.
    Text {
        /// The text span, verbatim.
        content: String,
    },
    /// A reference to an artifact occurring at this position.
    ArtifactRef {
        /// Artifact identifier.
        id: String,
        /// Whether the occurrence had its closing delimiter.
        is_complete: bool,
    },
}

impl Segment {
    /// Create a text segment.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Create an artifact reference segment.
    #[must_use]
    pub fn artifact_ref(id: impl Into<String>, is_complete: bool) -> Self {
        Self::ArtifactRef {
            id: id.into(),
            is_complete,
        }
    }

    /// Check if this is a text segment.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }

    /// Check if this is an artifact reference.
    #[must_use]
    pub fn is_artifact_ref(&self) -> bool {
        matches!(self, Self::ArtifactRef { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_from_type_attr() {
        assert_eq!(
            ArtifactKind::from_type_attr("application/vnd.ant.code"),
            ArtifactKind::Code
        );
        assert_eq!(ArtifactKind::from_type_attr("text/markdown"), ArtifactKind::Markdown);
        assert_eq!(ArtifactKind::from_type_attr("image/svg+xml"), ArtifactKind::Svg);
        assert_eq!(ArtifactKind::from_type_attr("text/plain"), ArtifactKind::PlainText);
        // Unknown values fall back to plain text
        assert_eq!(
            ArtifactKind::from_type_attr("application/x-custom"),
            ArtifactKind::PlainText
        );
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            ArtifactKind::Code,
            ArtifactKind::Markdown,
            ArtifactKind::Html,
            ArtifactKind::Svg,
            ArtifactKind::Diagram,
            ArtifactKind::Component,
        ] {
            assert_eq!(ArtifactKind::from_type_attr(kind.as_type_attr()), kind);
        }
    }

    #[test]
    fn test_version_builder() {
        let version = ArtifactVersion::new("snake", "print('hi')")
            .with_kind(ArtifactKind::Code)
            .with_language("python")
            .with_title("Snake Game")
            .with_version_number(3)
            .with_origin(VersionOrigin::Updated);

        assert_eq!(version.id, "snake");
        assert_eq!(version.version_number, 3);
        assert_eq!(version.language.as_deref(), Some("python"));
        assert!(version.is_complete);
    }

    #[test]
    fn test_derive_bumps_version_and_completes() {
        let base = ArtifactVersion::new("a", "one").with_version_number(2);
        let next = base.derive("two", VersionOrigin::Rewritten, base.created_at);

        assert_eq!(next.version_number, 3);
        assert_eq!(next.content, "two");
        assert_eq!(next.origin, VersionOrigin::Rewritten);
        assert!(next.is_complete);
        assert_eq!(next.title, base.title);
    }

    #[test]
    fn test_incomplete_marker() {
        let version = ArtifactVersion::new("a", "partial").incomplete();
        assert!(!version.is_complete);
    }

    #[test]
    fn test_segment_predicates() {
        let text = Segment::text("hello");
        assert!(text.is_text());
        assert!(!text.is_artifact_ref());

        let artifact = Segment::artifact_ref("a", false);
        assert!(artifact.is_artifact_ref());
    }

    #[test]
    fn test_version_serde_roundtrip() {
        let version = ArtifactVersion::new("doc", "# Title")
            .with_kind(ArtifactKind::Markdown)
            .incomplete();
        let json = serde_json::to_string(&version).unwrap();
        let parsed: ArtifactVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(version, parsed);
    }
}
