//! # atelier-core
//!
//! Core types and pure primitives for the atelier artifact engine.
//!
//! This crate provides the foundations shared by the streaming parser and the
//! version history layer:
//!
//! - **Artifacts**: [`ArtifactVersion`], [`ArtifactKind`], [`VersionOrigin`],
//!   and [`Segment`] — the immutable data model
//! - **Messages**: [`ChatMessage`] and [`ArtifactOperation`] — the persisted
//!   conversation units replayed into version histories
//! - **Tag scanning**: [`TagConfig`], [`find_next_tag`] and friends — locating
//!   artifact markers in (possibly chunk-truncated) text
//! - **Overlap merging**: [`merge`] — splicing a continued artifact onto its
//!   prior content without duplicating resent text
//! - **Identifiers**: prefixed-UUID id generation and timestamp helpers
//!
//! ## Example
//!
//! ```rust
//! use atelier_core::{ArtifactKind, ChatMessage, TagConfig, find_next_tag};
//!
//! let config = TagConfig::default();
//! let text = r#"Here you go: <artifact type="text/html" id="page" title="Page">"#;
//!
//! let tag = find_next_tag(&config, text, 0).expect("complete opening tag");
//! assert_eq!(tag.id, "page");
//! assert_eq!(tag.kind, ArtifactKind::Html);
//!
//! let message = ChatMessage::assistant("Hello!");
//! assert!(message.artifact_ops.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod artifact;
pub mod identifier;
pub mod merge;
pub mod message;
pub mod tag;

// Re-exports for convenience
pub use artifact::{ArtifactKind, ArtifactVersion, Segment, VersionOrigin};
pub use identifier::{generate_artifact_id, generate_message_id, now_utc};
pub use merge::{looks_mid_statement, merge};
pub use message::{ArtifactOperation, ChatMessage, Role};
pub use tag::{
    find_closing_marker, find_next_tag, holdback_len, longest_trailing_partial_marker,
    TagAttributes, TagConfig, TagMatch,
};
