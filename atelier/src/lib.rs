//! # atelier — streaming artifact extraction & versioning
//!
//! A chat client streams model output as arbitrary text chunks. Some of
//! that output is narrative prose; some of it is *artifacts* — named,
//! versioned content blocks (code, documents, diagrams) wrapped in a
//! lightweight tag syntax. atelier separates the two as the chunks arrive
//! and reconstructs a full version lineage per artifact across the whole
//! conversation, including artifacts that were cut off mid-stream and
//! resumed later.
//!
//! ## The pieces
//!
//! - [`atelier_core`]: the data model, tag scanning, and overlap-merge
//!   primitives
//! - [`atelier_streaming`]: the per-turn [`StreamingParser`]
//! - [`atelier_history`]: the [`VersionAggregator`] replay and the
//!   operation projector
//!
//! ## Quick Start
//!
//! ```rust
//! use atelier::prelude::*;
//!
//! // live side: feed chunks as they arrive
//! let mut parser = StreamingParser::new();
//! let out = parser.feed(r#"Sure! <artifact id="poem" title="Poem">Roses are red"#);
//! assert_eq!(out.text_delta, "Sure! ");
//! parser.feed("</artifact>");
//! let end = parser.finalize();
//! assert_eq!(end.resumable_artifact_id, None);
//!
//! // stored side: replay the conversation into version lineages
//! let messages = vec![ChatMessage::assistant(
//!     r#"Sure! <artifact id="poem" title="Poem">Roses are red</artifact>"#,
//! )];
//! let history = VersionAggregator::new().build_version_history(&messages, None);
//! assert_eq!(history["poem"][0].content, "Roses are red");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

// Flattened re-exports of the main surface
pub use atelier_core::{
    merge, ArtifactKind, ArtifactOperation, ArtifactVersion, ChatMessage, Role, Segment,
    TagConfig, VersionOrigin,
};
pub use atelier_history::{latest_of, ProjectionError, VersionAggregator, VersionHistory};
pub use atelier_streaming::{ArtifactStreamEvent, FeedOutput, FinalizeOutput, StreamingParser};

/// Prelude for common imports.
pub mod prelude {
    pub use atelier_core::{
        ArtifactKind, ArtifactOperation, ArtifactVersion, ChatMessage, Role, Segment, TagConfig,
        VersionOrigin,
    };
    pub use atelier_history::{latest_of, ProjectionError, VersionAggregator, VersionHistory};
    pub use atelier_streaming::{ArtifactStreamEvent, StreamingParser};
}
