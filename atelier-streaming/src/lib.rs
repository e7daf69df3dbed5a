//! # atelier-streaming
//!
//! Chunk-safe extraction of artifact blocks from streaming model output.
//!
//! A model turn arrives as an arbitrary sequence of text chunks; artifact
//! tag boundaries can fall anywhere inside a chunk, including mid-attribute
//! or mid-closing-marker. [`StreamingParser`] carries exactly enough state
//! across chunks to emit cleaned narrative text and artifact lifecycle
//! events without corrupting or duplicating either.
//!
//! ## Core Concepts
//!
//! - **[`StreamingParser`]**: one instance per in-flight turn —
//!   `feed` chunks, `finalize` at end-of-stream, `reset` before reuse
//! - **[`ArtifactStreamEvent`]**: started / content-delta / ended events
//! - **Holdback**: trailing text that might be the start of a marker is
//!   withheld until the next chunk decides what it is
//!
//! ## Example
//!
//! ```rust
//! use atelier_streaming::StreamingParser;
//!
//! let mut parser = StreamingParser::new();
//!
//! let out = parser.feed(r#"Sure! <artifact type="text/html" id="page">"#);
//! assert_eq!(out.text_delta, "Sure! ");
//!
//! parser.feed("<h1>Hi</h1>");
//! let out = parser.feed("</artifact> Anything else?");
//! assert_eq!(out.text_delta, " Anything else?");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod events;
pub mod parser;

// Re-exports
pub use events::{
    ArtifactDeltaEvent, ArtifactEndEvent, ArtifactStartEvent, ArtifactStreamEvent,
};
pub use parser::{FeedOutput, FinalizeOutput, StreamingParser};
