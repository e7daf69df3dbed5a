//! # atelier-history
//!
//! Version lineage reconstruction for atelier artifacts.
//!
//! A conversation is stored as a flat, ordered message list; this crate
//! replays it — plus the live streaming buffer, when a turn is in flight —
//! into one ordered version list per artifact id. Three mutation operators
//! fold into the same lineage: inline tag occurrences (created or
//! continued), explicit update operations (exact substring replacement),
//! and explicit rewrites.
//!
//! ## Core Concepts
//!
//! - **[`VersionAggregator`]**: pure, re-entrant replay —
//!   `build_version_history`, `segments_of`
//! - **[`latest_of`]**: the tail of every artifact's version list
//! - **[`projector`]**: applies explicit operations, returning a new
//!   version or a typed [`ProjectionError`]
//!
//! ## Example
//!
//! ```rust
//! use atelier_core::ChatMessage;
//! use atelier_history::{latest_of, VersionAggregator};
//!
//! let messages = vec![
//!     ChatMessage::assistant(r#"Here: <artifact id="list">milk</artifact>"#),
//!     ChatMessage::assistant(r#"Updated: <artifact id="list">milk, eggs</artifact>"#),
//! ];
//!
//! let history = VersionAggregator::new().build_version_history(&messages, None);
//! assert_eq!(history["list"].len(), 2);
//! assert_eq!(latest_of(&history)["list"].content, "milk, eggs");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod aggregator;
pub mod error;
pub mod projector;

// Re-exports
pub use aggregator::{latest_of, VersionAggregator, VersionHistory};
pub use error::{ProjectionError, ProjectionResult};
pub use projector::{apply, apply_at};
