//! The streaming artifact parser.
//!
//! One [`StreamingParser`] instance serves one in-flight model turn. Chunks
//! are fed strictly in arrival order; the parser separates narrative text
//! from artifact content no matter where the chunk boundaries fall —
//! including splits inside attribute values and inside the closing marker.
//!
//! The parser is an explicit per-turn object owned by the calling loop. It
//! performs no I/O and never blocks; cancelling a turn means dropping the
//! instance without calling [`StreamingParser::finalize`].

use std::collections::HashMap;

use tracing::{debug, warn};

use atelier_core::{
    find_closing_marker, find_next_tag, holdback_len, longest_trailing_partial_marker, merge,
    ArtifactKind, TagConfig,
};
use serde::{Deserialize, Serialize};

use crate::events::{ArtifactStartEvent, ArtifactStreamEvent};

/// Output of one [`StreamingParser::feed`] call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedOutput {
    /// Cleaned narrative text produced by this chunk (may be empty).
    pub text_delta: String,
    /// Artifact lifecycle events produced by this chunk, in order.
    pub events: Vec<ArtifactStreamEvent>,
}

/// Output of the terminal [`StreamingParser::finalize`] call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalizeOutput {
    /// Final cleaned narrative text flushed from the buffer.
    pub text_delta: String,
    /// Remaining artifact events, ending with an interrupted end event when
    /// the stream stopped inside an artifact.
    pub events: Vec<ArtifactStreamEvent>,
    /// Id of the artifact left incomplete, if any — the next turn may
    /// resume it with a `continue="true"` tag.
    pub resumable_artifact_id: Option<String>,
}

/// The artifact currently being streamed.
#[derive(Debug, Clone)]
struct OpenArtifact {
    id: String,
    kind: ArtifactKind,
    language: Option<String>,
    title: String,
    continued: bool,
    /// Content streamed in this turn (excludes any resumed prior content).
    content: String,
    /// Prior incomplete content when this occurrence is a continuation;
    /// merged in when the artifact ends.
    seed: Option<String>,
}

impl OpenArtifact {
    fn final_content(&self) -> String {
        match &self.seed {
            Some(prior) => merge(prior, &self.content),
            None => self.content.clone(),
        }
    }
}

/// Parser state: outside any artifact, or inside the open one.
#[derive(Debug, Clone)]
enum ParseMode {
    Outside,
    InsideArtifact(OpenArtifact),
}

/// Stateful chunk-by-chunk artifact extractor for one model turn.
///
/// # Example
///
/// ```rust
/// use atelier_streaming::StreamingParser;
///
/// let mut parser = StreamingParser::new();
/// let out = parser.feed(r#"Hi <artifact type="text/plain" id="a">Hello wor"#);
/// assert_eq!(out.text_delta, "Hi ");
///
/// let out = parser.feed("ld</artifact> bye");
/// assert_eq!(out.text_delta, " bye");
///
/// let end = parser.finalize();
/// assert_eq!(end.resumable_artifact_id, None);
/// ```
#[derive(Debug)]
pub struct StreamingParser {
    config: TagConfig,
    /// Unconsumed trailing text carried across `feed` calls.
    buffer: String,
    mode: ParseMode,
    /// Incomplete content from previous turns, by artifact id.
    resumable: HashMap<String, String>,
    finished: bool,
}

impl Default for StreamingParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingParser {
    /// Create a parser with the default tag delimiters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TagConfig::default())
    }

    /// Create a parser with custom tag delimiters.
    #[must_use]
    pub fn with_config(config: TagConfig) -> Self {
        Self {
            config,
            buffer: String::new(),
            mode: ParseMode::Outside,
            resumable: HashMap::new(),
            finished: false,
        }
    }

    /// Register the incomplete content of an artifact from a previous turn.
    ///
    /// When this turn opens the same id with `continue="true"`, the new
    /// content is overlap-merged onto the registered content instead of
    /// starting empty.
    #[must_use]
    pub fn with_resumable(mut self, id: impl Into<String>, content: impl Into<String>) -> Self {
        self.resumable.insert(id.into(), content.into());
        self
    }

    /// Feed the next chunk of model output.
    ///
    /// Must not be interleaved with [`finalize`](Self::finalize) or called
    /// after it without a [`reset`](Self::reset).
    pub fn feed(&mut self, chunk: &str) -> FeedOutput {
        if self.finished {
            warn!("feed called after finalize; chunk dropped (reset the parser first)");
            return FeedOutput::default();
        }
        self.buffer.push_str(chunk);

        let mut output = FeedOutput::default();
        self.drain(&mut output.text_delta, &mut output.events, false);
        output
    }

    /// Signal end-of-stream and flush all remaining state.
    ///
    /// If the stream stopped inside an artifact, the artifact is emitted
    /// with `is_complete = false` and its id is returned so the next turn
    /// can offer to resume it.
    pub fn finalize(&mut self) -> FinalizeOutput {
        if self.finished {
            warn!("finalize called twice; parser already drained");
            return FinalizeOutput::default();
        }

        let mut output = FinalizeOutput::default();
        self.drain(&mut output.text_delta, &mut output.events, true);

        if let ParseMode::InsideArtifact(open) =
            std::mem::replace(&mut self.mode, ParseMode::Outside)
        {
            debug!(id = %open.id, "stream ended inside artifact");
            let content = open.final_content();
            output
                .events
                .push(ArtifactStreamEvent::interrupted(open.id.clone(), content));
            output.resumable_artifact_id = Some(open.id);
        }

        self.finished = true;
        output
    }

    /// Metadata of the artifact currently being streamed, if any.
    ///
    /// Lets the consumer render an in-progress artifact header before the
    /// closing delimiter (or end of stream) settles its content.
    #[must_use]
    pub fn open_artifact(&self) -> Option<ArtifactStartEvent> {
        match &self.mode {
            ParseMode::Outside => None,
            ParseMode::InsideArtifact(open) => Some(ArtifactStartEvent {
                id: open.id.clone(),
                kind: open.kind,
                language: open.language.clone(),
                title: open.title.clone(),
                continued: open.continued,
            }),
        }
    }

    /// Discard all state so the instance can serve a new turn.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.mode = ParseMode::Outside;
        self.resumable.clear();
        self.finished = false;
    }

    /// Run the state machine over the buffer.
    ///
    /// With `finalizing` set, nothing is withheld: trailing fragments that
    /// might have become markers are flushed as-is.
    fn drain(
        &mut self,
        text_delta: &mut String,
        events: &mut Vec<ArtifactStreamEvent>,
        finalizing: bool,
    ) {
        loop {
            match &mut self.mode {
                ParseMode::Outside => {
                    if let Some(tag) = find_next_tag(&self.config, &self.buffer, 0) {
                        text_delta.push_str(&self.buffer[..tag.start]);

                        let seed = if tag.continued {
                            let seed = self.resumable.remove(&tag.id);
                            if seed.is_none() {
                                warn!(id = %tag.id, "continue tag without prior incomplete content");
                            }
                            seed
                        } else {
                            None
                        };

                        debug!(id = %tag.id, kind = ?tag.kind, continued = tag.continued, "artifact started");
                        events.push(ArtifactStreamEvent::started(
                            tag.id.clone(),
                            tag.kind,
                            tag.language.clone(),
                            tag.title.clone(),
                            tag.continued,
                        ));

                        self.buffer.drain(..tag.tag_end);
                        self.mode = ParseMode::InsideArtifact(OpenArtifact {
                            id: tag.id,
                            kind: tag.kind,
                            language: tag.language,
                            title: tag.title,
                            continued: tag.continued,
                            content: String::new(),
                            seed,
                        });
                    } else {
                        let hold = if finalizing {
                            0
                        } else {
                            holdback_len(&self.config, &self.buffer)
                        };
                        let emit_to = self.buffer.len() - hold;
                        text_delta.push_str(&self.buffer[..emit_to]);
                        self.buffer.drain(..emit_to);
                        return;
                    }
                }
                ParseMode::InsideArtifact(open) => {
                    if let Some(pos) = find_closing_marker(&self.config, &self.buffer, 0) {
                        if pos > 0 {
                            let fragment = self.buffer[..pos].to_string();
                            open.content.push_str(&fragment);
                            events.push(ArtifactStreamEvent::content_delta(
                                open.id.clone(),
                                fragment,
                            ));
                        }

                        debug!(id = %open.id, "artifact completed");
                        events.push(ArtifactStreamEvent::completed(
                            open.id.clone(),
                            open.final_content(),
                        ));

                        let drain_to = pos + self.config.close_marker.len();
                        self.buffer.drain(..drain_to);
                        self.mode = ParseMode::Outside;
                    } else {
                        let hold = if finalizing {
                            0
                        } else {
                            longest_trailing_partial_marker(&self.buffer, &self.config.close_marker)
                        };
                        let emit_to = self.buffer.len() - hold;
                        if emit_to > 0 {
                            let fragment = self.buffer[..emit_to].to_string();
                            open.content.push_str(&fragment);
                            events.push(ArtifactStreamEvent::content_delta(
                                open.id.clone(),
                                fragment,
                            ));
                            self.buffer.drain(..emit_to);
                        }
                        return;
                    }
                }
            }
        }
    }
}
