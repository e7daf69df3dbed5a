//! Version history replay.
//!
//! Rebuilds per-artifact version lineages by replaying the stored
//! conversation in order, then layering the live streaming buffer on top.
//! The replay is pure: each call takes its own view of the message list and
//! buffer and returns a fresh history, so it is safe to run on every UI
//! refresh — cost is linear in conversation size, with no incremental state.

use indexmap::IndexMap;
use tracing::{debug, warn};

use atelier_core::{
    find_closing_marker, find_next_tag, holdback_len, longest_trailing_partial_marker, merge,
    now_utc, ArtifactVersion, ChatMessage, Segment, TagConfig, TagMatch, VersionOrigin,
};
use chrono::{DateTime, Utc};

use crate::projector;

/// Ordered version lists keyed by artifact id, in first-seen order.
pub type VersionHistory = IndexMap<String, Vec<ArtifactVersion>>;

/// Replays conversations into artifact version histories.
#[derive(Debug, Clone, Default)]
pub struct VersionAggregator {
    config: TagConfig,
}

impl VersionAggregator {
    /// Create an aggregator with the default tag delimiters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aggregator with custom tag delimiters.
    #[must_use]
    pub fn with_config(config: TagConfig) -> Self {
        Self { config }
    }

    /// Replay `messages` in order, then layer `live_buffer` on top.
    ///
    /// Every resolved artifact occurrence becomes a new version; `continue`
    /// occurrences merge onto the immediately preceding version's content;
    /// explicit operations carried by messages are folded in at their
    /// position. The live buffer's trailing in-progress artifact updates
    /// the latest incomplete version in place rather than appending — only
    /// completion or a genuinely new tag grows a version list.
    #[must_use]
    pub fn build_version_history(
        &self,
        messages: &[ChatMessage],
        live_buffer: Option<&str>,
    ) -> VersionHistory {
        let mut history = VersionHistory::new();

        for message in messages {
            if message.is_assistant() && !message.content.is_empty() {
                self.replay_text(&mut history, &message.content, message.created_at);
            }
            for op in &message.artifact_ops {
                let latest = latest_of(&history);
                match projector::apply_at(op, &latest, message.created_at) {
                    Ok(version) => {
                        let versions = history.entry(version.id.clone()).or_default();
                        versions.push(version);
                    }
                    Err(err) => {
                        warn!(%err, "skipping artifact operation during replay");
                    }
                }
            }
        }

        if let Some(live) = live_buffer {
            self.replay_live(&mut history, live);
        }

        debug!(artifacts = history.len(), "version history rebuilt");
        history
    }

    /// Split one message's text into narrative and artifact segments.
    ///
    /// With `is_live` set, a trailing fragment that might still become an
    /// opening marker is withheld from the final text segment, mirroring
    /// the streaming parser's holdback.
    #[must_use]
    pub fn segments_of(&self, text: &str, is_live: bool) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut pos = 0;

        loop {
            match find_next_tag(&self.config, text, pos) {
                Some(tag) => {
                    if tag.start > pos {
                        segments.push(Segment::text(&text[pos..tag.start]));
                    }
                    match find_closing_marker(&self.config, text, tag.tag_end) {
                        Some(close) => {
                            segments.push(Segment::artifact_ref(tag.id, true));
                            pos = close + self.config.close_marker.len();
                        }
                        None => {
                            segments.push(Segment::artifact_ref(tag.id, false));
                            return segments;
                        }
                    }
                }
                None => {
                    let rest = &text[pos..];
                    let held = if is_live {
                        holdback_len(&self.config, rest)
                    } else {
                        0
                    };
                    let visible = &rest[..rest.len() - held];
                    if !visible.is_empty() {
                        segments.push(Segment::text(visible));
                    }
                    return segments;
                }
            }
        }
    }

    /// Replay one stored message's text.
    fn replay_text(&self, history: &mut VersionHistory, text: &str, at: DateTime<Utc>) {
        let mut pos = 0;
        while let Some(tag) = find_next_tag(&self.config, text, pos) {
            match find_closing_marker(&self.config, text, tag.tag_end) {
                Some(close) => {
                    self.record_occurrence(history, &tag, &text[tag.tag_end..close], true, at);
                    pos = close + self.config.close_marker.len();
                }
                None => {
                    // the turn was cut off inside this artifact
                    self.record_occurrence(history, &tag, &text[tag.tag_end..], false, at);
                    return;
                }
            }
        }
    }

    /// Layer the in-flight turn's text on top of the replayed history.
    fn replay_live(&self, history: &mut VersionHistory, live: &str) {
        let mut pos = 0;
        while let Some(tag) = find_next_tag(&self.config, live, pos) {
            match find_closing_marker(&self.config, live, tag.tag_end) {
                Some(close) => {
                    self.record_occurrence(
                        history,
                        &tag,
                        &live[tag.tag_end..close],
                        true,
                        now_utc(),
                    );
                    pos = close + self.config.close_marker.len();
                }
                None => {
                    let raw = &live[tag.tag_end..];
                    let held = longest_trailing_partial_marker(raw, &self.config.close_marker);
                    self.record_in_progress(history, &tag, &raw[..raw.len() - held]);
                    return;
                }
            }
        }
    }

    /// Record one resolved artifact occurrence as a new version.
    fn record_occurrence(
        &self,
        history: &mut VersionHistory,
        tag: &TagMatch,
        content: &str,
        is_complete: bool,
        at: DateTime<Utc>,
    ) {
        let versions = history.entry(tag.id.clone()).or_default();

        let (origin, content) = if tag.continued {
            match versions.last() {
                Some(prev) => (VersionOrigin::Continued, merge(&prev.content, content)),
                None => {
                    warn!(id = %tag.id, "continue tag without a prior version");
                    (VersionOrigin::Created, content.to_string())
                }
            }
        } else {
            (VersionOrigin::Created, content.to_string())
        };

        // a superseded version is as complete as it will ever be
        if let Some(prev) = versions.last_mut() {
            prev.is_complete = true;
        }

        let version_number = versions.len() as u32 + 1;
        versions.push(ArtifactVersion {
            id: tag.id.clone(),
            kind: tag.kind,
            language: tag.language.clone(),
            title: tag.title.clone(),
            content,
            version_number,
            created_at: at,
            is_complete,
            origin,
        });
    }

    /// Record the live buffer's trailing in-progress artifact.
    ///
    /// A continuation of the trailing incomplete version updates it in
    /// place; anything else appends a new incomplete version.
    fn record_in_progress(&self, history: &mut VersionHistory, tag: &TagMatch, content: &str) {
        if tag.continued {
            if let Some(last) = history.get_mut(&tag.id).and_then(|v| v.last_mut()) {
                if !last.is_complete {
                    let merged = merge(&last.content, content);
                    last.content = merged;
                    return;
                }
            }
        }
        self.record_occurrence(history, tag, content, false, now_utc());
    }
}

/// Take the latest version of every artifact.
#[must_use]
pub fn latest_of(history: &VersionHistory) -> IndexMap<String, ArtifactVersion> {
    history
        .iter()
        .filter_map(|(id, versions)| versions.last().map(|v| (id.clone(), v.clone())))
        .collect()
}
