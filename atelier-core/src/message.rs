//! Conversation messages.
//!
//! The persistence layer stores a flat list of [`ChatMessage`]s; the version
//! aggregator replays them in order. Assistant messages carry the raw model
//! text (artifact tags included, verbatim) and any explicit artifact
//! operations the model issued as tool calls during that turn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactKind;
use crate::identifier::{generate_message_id, now_utc};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The human participant.
    User,
    /// The model.
    Assistant,
    /// System instructions.
    System,
}

/// An explicit artifact mutation issued as a tool call.
///
/// These are the function-call counterparts of inline tags: the model names
/// an operation and its arguments instead of re-streaming content. Both
/// operators derive a new version from the latest complete one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum ArtifactOperation {
    /// Replace a single exact occurrence of `old_str` with `new_str`.
    Update {
        /// Target artifact id.
        id: String,
        /// Substring to replace; must occur exactly once.
        old_str: String,
        /// Replacement text.
        new_str: String,
    },
    /// Replace the whole content, optionally changing metadata.
    Rewrite {
        /// Target artifact id.
        id: String,
        /// Full replacement content.
        content: String,
        /// New content kind, or `None` to keep the current one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<ArtifactKind>,
        /// New language hint, or `None` to keep the current one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        /// New title, or `None` to keep the current one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
}

impl ArtifactOperation {
    /// Create an update operation.
    #[must_use]
    pub fn update(
        id: impl Into<String>,
        old_str: impl Into<String>,
        new_str: impl Into<String>,
    ) -> Self {
        Self::Update {
            id: id.into(),
            old_str: old_str.into(),
            new_str: new_str.into(),
        }
    }

    /// Create a rewrite operation that keeps the current metadata.
    #[must_use]
    pub fn rewrite(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Rewrite {
            id: id.into(),
            content: content.into(),
            kind: None,
            language: None,
            title: None,
        }
    }

    /// The id of the artifact this operation targets.
    #[must_use]
    pub fn artifact_id(&self) -> &str {
        match self {
            Self::Update { id, .. } | Self::Rewrite { id, .. } => id,
        }
    }
}

/// One stored conversation message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message id.
    pub id: String,
    /// Who produced it.
    pub role: Role,
    /// Raw message text. For assistant messages this is the model output
    /// verbatim, inline artifact tags included.
    pub content: String,
    /// Explicit artifact operations issued during this turn, in call order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifact_ops: Vec<ArtifactOperation>,
    /// When the message was produced. Used as the logical timestamp for
    /// versions derived from it.
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message with a generated id and the current timestamp.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: generate_message_id(),
            role,
            content: content.into(),
            artifact_ops: Vec::new(),
            created_at: now_utc(),
        }
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Attach an artifact operation.
    #[must_use]
    pub fn with_operation(mut self, op: ArtifactOperation) -> Self {
        self.artifact_ops.push(op);
        self
    }

    /// Override the timestamp.
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Check if this is an assistant message.
    #[must_use]
    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_message() {
        let message = ChatMessage::assistant("hello");
        assert!(message.id.starts_with("msg_"));
        assert!(message.is_assistant());
        assert!(message.artifact_ops.is_empty());
    }

    #[test]
    fn test_with_operation() {
        let message = ChatMessage::assistant("Updating the page.")
            .with_operation(ArtifactOperation::update("page", "old", "new"));
        assert_eq!(message.artifact_ops.len(), 1);
        assert_eq!(message.artifact_ops[0].artifact_id(), "page");
    }

    #[test]
    fn test_operation_serde() {
        let op = ArtifactOperation::rewrite("page", "<html></html>");
        let json = serde_json::to_string(&op).unwrap();
        assert!(json.contains(r#""operation":"rewrite""#));
        let parsed: ArtifactOperation = serde_json::from_str(&json).unwrap();
        assert_eq!(op, parsed);
    }

    #[test]
    fn test_message_serde_roundtrip() {
        let message = ChatMessage::user("hi there");
        let json = serde_json::to_string(&message).unwrap();
        let parsed: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(message, parsed);
    }
}
