//! Conversation and chat message records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::Context;
use crate::core::ids::{ConversationId, MessageId};

/// Author of a chat message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// End user.
    User,
    /// Career agent.
    Assistant,
}

impl ChatRole {
    /// Stable string form used on the wire and in pipeline history.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChatRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(value.to_string()),
        }
    }
}

/// One turn of a conversation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message identifier.
    pub id: MessageId,
    /// Author role.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message stamped with the current time.
    #[must_use]
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A chat session and its ordered history.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Conversation identifier.
    pub id: ConversationId,
    /// Messages in chronological order.
    pub messages: Vec<ChatMessage>,
    /// Free-form metadata.
    pub metadata: Option<Context>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the last append.
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create an empty conversation under the given identifier.
    #[must_use]
    pub fn with_id(id: ConversationId) -> Self {
        let now = Utc::now();
        Self {
            id,
            messages: Vec::new(),
            metadata: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message and refresh `updated_at`.
    pub fn push(&mut self, message: ChatMessage) {
        self.updated_at = message.timestamp.max(self.updated_at);
        self.messages.push(message);
    }

    /// Borrow up to the last `n` messages, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [ChatRole::User, ChatRole::Assistant] {
            assert_eq!(role.as_str().parse::<ChatRole>(), Ok(role));
        }
        assert!("system".parse::<ChatRole>().is_err());
    }

    #[test]
    fn test_message_wire_shape() {
        let message = ChatMessage::new(ChatRole::Assistant, "hello");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["content"], "hello");
        assert_eq!(value["id"], message.id.to_string());
        assert!(value["timestamp"].as_str().is_some());
    }

    #[test]
    fn test_conversation_wire_shape() {
        let conversation = Conversation::with_id(ConversationId::new());
        let value = serde_json::to_value(&conversation).unwrap();
        assert_eq!(value["messages"], serde_json::json!([]));
        assert!(value["metadata"].is_null());
        assert!(value["created_at"].is_string());
        assert!(value["updated_at"].is_string());
    }

    #[test]
    fn test_push_keeps_updated_after_created() {
        let mut conversation = Conversation::with_id(ConversationId::new());
        conversation.push(ChatMessage::new(ChatRole::User, "hi"));
        assert!(conversation.updated_at >= conversation.created_at);
        assert_eq!(conversation.messages.len(), 1);
    }

    #[test]
    fn test_recent_returns_suffix() {
        let mut conversation = Conversation::with_id(ConversationId::new());
        for i in 0..7 {
            conversation.push(ChatMessage::new(ChatRole::User, format!("m{i}")));
        }
        let recent = conversation.recent(5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].content, "m2");
        assert_eq!(recent[4].content, "m6");
        assert_eq!(conversation.recent(50).len(), 7);
    }
}
