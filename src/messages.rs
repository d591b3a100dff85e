//! Conversation log — append-only ordered sequence of messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageOrigin {
    User,
    Bot,
}

/// One immutable entry in the conversation log.
///
/// Created by the session orchestrator on user submission or pipeline
/// completion; never mutated after being appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message id.
    pub id: Uuid,
    /// Who authored this message.
    pub origin: MessageOrigin,
    /// Message text.
    pub content: String,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
    /// What kind of processing produced this message
    /// (e.g. "calculation", "recommendation", "image-analysis").
    pub capability_tags: Vec<String>,
}

impl Message {
    fn new(origin: MessageOrigin, content: impl Into<String>, capability_tags: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            content: content.into(),
            created_at: Utc::now(),
            capability_tags,
        }
    }

    /// A user-authored message. User submissions carry no tags.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageOrigin::User, content, Vec::new())
    }

    /// A bot-authored message with capability tags.
    pub fn bot(content: impl Into<String>, capability_tags: Vec<String>) -> Self {
        Self::new(MessageOrigin::Bot, content, capability_tags)
    }

    /// Check for a capability tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.capability_tags.iter().any(|t| t == tag)
    }
}

/// Append-only message log, oldest first.
///
/// The only destructive operation a hosting application may perform is a
/// whole-log reset at session teardown; individual entries are never removed
/// or reordered.
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Always succeeds.
    pub fn append(&mut self, entry: Message) {
        self.entries.push(entry);
    }

    /// Ordered read-only view, oldest first.
    pub fn all(&self) -> &[Message] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_insertion_order() {
        let mut log = MessageLog::new();
        log.append(Message::user("first"));
        log.append(Message::bot("second", vec!["general".into()]));
        log.append(Message::user("third"));

        let contents: Vec<&str> = log.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn user_messages_carry_no_tags() {
        let msg = Message::user("hello");
        assert_eq!(msg.origin, MessageOrigin::User);
        assert!(msg.capability_tags.is_empty());
    }

    #[test]
    fn bot_messages_carry_ordered_tags() {
        let msg = Message::bot("reply", vec!["calculation".into(), "tracking".into()]);
        assert_eq!(msg.origin, MessageOrigin::Bot);
        assert_eq!(msg.capability_tags, vec!["calculation", "tracking"]);
        assert!(msg.has_tag("tracking"));
        assert!(!msg.has_tag("recommendation"));
    }

    #[test]
    fn message_ids_are_unique() {
        let a = Message::user("x");
        let b = Message::user("x");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn message_serde_roundtrip() {
        let msg = Message::bot("reply", vec!["general".into()]);
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, msg.id);
        assert_eq!(parsed.origin, MessageOrigin::Bot);
        assert_eq!(parsed.capability_tags, msg.capability_tags);
    }

    #[test]
    fn empty_log() {
        let log = MessageLog::new();
        assert!(log.is_empty());
        assert!(log.all().is_empty());
    }
}
