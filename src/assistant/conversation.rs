//! Conversation log
//!
//! Append-only, strictly time-ordered record of the chat exchanged with the
//! assistant during a session.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who sent a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// What a message asks the feed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentAction {
    Filter,
    Recommend,
    Info,
}

/// Structured reading of a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub action: IntentAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Intent {
    pub fn info() -> Self {
        Self {
            action: IntentAction::Info,
            category: None,
            keywords: Vec::new(),
        }
    }

    pub fn filter(category: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            action: IntentAction::Filter,
            category: Some(category.into()),
            keywords,
        }
    }

    /// Intent attached to raw user input: lowercase whitespace tokens
    pub fn from_utterance(text: &str) -> Self {
        Self {
            action: IntentAction::Filter,
            category: None,
            keywords: text.to_lowercase().split_whitespace().map(str::to_string).collect(),
        }
    }
}

/// One turn in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: Sender,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    pub timestamp: DateTime<Utc>,
}

/// Ordered, append-only list of chat messages
#[derive(Debug, Default, Clone)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user message
    pub fn push_user(&mut self, text: impl Into<String>) -> &ChatMessage {
        let text = text.into();
        let intent = Intent::from_utterance(&text);
        self.push(Sender::User, text, Some(intent))
    }

    /// Append an assistant message
    pub fn push_assistant(&mut self, text: impl Into<String>, intent: Intent) -> &ChatMessage {
        self.push(Sender::Assistant, text.into(), Some(intent))
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn push(&mut self, sender: Sender, message: String, intent: Option<Intent>) -> &ChatMessage {
        let timestamp = self.next_timestamp();
        self.messages.push(ChatMessage {
            id: Uuid::new_v4().to_string(),
            sender,
            message,
            intent,
            timestamp,
        });
        &self.messages[self.messages.len() - 1]
    }

    /// Current time, nudged past the previous message if the clock stalled
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.messages.last() {
            Some(prev) if now <= prev.timestamp => prev.timestamp + Duration::microseconds(1),
            _ => now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_intent() {
        let mut log = ConversationLog::new();
        let msg = log.push_user("Where can I  EAT tonight");
        assert_eq!(msg.sender, Sender::User);

        let intent = msg.intent.as_ref().unwrap();
        assert_eq!(intent.action, IntentAction::Filter);
        assert_eq!(intent.category, None);
        assert_eq!(intent.keywords, vec!["where", "can", "i", "eat", "tonight"]);
    }

    #[test]
    fn test_timestamps_strictly_increase() {
        let mut log = ConversationLog::new();
        for i in 0..50 {
            if i % 2 == 0 {
                log.push_user(format!("message {}", i));
            } else {
                log.push_assistant("reply", Intent::info());
            }
        }

        assert_eq!(log.len(), 50);
        assert!(log
            .messages()
            .windows(2)
            .all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut log = ConversationLog::new();
        log.push_user("a");
        log.push_assistant("b", Intent::info());
        let ids: std::collections::HashSet<_> = log.messages().iter().map(|m| &m.id).collect();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_message_serialization() {
        let mut log = ConversationLog::new();
        let msg = log
            .push_assistant(
                "Beach time!",
                Intent::filter("beach", vec!["beach".to_string(), "swim".to_string()]),
            )
            .clone();

        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "assistant");
        assert_eq!(json["intent"]["action"], "filter");
        assert_eq!(json["intent"]["category"], "beach");

        let info = serde_json::to_value(Intent::info()).unwrap();
        assert_eq!(info["action"], "info");
        assert!(info.get("category").is_none());

        let parsed: IntentAction = serde_json::from_str("\"recommend\"").unwrap();
        assert_eq!(parsed, IntentAction::Recommend);
    }
}
