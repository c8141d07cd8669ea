//! Chat events and the bounded history window.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Identity shown on notices the engine writes into the chat itself.
pub const SYSTEM_IDENTITY: &str = "chatdraw";

/// How many events the history keeps by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// One line in the chat view: either a relayed message or a system notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatEvent {
    pub identity: String,
    pub text: String,
    pub received_at: DateTime<Utc>,
    /// The message contained the trigger keyword in engagement mode.
    pub is_triggered: bool,
    pub is_system_notice: bool,
}

impl ChatEvent {
    /// A message relayed from chat, stamped now.
    pub fn chat(
        identity: impl Into<String>,
        text: impl Into<String>,
        is_triggered: bool,
    ) -> Self {
        Self {
            identity: identity.into(),
            text: text.into(),
            received_at: Utc::now(),
            is_triggered,
            is_system_notice: false,
        }
    }

    /// A notice written by the engine, stamped now.
    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            identity: SYSTEM_IDENTITY.to_string(),
            text: text.into(),
            received_at: Utc::now(),
            is_triggered: false,
            is_system_notice: true,
        }
    }
}

/// The most recent chat events, oldest first.
///
/// Appending past the limit evicts from the front, so the history always
/// holds exactly the last `limit` events.
#[derive(Debug, Clone)]
pub struct ChatHistory {
    events: VecDeque<ChatEvent>,
    limit: usize,
}

impl ChatHistory {
    /// Creates an empty history that keeps at most `limit` events
    /// (at least one).
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            events: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn push(&mut self, event: ChatEvent) {
        if self.events.len() == self.limit {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Copies the window out, oldest first.
    pub fn snapshot(&self) -> Vec<ChatEvent> {
        self.events.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> ChatEvent {
        ChatEvent::chat("viewer", format!("message {n}"), false)
    }

    #[test]
    fn test_push_beyond_limit_keeps_most_recent() {
        let mut history = ChatHistory::default();
        for n in 0..75 {
            history.push(numbered(n));
        }

        assert_eq!(history.len(), 50);
        let texts: Vec<&str> = history.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts.first(), Some(&"message 25"));
        assert_eq!(texts.last(), Some(&"message 74"));
    }

    #[test]
    fn test_push_under_limit_keeps_everything_in_order() {
        let mut history = ChatHistory::new(5);
        for n in 0..3 {
            history.push(numbered(n));
        }
        let texts: Vec<String> =
            history.snapshot().into_iter().map(|e| e.text).collect();
        assert_eq!(texts, vec!["message 0", "message 1", "message 2"]);
    }

    #[test]
    fn test_notices_count_toward_the_limit() {
        let mut history = ChatHistory::new(2);
        history.push(numbered(0));
        history.push(ChatEvent::notice("bob joined the giveaway!"));
        history.push(numbered(1));

        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot[0].is_system_notice);
        assert_eq!(snapshot[1].text, "message 1");
    }

    #[test]
    fn test_zero_limit_is_raised_to_one() {
        let mut history = ChatHistory::new(0);
        history.push(numbered(0));
        history.push(numbered(1));
        assert_eq!(history.limit(), 1);
        assert_eq!(history.snapshot()[0].text, "message 1");
    }

    #[test]
    fn test_clear_empties_history() {
        let mut history = ChatHistory::default();
        history.push(numbered(0));
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_notice_uses_system_identity() {
        let notice = ChatEvent::notice("hello");
        assert_eq!(notice.identity, SYSTEM_IDENTITY);
        assert!(notice.is_system_notice);
        assert!(!notice.is_triggered);
    }

    #[test]
    fn test_chat_event_serializes_with_snake_case_fields() {
        let json = serde_json::to_value(ChatEvent::chat("bob", "hi", true)).unwrap();
        assert_eq!(json["identity"], "bob");
        assert_eq!(json["is_triggered"], true);
        assert_eq!(json["is_system_notice"], false);
        assert!(json["received_at"].is_string());
    }
}
