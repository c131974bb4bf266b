use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::{Message, WireMessage};

/// Request body for one turn against the chat endpoint.
///
/// Carries the full prior conversation flattened to `{role, content}` pairs
/// plus a session identifier the backend uses to key its in-memory state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// Flattened conversation history, oldest first.
    pub messages: Vec<WireMessage>,
    /// Session ID (the backend's wire name for this field is `id`).
    #[serde(rename = "id")]
    pub session_id: String,
}

impl ChatRequest {
    /// Build a request from the conversation history.
    pub fn from_history(messages: &[Message], session_id: impl Into<String>) -> Self {
        Self {
            messages: messages.iter().map(WireMessage::from).collect(),
            session_id: session_id.into(),
        }
    }

    /// Build a request with a fresh session id. Useful for one-off turns.
    pub fn new(messages: &[Message]) -> Self {
        Self::from_history(messages, Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_history_flattens_messages() {
        let history = vec![Message::user("hi"), Message::assistant_placeholder()];
        let request = ChatRequest::from_history(&history, "sess-1");

        assert_eq!(request.session_id, "sess-1");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].content, "hi");
        assert_eq!(request.messages[1].content, "");
    }

    #[test]
    fn test_session_id_serializes_as_id() {
        let request = ChatRequest::from_history(&[], "sess-2");
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""id":"sess-2""#));
        assert!(!json.contains("session_id"));
    }

    #[test]
    fn test_new_generates_session_id() {
        let a = ChatRequest::new(&[]);
        let b = ChatRequest::new(&[]);
        assert_ne!(a.session_id, b.session_id);
    }
}
