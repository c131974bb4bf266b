use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::segment::Segment;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single conversation message owning an ordered list of segments.
///
/// A message is created once per turn: the user message synchronously on
/// submit, the assistant message as an empty placeholder immediately after.
/// Once the turn ends its segments are immutable until a full reset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Opaque message id (uuid v4).
    pub id: String,
    /// Role of the message sender.
    pub role: Role,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
    /// Ordered segments reconstructed from the event stream.
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl Message {
    /// Create a user message holding a single text segment.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            created_at: Utc::now(),
            segments: vec![Segment::Text(super::segment::TextSegment::new(content))],
        }
    }

    /// Create an empty assistant placeholder for an in-progress turn.
    pub fn assistant_placeholder() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Assistant,
            created_at: Utc::now(),
            segments: Vec::new(),
        }
    }

    /// Concatenation of the message's visible text segments.
    ///
    /// This is the flattened form sent back to the backend as conversation
    /// history; reasoning, tool calls, plans, and sources are not included.
    pub fn flat_content(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if let Segment::Text(text) = segment {
                out.push_str(&text.content);
            }
        }
        out
    }

    /// Whether any reasoning segment (top-level or nested) is still open.
    pub fn is_streaming(&self) -> bool {
        self.segments.iter().any(|segment| match segment {
            Segment::Reasoning(r) => r.streaming,
            Segment::ExecutionLog(log) => log.entries.iter().any(|entry| {
                matches!(entry, super::segment::LogEntry::Reasoning(r) if r.streaming)
            }),
            _ => false,
        })
    }
}

/// The `{role, content}` pair shape the backend expects in request bodies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.flat_content(),
        }
    }
}
