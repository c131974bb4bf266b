//! Typed stream events decoded from NDJSON frames.
//!
//! Contains the `StreamEvent` enum with every event kind the backend emits
//! on the `/api/chat` response stream.

use serde::{Deserialize, Serialize};

use crate::models::{SourceRef, TaskGroup, ToolState};

/// Tool payload nested inside a `tool_call` frame.
///
/// The backend sends camelCase field names; callers must send the full
/// accumulated state each time, so a later payload for the same `call_id`
/// replaces the earlier one wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolPayload {
    /// Cross-event correlation key.
    #[serde(rename = "toolCallId")]
    pub call_id: String,
    /// Name of the invoked tool.
    #[serde(rename = "toolName")]
    pub name: String,
    /// Current execution state.
    pub state: ToolState,
    /// Tool arguments, as far as they are known.
    #[serde(default)]
    pub args: serde_json::Value,
    /// Tool output, present once the call finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

/// Typed events from the chat stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Hidden deliberation text chunk.
    ReasoningChunk { text: String },
    /// Visible prose chunk.
    ContentChunk { text: String },
    /// Citation sources.
    Sources { data: Vec<SourceRef> },
    /// Task plan announcement or update.
    Tasks { data: Vec<TaskGroup> },
    /// Tool invocation progress.
    ToolCall { tool: ToolPayload },
    /// Terminal frame; seals the turn.
    Done,
}

impl StreamEvent {
    /// The wire names this client recognizes.
    pub const KNOWN_TYPES: [&'static str; 6] = [
        "reasoning_chunk",
        "content_chunk",
        "sources",
        "tasks",
        "tool_call",
        "done",
    ];

    /// The event's wire name, for logging.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            StreamEvent::ReasoningChunk { .. } => "reasoning_chunk",
            StreamEvent::ContentChunk { .. } => "content_chunk",
            StreamEvent::Sources { .. } => "sources",
            StreamEvent::Tasks { .. } => "tasks",
            StreamEvent::ToolCall { .. } => "tool_call",
            StreamEvent::Done => "done",
        }
    }

    /// Whether this event terminates the turn.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done)
    }
}
