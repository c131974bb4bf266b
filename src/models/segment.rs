//! Segment types that make up the body of a message.
//!
//! An assistant message is an ordered list of [`Segment`]s reconstructed
//! from the backend event stream. The variants form a closed union; the
//! execution log's inner list is further restricted to [`LogEntry`] so the
//! "reasoning and tool calls only" rule is enforced by construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate a fresh segment id.
///
/// Segment ids are opaque; the presentation layer uses them as stable keys
/// across re-renders.
pub fn next_segment_id() -> String {
    Uuid::new_v4().to_string()
}

/// Execution state of a tool invocation as reported by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ToolState {
    /// Arguments are still being streamed.
    #[serde(rename = "input-streaming")]
    InputStreaming,
    /// Arguments are complete; the tool is running.
    #[serde(rename = "input-available")]
    InputAvailable,
    /// The tool finished and produced output.
    #[serde(rename = "output-available")]
    OutputAvailable,
    /// The tool failed.
    #[serde(rename = "output-error")]
    OutputError,
    /// A state this client does not recognize.
    #[serde(other, rename = "unknown")]
    Unknown,
}

impl ToolState {
    /// Whether the invocation has reached a terminal state.
    pub fn is_finished(&self) -> bool {
        matches!(self, ToolState::OutputAvailable | ToolState::OutputError)
    }
}

/// Visible prose.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextSegment {
    pub id: String,
    pub content: String,
}

impl TextSegment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: next_segment_id(),
            content: content.into(),
        }
    }
}

/// Hidden deliberation text. `streaming` stays `true` until the turn's
/// terminal event seals it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReasoningSegment {
    pub id: String,
    pub content: String,
    pub streaming: bool,
}

impl ReasoningSegment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: next_segment_id(),
            content: content.into(),
            streaming: true,
        }
    }
}

/// One tool invocation. `call_id` is the correlation key across events;
/// a later event with the same `call_id` overwrites this segment's payload
/// fields while the segment `id` stays stable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallSegment {
    pub id: String,
    pub call_id: String,
    pub name: String,
    pub state: ToolState,
    pub input: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// One titled group of plan steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskGroup {
    pub title: String,
    pub items: Vec<String>,
}

/// The task plan announced by the backend. At most one per message; later
/// `tasks` events replace `tasks` in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskPlanSegment {
    pub id: String,
    pub tasks: Vec<TaskGroup>,
}

impl TaskPlanSegment {
    pub fn new(tasks: Vec<TaskGroup>) -> Self {
        Self {
            id: next_segment_id(),
            tasks,
        }
    }
}

/// One citation source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceRef {
    pub title: String,
    pub url: String,
}

/// A list of citation sources. Never merged or deduplicated across events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourcesSegment {
    pub id: String,
    pub sources: Vec<SourceRef>,
}

impl SourcesSegment {
    pub fn new(sources: Vec<SourceRef>) -> Self {
        Self {
            id: next_segment_id(),
            sources,
        }
    }
}

/// An entry inside the execution log. Only reasoning and tool calls are
/// routed here; the type makes anything else unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEntry {
    Reasoning(ReasoningSegment),
    ToolCall(ToolCallSegment),
}

/// Container grouping reasoning/tool chatter produced after a task plan has
/// been announced. At most one per message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionLogSegment {
    pub id: String,
    pub entries: Vec<LogEntry>,
}

impl ExecutionLogSegment {
    pub fn new() -> Self {
        Self {
            id: next_segment_id(),
            entries: Vec::new(),
        }
    }
}

impl Default for ExecutionLogSegment {
    fn default() -> Self {
        Self::new()
    }
}

/// One structured unit of message content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Text(TextSegment),
    Reasoning(ReasoningSegment),
    ToolCall(ToolCallSegment),
    TaskPlan(TaskPlanSegment),
    Sources(SourcesSegment),
    ExecutionLog(ExecutionLogSegment),
}

impl Segment {
    /// The segment's opaque id.
    pub fn id(&self) -> &str {
        match self {
            Segment::Text(s) => &s.id,
            Segment::Reasoning(s) => &s.id,
            Segment::ToolCall(s) => &s.id,
            Segment::TaskPlan(s) => &s.id,
            Segment::Sources(s) => &s.id,
            Segment::ExecutionLog(s) => &s.id,
        }
    }
}
