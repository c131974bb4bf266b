//! Core data model: messages, segments, and request shapes.

pub mod message;
pub mod request;
pub mod segment;

pub use message::{Message, Role, WireMessage};
pub use request::ChatRequest;
pub use segment::{
    ExecutionLogSegment, LogEntry, ReasoningSegment, Segment, SourceRef, SourcesSegment,
    TaskGroup, TaskPlanSegment, TextSegment, ToolCallSegment, ToolState,
};
