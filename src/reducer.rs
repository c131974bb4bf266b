//! The segment reducer: folds one stream event into a message's segment
//! list.
//!
//! This is the heart of stream reconstruction. Given the current ordered
//! segment list and one typed event, [`apply_event`] produces the next list
//! by applying the protocol's merge, promotion, and sealing rules:
//!
//! - `content_chunk` extends the last `Text` segment or opens a new one.
//!   Content is never routed into the execution log.
//! - `reasoning_chunk` extends the last open `Reasoning` in its target list
//!   or opens a new one. Once a task plan exists the target list is the
//!   execution log's inner list (created on first use), otherwise the top
//!   level. Merge scoping is per list: a reasoning chunk never reaches back
//!   across the promotion boundary.
//! - `sources` always appends a new `Sources` segment, never merges.
//! - `tasks` replaces the existing plan's groups in place, or appends the
//!   message's single `TaskPlan`.
//! - `tool_call` upserts by `call_id` into the same target list reasoning
//!   uses: a known `call_id` is overwritten with the incoming payload
//!   (keeping its position and segment id), an unknown one is appended.
//! - `done` seals the turn: every `Reasoning` segment, top level and
//!   nested, gets `streaming = false`. Nothing else changes.
//!
//! The reducer keeps no state beyond the list itself. Events must be
//! applied in arrival order; application is not commutative.

use crate::models::segment::{
    ExecutionLogSegment, LogEntry, ReasoningSegment, Segment, SourcesSegment, TaskPlanSegment,
    TextSegment, ToolCallSegment,
};
use crate::models::segment::next_segment_id;
use crate::ndjson::{StreamEvent, ToolPayload};

/// Fold one event into the segment list.
pub fn apply_event(segments: &mut Vec<Segment>, event: StreamEvent) {
    match event {
        StreamEvent::ContentChunk { text } => append_content(segments, &text),
        StreamEvent::ReasoningChunk { text } => {
            if has_plan(segments) {
                let log = execution_log_mut(segments);
                append_log_reasoning(log, &text);
            } else {
                append_reasoning(segments, &text);
            }
        }
        StreamEvent::Sources { data } => {
            segments.push(Segment::Sources(SourcesSegment::new(data)));
        }
        StreamEvent::Tasks { data } => upsert_plan(segments, data),
        StreamEvent::ToolCall { tool } => {
            if has_plan(segments) {
                let log = execution_log_mut(segments);
                upsert_log_tool_call(log, tool);
            } else {
                upsert_tool_call(segments, tool);
            }
        }
        StreamEvent::Done => seal(segments),
    }
}

/// Whether a task plan has been announced for this message.
fn has_plan(segments: &[Segment]) -> bool {
    segments.iter().any(|s| matches!(s, Segment::TaskPlan(_)))
}

/// The message's execution log, created and appended if absent.
fn execution_log_mut(segments: &mut Vec<Segment>) -> &mut ExecutionLogSegment {
    let index = segments
        .iter()
        .position(|s| matches!(s, Segment::ExecutionLog(_)));
    let index = match index {
        Some(i) => i,
        None => {
            segments.push(Segment::ExecutionLog(ExecutionLogSegment::new()));
            segments.len() - 1
        }
    };
    match &mut segments[index] {
        Segment::ExecutionLog(log) => log,
        _ => unreachable!("index points at an execution log"),
    }
}

fn append_content(segments: &mut Vec<Segment>, text: &str) {
    if let Some(Segment::Text(last)) = segments.last_mut() {
        last.content.push_str(text);
    } else {
        segments.push(Segment::Text(TextSegment::new(text)));
    }
}

fn append_reasoning(segments: &mut Vec<Segment>, text: &str) {
    if let Some(Segment::Reasoning(last)) = segments.last_mut() {
        last.content.push_str(text);
    } else {
        segments.push(Segment::Reasoning(ReasoningSegment::new(text)));
    }
}

fn append_log_reasoning(log: &mut ExecutionLogSegment, text: &str) {
    if let Some(LogEntry::Reasoning(last)) = log.entries.last_mut() {
        last.content.push_str(text);
    } else {
        log.entries
            .push(LogEntry::Reasoning(ReasoningSegment::new(text)));
    }
}

fn upsert_plan(segments: &mut Vec<Segment>, data: Vec<crate::models::TaskGroup>) {
    for segment in segments.iter_mut() {
        if let Segment::TaskPlan(plan) = segment {
            plan.tasks = data;
            return;
        }
    }
    segments.push(Segment::TaskPlan(TaskPlanSegment::new(data)));
}

/// Overwrite a tool call segment's payload fields, keeping its segment id
/// stable so the presentation layer sees an update rather than a new row.
fn overwrite_tool_call(existing: &mut ToolCallSegment, tool: ToolPayload) {
    existing.call_id = tool.call_id;
    existing.name = tool.name;
    existing.state = tool.state;
    existing.input = tool.args;
    existing.output = tool.result;
}

fn new_tool_call(tool: ToolPayload) -> ToolCallSegment {
    ToolCallSegment {
        id: next_segment_id(),
        call_id: tool.call_id,
        name: tool.name,
        state: tool.state,
        input: tool.args,
        output: tool.result,
    }
}

fn upsert_tool_call(segments: &mut Vec<Segment>, tool: ToolPayload) {
    for segment in segments.iter_mut() {
        if let Segment::ToolCall(existing) = segment {
            if existing.call_id == tool.call_id {
                overwrite_tool_call(existing, tool);
                return;
            }
        }
    }
    segments.push(Segment::ToolCall(new_tool_call(tool)));
}

fn upsert_log_tool_call(log: &mut ExecutionLogSegment, tool: ToolPayload) {
    for entry in log.entries.iter_mut() {
        if let LogEntry::ToolCall(existing) = entry {
            if existing.call_id == tool.call_id {
                overwrite_tool_call(existing, tool);
                return;
            }
        }
    }
    log.entries.push(LogEntry::ToolCall(new_tool_call(tool)));
}

/// Seal the turn: close every open reasoning segment, top level and nested.
fn seal(segments: &mut [Segment]) {
    for segment in segments.iter_mut() {
        match segment {
            Segment::Reasoning(r) => r.streaming = false,
            Segment::ExecutionLog(log) => {
                for entry in log.entries.iter_mut() {
                    if let LogEntry::Reasoning(r) = entry {
                        r.streaming = false;
                    }
                }
            }
            _ => {}
        }
    }
}
