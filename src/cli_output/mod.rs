//! Simple line-based CLI output for conversation messages.

use crate::models::segment::{LogEntry, Segment, ToolCallSegment};
use crate::models::Message;

/// Line width for separators.
const LINE_WIDTH: usize = 60;

/// Print the application header.
///
/// ```text
/// FLOWCHAT
/// ════════════════════════════════════════════════════════════
/// ```
pub fn print_header(title: &str) {
    println!();
    println!("{}", title);
    println!("{}", "═".repeat(LINE_WIDTH));
    println!();
}

/// Print one message, segment by segment.
pub fn print_message(message: &Message) {
    for segment in &message.segments {
        print_segment(segment, "");
    }
    println!();
}

fn print_segment(segment: &Segment, indent: &str) {
    match segment {
        Segment::Text(text) => {
            if !text.content.is_empty() {
                println!("{}{}", indent, text.content);
            }
        }
        Segment::Reasoning(reasoning) => {
            let marker = if reasoning.streaming { "…" } else { "·" };
            for line in reasoning.content.lines() {
                println!("{}  {} {}", indent, marker, line);
            }
        }
        Segment::ToolCall(tool) => print_tool_call(tool, indent),
        Segment::TaskPlan(plan) => {
            for group in &plan.tasks {
                println!("{}{}", indent, group.title);
                println!("{}{}", indent, "─".repeat(LINE_WIDTH.saturating_sub(indent.len())));
                for item in &group.items {
                    println!("{}  {}", indent, item);
                }
            }
        }
        Segment::Sources(sources) => {
            println!("{}sources:", indent);
            for source in &sources.sources {
                println!("{}  - {} <{}>", indent, source.title, source.url);
            }
        }
        Segment::ExecutionLog(log) => {
            println!("{}execution log:", indent);
            for entry in &log.entries {
                match entry {
                    LogEntry::Reasoning(reasoning) => {
                        let marker = if reasoning.streaming { "…" } else { "·" };
                        for line in reasoning.content.lines() {
                            println!("{}    {} {}", indent, marker, line);
                        }
                    }
                    LogEntry::ToolCall(tool) => print_tool_call(tool, &format!("{}  ", indent)),
                }
            }
        }
    }
}

fn print_tool_call(tool: &ToolCallSegment, indent: &str) {
    if !tool.state.is_finished() {
        println!("{}  ⚙ {} …", indent, tool.name);
        return;
    }
    match &tool.output {
        Some(output) => println!("{}  ⚙ {} → {}", indent, tool.name, output),
        None => println!("{}  ⚙ {}", indent, tool.name),
    }
}

/// Print a turn-level error line.
pub fn print_error(message: &str) {
    eprintln!("  ✗ {}", message);
}
