//! Conversation state: the ordered message list and its mutation surface.

use crate::models::message::Message;
use crate::models::segment::{Segment, SourceRef, SourcesSegment, TextSegment};

/// Greeting text shown after every reset.
pub const GREETING_TEXT: &str =
    "Hi! Describe the pipeline you want and I'll plan it out and build it on the canvas.";

/// Fixed sources attached to the greeting message.
pub const GREETING_SOURCES: [(&str, &str); 2] = [
    (
        "Plan-and-execute agents",
        "https://blog.langchain.dev/planning-agents/",
    ),
    (
        "Tool calling",
        "https://python.langchain.com/docs/concepts/tool_calling/",
    ),
];

/// Owns the ordered list of conversation messages.
///
/// This is the only place message state is mutated, and only via the
/// operations below: append a finished or placeholder message, replace one
/// message's segment list by id, or reset to the deterministic initial
/// state. `replace_segments` is called once per decoded frame during
/// streaming, so it must stay cheap and must never reorder the list.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    messages: Vec<Message>,
}

impl ConversationStore {
    /// Create a store holding the initial greeting state.
    pub fn new() -> Self {
        let mut store = Self {
            messages: Vec::new(),
        };
        store.reset();
        store
    }

    /// The current ordered message list.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Look up a message by id.
    pub fn message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Append a message, returning its id.
    pub fn append_message(&mut self, message: Message) -> String {
        let id = message.id.clone();
        self.messages.push(message);
        id
    }

    /// Apply `updater` to the segment list of the message with the given
    /// id. Returns `false` when no such message exists.
    pub fn replace_segments(
        &mut self,
        id: &str,
        updater: impl FnOnce(&mut Vec<Segment>),
    ) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                updater(&mut message.segments);
                true
            }
            None => false,
        }
    }

    /// Discard all messages and restore the deterministic greeting state:
    /// one assistant message with a fixed text segment and a fixed sources
    /// segment.
    pub fn reset(&mut self) {
        self.messages.clear();

        let mut greeting = Message::assistant_placeholder();
        greeting
            .segments
            .push(Segment::Text(TextSegment::new(GREETING_TEXT)));
        greeting.segments.push(Segment::Sources(SourcesSegment::new(
            GREETING_SOURCES
                .iter()
                .map(|(title, url)| SourceRef {
                    title: title.to_string(),
                    url: url.to_string(),
                })
                .collect(),
        )));
        self.messages.push(greeting);
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}
