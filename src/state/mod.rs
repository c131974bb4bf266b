//! Conversation state ownership.

pub mod store;

pub use store::ConversationStore;
