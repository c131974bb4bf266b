//! Flowchat - a terminal client for a plan-and-execute agent backend.
//!
//! The crate reconstructs the backend's NDJSON event stream into ordered,
//! typed message segments: text, reasoning, tool calls, task plans,
//! execution logs, and sources.

pub mod adapters;
pub mod cli_output;
pub mod client;
pub mod models;
pub mod ndjson;
pub mod reducer;
pub mod session;
pub mod state;
pub mod traits;
