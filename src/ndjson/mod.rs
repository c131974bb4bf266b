//! NDJSON stream ingestion: framing bytes into lines and lines into events.
//!
//! The backend answers each turn with a chunked `application/x-ndjson` body,
//! one JSON object per line. [`decoder::LineDecoder`] re-frames arbitrary
//! byte chunks into complete lines; [`parser::parse_event`] interprets each
//! line as a [`events::StreamEvent`]. Malformed lines are recoverable and
//! unknown event kinds are no-ops, so a single bad frame never aborts the
//! stream.

pub mod decoder;
pub mod events;
pub mod parser;

pub use decoder::LineDecoder;
pub use events::{StreamEvent, ToolPayload};
pub use parser::{parse_event, EventParseError};
