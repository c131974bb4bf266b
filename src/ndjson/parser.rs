//! Frame interpretation: one decoded line into one typed event.

use thiserror::Error;

use super::events::StreamEvent;

/// Errors from interpreting a single frame.
///
/// These are always recoverable: the caller logs the error, drops the line,
/// and keeps consuming the stream.
#[derive(Debug, Error)]
pub enum EventParseError {
    /// The line was not valid JSON.
    #[error("invalid JSON frame: {message}")]
    InvalidJson { message: String },

    /// The frame carried no `type` discriminator.
    #[error("frame missing `type` discriminator")]
    MissingType,

    /// The `type` was recognized but the payload did not match its shape.
    #[error("invalid payload for `{event_type}` frame: {message}")]
    InvalidPayload {
        event_type: String,
        message: String,
    },
}

/// Interpret one decoded line as a stream event.
///
/// Returns `Ok(None)` for frames with an unrecognized `type` value, which
/// the protocol defines as a no-op rather than an error.
pub fn parse_event(line: &str) -> Result<Option<StreamEvent>, EventParseError> {
    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|e| EventParseError::InvalidJson {
            message: e.to_string(),
        })?;

    let event_type = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .ok_or(EventParseError::MissingType)?;

    if !StreamEvent::KNOWN_TYPES.contains(&event_type) {
        return Ok(None);
    }

    let event_type = event_type.to_string();
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| EventParseError::InvalidPayload {
            event_type,
            message: e.to_string(),
        })
}
