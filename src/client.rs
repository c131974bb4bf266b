//! Chat API client for backend communication.
//!
//! Issues one `POST /api/chat` per turn and exposes the chunked NDJSON
//! response as a stream of typed [`StreamEvent`]s. Malformed lines are
//! logged and skipped, unknown event kinds are ignored; only transport
//! failures surface as stream errors.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::stream::{self, Stream};
use futures_util::StreamExt;
use thiserror::Error;

use crate::adapters::ReqwestHttpClient;
use crate::models::ChatRequest;
use crate::ndjson::{parse_event, LineDecoder, StreamEvent};
use crate::traits::{Headers, HttpClient, HttpError};

/// Default backend base URL; override with `FLOWCHAT_BASE_URL`.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Error type for chat client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request or transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Request serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A stream of typed events for one turn.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, ClientError>> + Send>>;

/// Client for the chat backend.
pub struct ChatClient {
    /// Base URL for the backend API.
    pub base_url: String,
    http: Arc<dyn HttpClient>,
}

impl ChatClient {
    /// Create a client against the default base URL.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    /// Create a client against a custom base URL.
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url,
            http: Arc::new(ReqwestHttpClient::new()),
        }
    }

    /// Create a client with an injected transport. Used by tests.
    pub fn with_http_client(base_url: String, http: Arc<dyn HttpClient>) -> Self {
        Self { base_url, http }
    }

    /// Open the event stream for one turn.
    ///
    /// Sends the request and returns a stream that frames the chunked
    /// response body into lines, interprets each line, and yields typed
    /// events. The stream ends after the transport closes; a `done` event
    /// is expected but not enforced here.
    pub async fn stream_events(&self, request: &ChatRequest) -> Result<EventStream, ClientError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = serde_json::to_string(request)?;

        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/x-ndjson".to_string());

        let bytes_stream = self.http.post_stream(&url, &body, &headers).await?;

        let event_stream = stream::unfold(
            (bytes_stream, LineDecoder::new(), VecDeque::new()),
            |(mut bytes_stream, mut decoder, mut pending)| async move {
                loop {
                    if let Some(event) = pending.pop_front() {
                        return Some((Ok(event), (bytes_stream, decoder, pending)));
                    }

                    match bytes_stream.next().await {
                        Some(Ok(chunk)) => {
                            for line in decoder.push_chunk(&chunk) {
                                match parse_event(&line) {
                                    Ok(Some(event)) => {
                                        tracing::trace!(
                                            event = event.event_type_name(),
                                            "decoded stream frame"
                                        );
                                        pending.push_back(event);
                                    }
                                    Ok(None) => {
                                        tracing::debug!(
                                            line_len = line.len(),
                                            "ignoring unrecognized stream frame"
                                        );
                                    }
                                    Err(e) => {
                                        tracing::warn!(
                                            error = %e,
                                            line_len = line.len(),
                                            "skipping malformed stream frame"
                                        );
                                    }
                                }
                            }
                        }
                        Some(Err(e)) => {
                            return Some((
                                Err(ClientError::Http(e)),
                                (bytes_stream, decoder, pending),
                            ));
                        }
                        None => {
                            if let Some(rest) = decoder.finish() {
                                tracing::warn!(
                                    bytes = rest.len(),
                                    "discarding incomplete trailing frame"
                                );
                            }
                            return None;
                        }
                    }
                }
            },
        );

        Ok(Box::pin(event_stream))
    }
}

impl Default for ChatClient {
    fn default() -> Self {
        Self::new()
    }
}
