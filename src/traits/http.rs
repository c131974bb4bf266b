//! HTTP client trait abstraction.
//!
//! Abstracts the one HTTP operation the client needs, a streaming POST, so
//! tests can inject a scripted transport instead of a live server.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;
use thiserror::Error;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// A streaming response body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// Transport-level HTTP errors.
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Server returned a non-success status.
    #[error("server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// The body stream broke mid-read.
    #[error("IO error: {0}")]
    Io(String),

    /// Anything else.
    #[error("HTTP error: {0}")]
    Other(String),
}

/// Trait for the HTTP operations the chat client performs.
///
/// Implementations: [`crate::adapters::ReqwestHttpClient`] in production,
/// [`crate::adapters::mock::MockHttpClient`] in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a POST request and return the response body as a byte
    /// stream.
    ///
    /// # Arguments
    /// * `url` - The URL to request
    /// * `body` - Request body as a string
    /// * `headers` - Request headers
    ///
    /// # Returns
    /// A stream of body chunks, or an error if the request could not be
    /// issued or the server answered with a non-success status.
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError>;
}
