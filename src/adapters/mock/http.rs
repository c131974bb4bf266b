//! Mock HTTP client for testing.
//!
//! A scriptable transport: tests register the chunk sequence a URL should
//! stream back (including mid-stream errors) and can inspect the requests
//! that were made.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// A recorded request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Headers,
    pub body: String,
}

/// Scripted behavior for one URL.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Stream these items in order, then end the stream.
    Stream(Vec<Result<Bytes, HttpError>>),
    /// Fail the request before any body is produced.
    Error(HttpError),
}

/// Mock [`HttpClient`] returning pre-scripted streams.
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a response for a URL (matched exactly, then by prefix).
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    /// Script a fallback response for unmatched URLs.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Convenience: script a default stream from string chunks.
    pub fn stream_chunks(chunks: &[&str]) -> Self {
        let client = Self::new();
        client.set_default_response(MockResponse::Stream(
            chunks
                .iter()
                .map(|c| Ok(Bytes::from(c.to_string())))
                .collect(),
        ));
        client
    }

    /// All requests made so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn response_for(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }
        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern.as_str()) {
                return Some(response.clone());
            }
        }
        drop(responses);
        self.default_response.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
            body: body.to_string(),
        });

        match self.response_for(url) {
            Some(MockResponse::Stream(items)) => {
                Ok(Box::pin(futures::stream::iter(items)))
            }
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!(
                "no mock response for URL: {}",
                url
            ))),
        }
    }
}
