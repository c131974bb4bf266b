//! Trait abstractions for dependency injection.

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError};
