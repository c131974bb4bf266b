//! Concrete implementations of the trait abstractions.

pub mod mock;
pub mod reqwest_http;

pub use reqwest_http::ReqwestHttpClient;
