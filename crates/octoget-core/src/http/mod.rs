//! HTTP access for release downloads.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpError};
