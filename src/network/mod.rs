//! HTTP networking module
//!
//! Provides the single HTTP client shared by the index and crawler clients.

mod client;

pub use client::{join_url, HttpClient, HttpMethod, HttpRequest, HttpResponse};
