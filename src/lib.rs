//! crawlsearch: full-text search over a crawled page index
//!
//! Queries an Elasticsearch-compatible index and, when a query has no
//! matches, submits a crawl job so that the content can be fetched and
//! indexed. Callers can wait once for the crawl and get fresh results in the
//! same response.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod error;
pub mod index;
pub mod metrics;
pub mod network;
pub mod pagination;
pub mod results;
pub mod search;
pub mod web;

pub use config::Settings;
pub use error::SearchError;
pub use results::{SearchResponse, SearchResult};
pub use search::{SearchOrchestrator, SearchQuery};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
