//! Result type definitions

use crate::pagination::PageItem;
use serde::Serialize;

/// A single normalized search result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Title, possibly containing `<b>` highlight tags
    pub title: String,
    /// Page URL
    pub url: String,
    /// Cleaned description snippet
    pub description: String,
    /// Human-readable site name
    pub site_name: String,
    /// Relative indexing time, e.g. "3 days ago"
    pub timestamp: String,
    /// Authority signal, never negative
    pub page_rank: f64,
    /// Relevance score reported by the index
    pub score: f64,
    /// Summary stored alongside the page
    pub content_summary: String,
}

/// Response of one search request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Results in index relevance order
    pub results: Vec<SearchResult>,
    /// Total number of matches across all pages
    pub total: u64,
    /// Wall-clock time spent serving the request
    pub took_millis: u64,
    pub page: u32,
    pub total_pages: u64,
    /// Page links for navigation
    pub page_window: Vec<PageItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whether a crawl job is running for this query
    pub crawl_triggered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}
