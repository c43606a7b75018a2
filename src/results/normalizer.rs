//! Mapping of raw index hits onto [`SearchResult`]
//!
//! Every field has a fallback chain ending in a fixed default, so a hit with
//! missing or mistyped fields still produces a result and never fails the
//! page it belongs to.

use super::relative_time::{format_relative, parse_timestamp};
use super::types::SearchResult;
use crate::index::RawHit;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_SITE: &str = "Unknown";
pub const UNKNOWN_TIME: &str = "Unknown time";

static EDIT_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[\s*edit\s*\]").expect("edit marker regex"));
static JUMP_TO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Jump to (navigation|search)").expect("jump-to regex"));

/// Converts hits into results relative to a fixed reference instant.
///
/// All results of one response share the instant, which keeps the mapping
/// a pure function of the hit.
#[derive(Debug, Clone, Copy)]
pub struct ResultNormalizer {
    now: DateTime<Utc>,
}

impl ResultNormalizer {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Normalizer anchored at the current time
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// Normalize a page of hits, keeping their order
    pub fn normalize_all(&self, hits: &[RawHit]) -> Vec<SearchResult> {
        hits.iter().map(|hit| self.normalize(hit)).collect()
    }

    pub fn normalize(&self, hit: &RawHit) -> SearchResult {
        let webpage_id = non_empty(hit.source_str("webpage_id"));

        let title = non_empty(hit.fragment("title"))
            .or_else(|| non_empty(hit.source_str("title")))
            .unwrap_or(UNTITLED)
            .to_string();

        let url = webpage_id
            .or_else(|| non_empty(hit.id.as_deref()))
            .unwrap_or_default()
            .to_string();

        let description = non_empty(hit.fragment("meta_description"))
            .or_else(|| non_empty(hit.fragment("body")))
            .or_else(|| non_empty(hit.source_str("meta_description")))
            .or_else(|| non_empty(hit.source_str("content_summary")))
            .map(clean_description)
            .unwrap_or_default();

        let site_name = non_empty(hit.source_path_str(&["metadata", "site_name"]))
            .map(str::to_string)
            .or_else(|| webpage_id.and_then(url_host))
            .unwrap_or_else(|| UNKNOWN_SITE.to_string());

        SearchResult {
            title,
            url,
            description,
            site_name,
            timestamp: self.timestamp(hit),
            page_rank: page_rank(hit),
            score: hit.score.filter(|s| s.is_finite()).unwrap_or(0.0),
            content_summary: hit
                .source_str("content_summary")
                .unwrap_or_default()
                .to_string(),
        }
    }

    fn timestamp(&self, hit: &RawHit) -> String {
        let Some(raw) = hit.source_str("indexed_at") else {
            return UNKNOWN_TIME.to_string();
        };

        match parse_timestamp(raw) {
            Some(indexed_at) => format_relative(indexed_at, self.now),
            None => {
                debug!("Unparsable indexed_at value: {:?}", raw);
                UNKNOWN_TIME.to_string()
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn page_rank(hit: &RawHit) -> f64 {
    hit.source_f64("page_rank")
        .filter(|rank| rank.is_finite() && *rank > 0.0)
        .unwrap_or(0.0)
}

/// Host of an absolute http(s) URL
fn url_host(candidate: &str) -> Option<String> {
    let url = Url::parse(candidate).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.host_str().map(str::to_string)
}

/// Strip wiki boilerplate from a description
pub fn clean_description(raw: &str) -> String {
    let without_edit = EDIT_MARKER.replace_all(raw, "");
    JUMP_TO.replace_all(&without_edit, "").trim().to_string()
}
