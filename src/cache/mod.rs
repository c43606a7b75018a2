//! Caching module for crawlsearch
//!
//! Remembers recently submitted crawl jobs so that repeated or concurrent
//! empty searches for the same query share one job instead of flooding the
//! crawler with duplicates.

use crate::crawler::{CrawlError, CrawlJob};
use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Recently submitted crawl jobs keyed by normalized query
#[derive(Clone)]
pub struct CrawlJobCache {
    cache: Cache<String, CrawlJob>,
}

impl CrawlJobCache {
    /// Create a cache whose entries expire after `window`
    pub fn new(window: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(window)
            .max_capacity(max_capacity)
            .build();

        Self { cache }
    }

    /// Return the job remembered for `query`, or run `submit` and remember its job.
    ///
    /// Concurrent callers for the same key wait on a single `submit`; failures
    /// are handed to every waiter and are not remembered.
    pub async fn get_or_submit<F>(&self, query: &str, submit: F) -> Result<CrawlJob, Arc<CrawlError>>
    where
        F: Future<Output = Result<CrawlJob, CrawlError>>,
    {
        self.cache.try_get_with(query_cache_key(query), submit).await
    }

    /// Job remembered for `query`, if any
    pub async fn get(&self, query: &str) -> Option<CrawlJob> {
        self.cache.get(&query_cache_key(query)).await
    }
}

impl Default for CrawlJobCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(60), 10_000)
    }
}

/// Generate a cache key for a query: case and whitespace do not matter
pub fn query_cache_key(query: &str) -> String {
    use sha2::{Digest, Sha256};

    let normalized = query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());

    format!("{:x}", hasher.finalize())
}
