//! Metrics collection module
//!
//! Counts orchestration outcomes and tracks index query latency.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counters, updated lock-free from concurrent requests
#[derive(Debug, Default)]
pub struct Metrics {
    searches: AtomicU64,
    unavailable: AtomicU64,
    index_errors: AtomicU64,
    empty_results: AtomicU64,
    crawls_triggered: AtomicU64,
    crawl_failures: AtomicU64,
    found_after_wait: AtomicU64,
    still_empty_after_wait: AtomicU64,
    index_queries: AtomicU64,
    index_query_ms: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment total search count
    pub fn inc_search(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
    }

    /// A search was refused because the index was unhealthy
    pub fn record_unavailable(&self) {
        self.unavailable.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_index_error(&self) {
        self.index_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one completed index query and its latency
    pub fn record_index_query(&self, time_ms: u64) {
        self.index_queries.fetch_add(1, Ordering::Relaxed);
        self.index_query_ms.fetch_add(time_ms, Ordering::Relaxed);
    }

    pub fn record_empty(&self) {
        self.empty_results.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_crawl_triggered(&self) {
        self.crawls_triggered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_crawl_failure(&self) {
        self.crawl_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_found_after_wait(&self) {
        self.found_after_wait.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_still_empty_after_wait(&self) {
        self.still_empty_after_wait.fetch_add(1, Ordering::Relaxed);
    }

    /// Average index query latency in milliseconds
    pub fn avg_index_query_ms(&self) -> Option<u64> {
        let count = self.index_queries.load(Ordering::Relaxed);
        if count == 0 {
            None
        } else {
            Some(self.index_query_ms.load(Ordering::Relaxed) / count)
        }
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            searches: self.searches.load(Ordering::Relaxed),
            unavailable: self.unavailable.load(Ordering::Relaxed),
            index_errors: self.index_errors.load(Ordering::Relaxed),
            empty_results: self.empty_results.load(Ordering::Relaxed),
            crawls_triggered: self.crawls_triggered.load(Ordering::Relaxed),
            crawl_failures: self.crawl_failures.load(Ordering::Relaxed),
            found_after_wait: self.found_after_wait.load(Ordering::Relaxed),
            still_empty_after_wait: self.still_empty_after_wait.load(Ordering::Relaxed),
            index_queries: self.index_queries.load(Ordering::Relaxed),
            avg_index_query_ms: self.avg_index_query_ms(),
        }
    }
}

/// Serializable view of [`Metrics`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub searches: u64,
    pub unavailable: u64,
    pub index_errors: u64,
    pub empty_results: u64,
    pub crawls_triggered: u64,
    pub crawl_failures: u64,
    pub found_after_wait: u64,
    pub still_empty_after_wait: u64,
    pub index_queries: u64,
    pub avg_index_query_ms: Option<u64>,
}
