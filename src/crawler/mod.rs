//! Crawler service access
//!
//! Submits crawl jobs and reads their status from the external crawler.

mod client;
mod types;

pub use client::{
    CrawlError, CrawlService, CrawlerClient, CRAWL_DECLINED, CRAWL_UNAVAILABLE, STATUS_UNAVAILABLE,
};
pub use types::{CrawlJob, CrawlOptions, JobStatus};
