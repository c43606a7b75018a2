//! Search orchestration module
//!
//! Validates search requests, runs them against the index and falls back to
//! the crawler when the index has nothing for a query.

mod models;
mod orchestrator;

pub use models::*;
pub use orchestrator::{Outcome, SearchOrchestrator, SearchReport, CRAWL_STARTED, FOUND_AFTER_CRAWL};
