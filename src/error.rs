//! Error taxonomy for search orchestration
//!
//! Every failure a caller can observe maps onto one [`SearchError`] variant.
//! Public messages are short and stable; the underlying causes are kept as
//! error sources so they can be logged, but they are never serialized.

use crate::crawler::{CrawlError, STATUS_UNAVAILABLE};
use crate::index::IndexError;
use std::sync::Arc;

/// Errors produced while serving a search or crawl request
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The request itself is malformed (blank text, bad pagination)
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The index health probe reported an unhealthy or unreachable cluster
    #[error("search index is unavailable")]
    IndexUnavailable,

    /// The index accepted the query but it failed
    #[error("search query failed")]
    IndexQuery(#[source] IndexError),

    /// The crawler service could not be reached or rejected the request
    #[error("crawl request failed")]
    CrawlSubmission(#[source] Arc<CrawlError>),

    /// The crawler has no job with the requested id
    #[error("crawl job not found: {0}")]
    JobNotFound(String),

    /// The crawler could not report a job's status
    #[error("crawl status lookup failed")]
    CrawlStatus(#[source] CrawlError),

    /// Anything not covered above
    #[error("unexpected error")]
    Unexpected(#[source] anyhow::Error),
}

impl SearchError {
    /// HTTP status code the web layer answers with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidQuery(_) => 400,
            Self::IndexUnavailable | Self::IndexQuery(_) => 503,
            Self::JobNotFound(_) => 404,
            Self::CrawlSubmission(_) | Self::CrawlStatus(_) => 502,
            Self::Unexpected(_) => 500,
        }
    }

    /// Short message that is safe to show to callers
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidQuery(reason) => reason.clone(),
            Self::IndexUnavailable => "Search service is currently unavailable".to_string(),
            Self::IndexQuery(_) => "Search operation failed".to_string(),
            Self::CrawlSubmission(err) => err.public_message(),
            Self::JobNotFound(_) => "Crawl job not found".to_string(),
            Self::CrawlStatus(_) => STATUS_UNAVAILABLE.to_string(),
            Self::Unexpected(_) => "An unexpected error occurred".to_string(),
        }
    }
}

impl From<IndexError> for SearchError {
    fn from(err: IndexError) -> Self {
        Self::IndexQuery(err)
    }
}

impl From<CrawlError> for SearchError {
    fn from(err: CrawlError) -> Self {
        Self::CrawlSubmission(Arc::new(err))
    }
}

impl From<Arc<CrawlError>> for SearchError {
    fn from(err: Arc<CrawlError>) -> Self {
        Self::CrawlSubmission(err)
    }
}

impl From<anyhow::Error> for SearchError {
    fn from(err: anyhow::Error) -> Self {
        Self::Unexpected(err)
    }
}

impl SearchError {
    /// Classify a failed job status lookup
    pub fn from_status_lookup(err: CrawlError) -> Self {
        match err {
            CrawlError::NotFound(job_id) => Self::JobNotFound(job_id),
            other => Self::CrawlStatus(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(SearchError::InvalidQuery("x".into()).status_code(), 400);
        assert_eq!(SearchError::IndexUnavailable.status_code(), 503);
        assert_eq!(
            SearchError::IndexQuery(IndexError::Status {
                status: 500,
                body: String::new()
            })
            .status_code(),
            503
        );
        assert_eq!(
            SearchError::from(CrawlError::Status(502)).status_code(),
            502
        );
        assert_eq!(
            SearchError::Unexpected(anyhow::anyhow!("boom")).status_code(),
            500
        );
    }

    #[test]
    fn test_public_message_does_not_leak_cause() {
        let err = SearchError::IndexQuery(IndexError::Status {
            status: 500,
            body: "shard failure at node-7 /var/lib/es".into(),
        });
        let message = err.public_message();
        assert_eq!(message, "Search operation failed");
        assert!(!message.contains("node-7"));

        let err = SearchError::Unexpected(anyhow::anyhow!("secret path /etc/passwd"));
        assert!(!err.public_message().contains("passwd"));
    }

    #[test]
    fn test_source_is_preserved() {
        use std::error::Error;

        let err = SearchError::IndexQuery(IndexError::Decode("bad json".into()));
        let source = err.source().expect("source");
        assert!(source.to_string().contains("bad json"));
    }

    #[test]
    fn test_status_lookup_failures() {
        let err = SearchError::from_status_lookup(CrawlError::NotFound("job-1".into()));
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.public_message(), "Crawl job not found");

        let err = SearchError::from_status_lookup(CrawlError::Status(500));
        assert_eq!(err.status_code(), 502);
        assert_eq!(err.public_message(), "Failed to check crawl status");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
