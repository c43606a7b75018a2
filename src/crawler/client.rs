//! Crawler service transport
//!
//! A thin wrapper: each call is exactly one request/response round trip and
//! every failure is returned to the caller.

use super::types::{CrawlJob, CrawlOptions, ErrorReply, JobStatus, StatusReply, SubmitReply};
use crate::config::{secs_to_duration, CrawlerSettings};
use crate::network::{join_url, HttpClient, HttpRequest, HttpResponse};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

/// Message shown when the crawler failed without saying why
pub const CRAWL_UNAVAILABLE: &str = "Failed to start crawling process";

/// Message shown when a job status lookup failed
pub const STATUS_UNAVAILABLE: &str = "Failed to check crawl status";

/// Message shown when the crawler declined a query without saying why
pub const CRAWL_DECLINED: &str = "The crawler did not start a crawl for this query";

/// Failures talking to the crawler service
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// The request never produced a response
    #[error("crawler transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status without an explanation
    #[error("crawler returned HTTP {0}")]
    Status(u16),

    /// The crawler refused the request and said why
    #[error("crawler rejected the request: {0}")]
    Rejected(String),

    /// The crawler has no job with this id
    #[error("crawl job not found: {0}")]
    NotFound(String),

    /// The reply could not be understood
    #[error("failed to decode crawler response: {0}")]
    Decode(String),
}

impl CrawlError {
    /// Message that can be shown to users
    pub fn public_message(&self) -> String {
        match self {
            Self::Rejected(message) => message.clone(),
            Self::NotFound(_) => "Crawl job not found".to_string(),
            _ => CRAWL_UNAVAILABLE.to_string(),
        }
    }
}

/// Operations the orchestrator needs from the crawler
#[async_trait]
pub trait CrawlService: Send + Sync {
    /// Submit a crawl job for `query`
    async fn submit(&self, query: &str, options: &CrawlOptions) -> Result<CrawlJob, CrawlError>;

    /// Fetch the current snapshot of a job
    async fn poll_status(&self, job_id: &str) -> Result<CrawlJob, CrawlError>;
}

/// HTTP client for the crawler service
#[derive(Clone)]
pub struct CrawlerClient {
    http: HttpClient,
    base_url: String,
    submit_path: String,
    status_path: String,
    timeout: Duration,
}

impl CrawlerClient {
    pub fn new(http: HttpClient, settings: &CrawlerSettings) -> Self {
        Self {
            http,
            base_url: settings.url.clone(),
            submit_path: settings.submit_path.clone(),
            status_path: settings.status_path.clone(),
            timeout: secs_to_duration(settings.request_timeout, 0.001),
        }
    }

    fn submit_url(&self) -> String {
        join_url(&self.base_url, &self.submit_path)
    }

    fn status_url(&self, job_id: &str) -> String {
        let path = format!(
            "{}/{}",
            self.status_path.trim_end_matches('/'),
            urlencoding::encode(job_id)
        );
        join_url(&self.base_url, &path)
    }

    /// Turn a non-success response into the matching error
    fn failure(response: &HttpResponse) -> CrawlError {
        match response.json::<ErrorReply>() {
            Ok(reply) if !reply.message.trim().is_empty() => CrawlError::Rejected(reply.message),
            _ => CrawlError::Status(response.status),
        }
    }
}

#[async_trait]
impl CrawlService for CrawlerClient {
    async fn submit(&self, query: &str, options: &CrawlOptions) -> Result<CrawlJob, CrawlError> {
        let body = json!({
            "query": query,
            "max_depth": options.max_depth,
            "max_pages": options.max_pages,
            "priority": options.priority,
            "force_crawl": options.force_crawl,
        });

        let request = HttpRequest::post(self.submit_url())
            .json(body)
            .timeout(self.timeout);
        let response = self.http.execute(request).await?;

        if !response.is_success() {
            return Err(Self::failure(&response));
        }

        let reply: SubmitReply = response
            .json()
            .map_err(|e| CrawlError::Decode(e.to_string()))?;

        let status = match reply.status.as_deref() {
            None => JobStatus::Queued,
            Some(raw) => JobStatus::parse(raw)
                .ok_or_else(|| CrawlError::Decode(format!("unknown job status '{}'", raw)))?,
        };

        // `no_results` means the crawler looked at the query and chose not to crawl.
        let declined = reply
            .status
            .as_deref()
            .is_some_and(|raw| raw.trim().eq_ignore_ascii_case("no_results"));

        if status == JobStatus::Error || declined {
            let fallback = if declined { CRAWL_DECLINED } else { CRAWL_UNAVAILABLE };
            return Err(CrawlError::Rejected(
                reply
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| fallback.to_string()),
            ));
        }

        let job_id = reply
            .job_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| CrawlError::Decode("reply carries no job id".to_string()))?;

        info!("Crawl job {} submitted for '{}'", job_id, query);

        Ok(CrawlJob {
            job_id,
            query: query.to_string(),
            status,
            pages_crawled: 0,
            estimated_remaining_seconds: None,
        })
    }

    async fn poll_status(&self, job_id: &str) -> Result<CrawlJob, CrawlError> {
        let request = HttpRequest::get(self.status_url(job_id)).timeout(self.timeout);
        let response = self.http.execute(request).await?;

        if response.status == 404 {
            return Err(CrawlError::NotFound(job_id.to_string()));
        }
        if !response.is_success() {
            return Err(Self::failure(&response));
        }

        let reply: StatusReply = response
            .json()
            .map_err(|e| CrawlError::Decode(e.to_string()))?;
        let status = JobStatus::parse(&reply.status)
            .ok_or_else(|| CrawlError::Decode(format!("unknown job status '{}'", reply.status)))?;

        debug!("Crawl job {} is {:?}", job_id, status);

        Ok(CrawlJob {
            job_id: reply
                .job_id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| job_id.to_string()),
            query: reply.query.unwrap_or_default(),
            status,
            pages_crawled: reply.pages_crawled.unwrap_or(0),
            estimated_remaining_seconds: reply
                .estimated_time_remaining
                .filter(|secs| secs.is_finite() && *secs >= 0.0),
        })
    }
}
