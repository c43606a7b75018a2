//! Crawl job data model and crawler wire formats

use serde::{Deserialize, Serialize};

/// Parameters of a crawl submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrawlOptions {
    /// Link depth to follow from the seed pages
    pub max_depth: u32,
    /// Upper bound on fetched pages
    pub max_pages: u32,
    /// Jump the crawler queue
    pub priority: bool,
    /// Crawl even if the crawler thinks the query is already covered
    pub force_crawl: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_pages: 100,
            priority: true,
            force_crawl: true,
        }
    }
}

/// Lifecycle state of a crawl job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Started,
    Completed,
    Error,
}

impl JobStatus {
    /// Map the crawler's status vocabulary onto the four states
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "queued" | "starting" | "pending" => Some(Self::Queued),
            "started" | "in_progress" | "running" => Some(Self::Started),
            "completed" | "complete" | "done" | "no_results" => Some(Self::Completed),
            "error" | "failed" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Snapshot of a crawl job as last reported by the crawler
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlJob {
    /// Opaque identifier assigned by the crawler
    pub job_id: String,
    /// Query the job was submitted for; empty when the crawler does not echo it
    pub query: String,
    pub status: JobStatus,
    pub pages_crawled: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_remaining_seconds: Option<f64>,
}

/// Body of a submit reply
#[derive(Debug, Deserialize)]
pub(crate) struct SubmitReply {
    #[serde(default, alias = "jobId")]
    pub job_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of a status reply
#[derive(Debug, Deserialize)]
pub(crate) struct StatusReply {
    #[serde(default, alias = "jobId")]
    pub job_id: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    pub status: String,
    #[serde(default, alias = "pagesProcessed", alias = "pagesCrawled")]
    pub pages_crawled: Option<u64>,
    #[serde(
        default,
        alias = "estimatedTimeRemaining",
        alias = "estimated_remaining_seconds"
    )]
    pub estimated_time_remaining: Option<f64>,
}

/// Error body some crawler failures carry
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorReply {
    #[serde(alias = "error")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_vocabulary() {
        assert_eq!(JobStatus::parse("queued"), Some(JobStatus::Queued));
        assert_eq!(JobStatus::parse("starting"), Some(JobStatus::Queued));
        assert_eq!(JobStatus::parse("in_progress"), Some(JobStatus::Started));
        assert_eq!(JobStatus::parse("STARTED"), Some(JobStatus::Started));
        assert_eq!(JobStatus::parse("completed"), Some(JobStatus::Completed));
        assert_eq!(JobStatus::parse("error"), Some(JobStatus::Error));
        assert_eq!(JobStatus::parse("exploded"), None);
    }

    #[test]
    fn test_job_serializes_camel_case() {
        let job = CrawlJob {
            job_id: "job-1".to_string(),
            query: "rust".to_string(),
            status: JobStatus::Started,
            pages_crawled: 4,
            estimated_remaining_seconds: Some(12.5),
        };
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["jobId"], "job-1");
        assert_eq!(json["status"], "started");
        assert_eq!(json["pagesCrawled"], 4);
        assert_eq!(json["estimatedRemainingSeconds"], 12.5);
    }

    #[test]
    fn test_status_reply_aliases() {
        let reply: StatusReply = serde_json::from_str(
            r#"{"jobId": "a", "status": "started", "pagesProcessed": 7, "estimatedTimeRemaining": 3}"#,
        )
        .unwrap();
        assert_eq!(reply.job_id.as_deref(), Some("a"));
        assert_eq!(reply.pages_crawled, Some(7));
        assert_eq!(reply.estimated_time_remaining, Some(3.0));

        let reply: StatusReply = serde_json::from_str(
            r#"{"job_id": "b", "status": "completed", "pages_crawled": 12, "queue_size": 0}"#,
        )
        .unwrap();
        assert_eq!(reply.job_id.as_deref(), Some("b"));
        assert_eq!(reply.pages_crawled, Some(12));
    }
}
