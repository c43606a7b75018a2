//! Search index transport

use super::hit::{ClusterHealth, IndexResponse};
use super::query::IndexRequest;
use crate::config::{secs_to_duration, IndexSettings};
use crate::network::{join_url, HttpClient, HttpRequest};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Failures talking to the index
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The request never produced a response
    #[error("index transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The index answered with a non-success status
    #[error("index returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not a search response
    #[error("failed to decode index response: {0}")]
    Decode(String),
}

/// Operations the orchestrator needs from a search index
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Liveness probe; never fails, unreachable counts as unhealthy
    async fn is_healthy(&self) -> bool;

    /// Run one query and return the raw page of hits
    async fn search(&self, request: &IndexRequest) -> Result<IndexResponse, IndexError>;
}

/// Elasticsearch-compatible index client
#[derive(Clone)]
pub struct IndexClient {
    http: HttpClient,
    base_url: String,
    index_name: String,
    timeout: Duration,
}

impl IndexClient {
    pub fn new(http: HttpClient, settings: &IndexSettings) -> Self {
        Self {
            http,
            base_url: settings.url.clone(),
            index_name: settings.index_name.clone(),
            timeout: secs_to_duration(settings.request_timeout, 0.001),
        }
    }

    fn search_url(&self) -> String {
        join_url(&self.base_url, &format!("{}/_search", self.index_name))
    }

    fn health_url(&self) -> String {
        join_url(&self.base_url, "_cluster/health")
    }

    /// Fetch the cluster health report
    pub async fn health(&self) -> Result<ClusterHealth, IndexError> {
        let request = HttpRequest::get(self.health_url()).timeout(self.timeout);
        let response = self.http.execute(request).await?;

        if !response.is_success() {
            return Err(IndexError::Status {
                status: response.status,
                body: response.text,
            });
        }

        response
            .json()
            .map_err(|e| IndexError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SearchIndex for IndexClient {
    async fn is_healthy(&self) -> bool {
        match self.health().await {
            Ok(health) => {
                debug!("Index health: {}", health.status);
                health.is_healthy()
            }
            Err(e) => {
                warn!("Index health check failed: {}", e);
                false
            }
        }
    }

    async fn search(&self, request: &IndexRequest) -> Result<IndexResponse, IndexError> {
        let http_request = HttpRequest::post(self.search_url())
            .json(request.body.clone())
            .timeout(self.timeout);

        let response = self.http.execute(http_request).await?;

        if !response.is_success() {
            return Err(IndexError::Status {
                status: response.status,
                body: response.text,
            });
        }

        response
            .json()
            .map_err(|e| IndexError::Decode(e.to_string()))
    }
}
