//! HTTP request handlers

use super::state::AppState;
use crate::crawler::{CrawlJob, CrawlOptions, JobStatus};
use crate::error::SearchError;
use crate::results::SearchResponse;
use crate::search::SearchQuery;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Query parameters for search
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Search query
    pub q: Option<String>,
    /// Page number, 1-based
    pub page: Option<String>,
    /// Results per page
    pub size: Option<String>,
    /// Wait once for a triggered crawl before answering
    #[serde(rename = "waitForCrawl")]
    pub wait_for_crawl: Option<String>,
}

/// Body of a direct crawl request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRequest {
    #[serde(default)]
    pub query: String,
    pub max_depth: Option<u32>,
    pub max_pages: Option<u32>,
    pub priority: Option<bool>,
    pub force_crawl: Option<bool>,
}

impl CrawlRequest {
    fn options(&self, defaults: CrawlOptions) -> CrawlOptions {
        CrawlOptions {
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            max_pages: self.max_pages.unwrap_or(defaults.max_pages),
            priority: self.priority.unwrap_or(defaults.priority),
            force_crawl: self.force_crawl.unwrap_or(defaults.force_crawl),
        }
    }
}

/// Reply to an accepted crawl request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlAccepted {
    pub job_id: String,
    pub status: JobStatus,
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!("Request failed: {:?}", self);
        }

        let body = serde_json::json!({ "error": self.public_message() });
        (status, Json(body)).into_response()
    }
}

/// Search handler
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, SearchError> {
    let page = parse_number(params.page.as_deref(), 1, "page")?;
    let size = parse_number(
        params.size.as_deref(),
        state.settings.search.default_page_size,
        "size",
    )?;
    let query = SearchQuery::new(params.q.unwrap_or_default(), page, size)?;
    let wait_for_crawl = parse_flag(params.wait_for_crawl.as_deref());

    let span = info_span!(
        "search",
        request_id = %Uuid::new_v4(),
        query = %query.text(),
        page = query.page()
    );

    let report = state
        .orchestrator
        .search(&query, wait_for_crawl)
        .instrument(span)
        .await?;

    Ok(Json(report.response))
}

/// Submit a crawl job directly
pub async fn crawl(
    State(state): State<AppState>,
    payload: Result<Json<CrawlRequest>, JsonRejection>,
) -> Result<Json<CrawlAccepted>, SearchError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected crawl request body: {}", rejection.body_text());
        SearchError::InvalidQuery("Request body must be a JSON object with a query".to_string())
    })?;

    let query = request.query.trim();
    if query.is_empty() {
        return Err(SearchError::InvalidQuery("Query is required".to_string()));
    }

    let options = request.options(state.settings.crawler.crawl_options());
    let job = state.crawler.submit(query, &options).await.map_err(|e| {
        warn!("Direct crawl submission failed: {}", e);
        SearchError::from(e)
    })?;

    info!("Crawl job {} accepted for '{}'", job.job_id, query);

    Ok(Json(CrawlAccepted {
        job_id: job.job_id,
        status: job.status,
    }))
}

/// Current status of a crawl job
pub async fn crawl_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<CrawlJob>, SearchError> {
    let job = state.crawler.poll_status(&job_id).await.map_err(|e| {
        warn!("Status lookup for job {} failed: {}", job_id, e);
        SearchError::from_status_lookup(e)
    })?;

    Ok(Json(job))
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let index = state.index.is_healthy().await;

    Json(serde_json::json!({
        "status": if index { "ok" } else { "degraded" },
        "version": crate::VERSION,
        "index": index,
    }))
}

/// Counters since startup
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}

/// Parse an optional numeric parameter; absent or empty means `default`
fn parse_number(raw: Option<&str>, default: u32, name: &str) -> Result<u32, SearchError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| SearchError::InvalidQuery(format!("Invalid {} parameter", name))),
    }
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true") | Some("1") | Some("yes")
    )
}
