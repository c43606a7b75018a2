//! Search orchestration with crawl fallback
//!
//! Runs the index query for a request and, when the index has nothing, asks
//! the crawler to fetch content for the query. Callers may opt into a single
//! bounded wait followed by one re-query so that freshly crawled pages can be
//! returned in the same response.

use super::models::SearchQuery;
use crate::cache::CrawlJobCache;
use crate::config::Settings;
use crate::crawler::{CrawlError, CrawlJob, CrawlOptions, CrawlService};
use crate::error::SearchError;
use crate::index::{IndexRequest, QueryBuilder, SearchIndex};
use crate::metrics::Metrics;
use crate::pagination;
use crate::results::{ResultNormalizer, SearchResponse, SearchResult};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Notice attached to results that only exist because of the fallback crawl
pub const FOUND_AFTER_CRAWL: &str =
    "These results were found after crawling the web for your query.";

/// Notice attached to an empty response while a crawl is running
pub const CRAWL_STARTED: &str =
    "No results found yet. Crawling has started for this query, check back later.";

/// Final state a search request ended in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The first query matched documents
    HasResults,
    /// Nothing matched and the crawl could not be submitted
    CrawlFailed,
    /// Nothing matched, a crawl was submitted and the caller did not wait
    CrawlPending,
    /// The re-query after the wait matched documents
    FoundAfterWait,
    /// The re-query after the wait still matched nothing
    StillEmptyAfterWait,
}

/// Response together with the state that produced it
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub outcome: Outcome,
    pub response: SearchResponse,
}

/// One executed index query, normalized
struct QueryPage {
    total: u64,
    results: Vec<SearchResult>,
}

impl QueryPage {
    fn empty() -> Self {
        Self {
            total: 0,
            results: Vec::new(),
        }
    }
}

/// Coordinates the index, the crawler and the bounded wait
pub struct SearchOrchestrator {
    index: Arc<dyn SearchIndex>,
    crawler: Arc<dyn CrawlService>,
    query_builder: QueryBuilder,
    crawl_options: CrawlOptions,
    crawl_wait: Duration,
    max_visible_pages: u32,
    crawl_jobs: Option<CrawlJobCache>,
    metrics: Arc<Metrics>,
    shutdown: CancellationToken,
}

impl SearchOrchestrator {
    /// Create an orchestrator with default policy
    pub fn new(index: Arc<dyn SearchIndex>, crawler: Arc<dyn CrawlService>) -> Self {
        Self {
            index,
            crawler,
            query_builder: QueryBuilder::default(),
            crawl_options: CrawlOptions::default(),
            crawl_wait: Duration::from_secs(5),
            max_visible_pages: 5,
            crawl_jobs: None,
            metrics: Arc::new(Metrics::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Create an orchestrator configured from settings
    pub fn from_settings(
        index: Arc<dyn SearchIndex>,
        crawler: Arc<dyn CrawlService>,
        settings: &Settings,
    ) -> Self {
        let mut orchestrator = Self::new(index, crawler)
            .with_query_builder(QueryBuilder::from_settings(&settings.search))
            .with_crawl_options(settings.crawler.crawl_options())
            .with_crawl_wait(settings.search.crawl_wait());
        orchestrator.max_visible_pages = settings.search.max_visible_pages;
        orchestrator.with_crawl_dedupe(settings.search.crawl_dedupe_window())
    }

    pub fn with_query_builder(mut self, query_builder: QueryBuilder) -> Self {
        self.query_builder = query_builder;
        self
    }

    pub fn with_crawl_options(mut self, options: CrawlOptions) -> Self {
        self.crawl_options = options;
        self
    }

    /// Set the delay before the single re-query
    pub fn with_crawl_wait(mut self, wait: Duration) -> Self {
        self.crawl_wait = wait;
        self
    }

    /// Share crawl jobs between searches for the same query within `window`
    pub fn with_crawl_dedupe(mut self, window: Option<Duration>) -> Self {
        self.crawl_jobs = window.map(|w| CrawlJobCache::new(w, 10_000));
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Cancelling `token` ends every pending crawl wait immediately
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Serve one search request.
    ///
    /// Index failures are returned as errors; crawler failures are folded
    /// into a successful, empty response that explains what happened.
    pub async fn search(
        &self,
        query: &SearchQuery,
        wait_for_crawl: bool,
    ) -> Result<SearchReport, SearchError> {
        let started = Instant::now();
        self.metrics.inc_search();

        let request = self.query_builder.build(query)?;

        if !self.index.is_healthy().await {
            self.metrics.record_unavailable();
            warn!("Index is unhealthy, refusing search");
            return Err(SearchError::IndexUnavailable);
        }

        let page = self.run_query(query, &request).await?;
        if page.total > 0 {
            debug!("Index returned {} of {} hits", page.results.len(), page.total);
            return Ok(self.report(Outcome::HasResults, query, page, started, None, None));
        }

        self.metrics.record_empty();
        info!("No results, submitting crawl job");

        let job = match self.submit_crawl(query.text()).await {
            Ok(job) => job,
            Err(err) => {
                self.metrics.record_crawl_failure();
                warn!("Crawl submission failed: {}", err);
                let message = format!("No results found. {}", err.public_message());
                return Ok(self.report(
                    Outcome::CrawlFailed,
                    query,
                    QueryPage::empty(),
                    started,
                    Some(message),
                    None,
                ));
            }
        };
        self.metrics.record_crawl_triggered();

        if !wait_for_crawl {
            return Ok(self.report(
                Outcome::CrawlPending,
                query,
                QueryPage::empty(),
                started,
                Some(CRAWL_STARTED.to_string()),
                Some(&job),
            ));
        }

        if !self.wait_for_crawl(&job).await {
            info!("Crawl wait cancelled for job {}", job.job_id);
            return Ok(self.report(
                Outcome::CrawlPending,
                query,
                QueryPage::empty(),
                started,
                Some(CRAWL_STARTED.to_string()),
                Some(&job),
            ));
        }

        let retry = self.run_query(query, &request).await?;
        if retry.total > 0 {
            self.metrics.record_found_after_wait();
            info!("Found {} results after crawl job {}", retry.total, job.job_id);
            Ok(self.report(
                Outcome::FoundAfterWait,
                query,
                retry,
                started,
                Some(FOUND_AFTER_CRAWL.to_string()),
                Some(&job),
            ))
        } else {
            self.metrics.record_still_empty_after_wait();
            info!("Still no results after waiting on crawl job {}", job.job_id);
            Ok(self.report(
                Outcome::StillEmptyAfterWait,
                query,
                QueryPage::empty(),
                started,
                Some(CRAWL_STARTED.to_string()),
                Some(&job),
            ))
        }
    }

    /// Execute and normalize one index query
    async fn run_query(
        &self,
        query: &SearchQuery,
        request: &IndexRequest,
    ) -> Result<QueryPage, SearchError> {
        let started = Instant::now();

        let response = match self.index.search(request).await {
            Ok(response) => response,
            Err(e) => {
                self.metrics.record_index_error();
                error!("Index query failed: {}", e);
                return Err(SearchError::IndexQuery(e));
            }
        };
        self.metrics
            .record_index_query(started.elapsed().as_millis() as u64);

        let mut results = ResultNormalizer::now().normalize_all(&response.hits);
        results.truncate(query.page_size() as usize);
        let total = response.total.max(results.len() as u64);

        Ok(QueryPage { total, results })
    }

    async fn submit_crawl(&self, text: &str) -> Result<CrawlJob, Arc<CrawlError>> {
        let submit = self.crawler.submit(text, &self.crawl_options);
        match &self.crawl_jobs {
            Some(jobs) => jobs.get_or_submit(text, submit).await,
            None => submit.await.map_err(Arc::new),
        }
    }

    /// Sleep for the configured delay; false when cancelled first
    async fn wait_for_crawl(&self, job: &CrawlJob) -> bool {
        debug!("Waiting {:?} on crawl job {}", self.crawl_wait, job.job_id);
        tokio::select! {
            _ = tokio::time::sleep(self.crawl_wait) => true,
            _ = self.shutdown.cancelled() => false,
        }
    }

    fn report(
        &self,
        outcome: Outcome,
        query: &SearchQuery,
        page: QueryPage,
        started: Instant,
        message: Option<String>,
        job: Option<&CrawlJob>,
    ) -> SearchReport {
        let total_pages = query.total_pages(page.total);
        let window_total = u32::try_from(total_pages).unwrap_or(u32::MAX);

        SearchReport {
            outcome,
            response: SearchResponse {
                results: page.results,
                total: page.total,
                took_millis: started.elapsed().as_millis() as u64,
                page: query.page(),
                total_pages,
                page_window: pagination::window(query.page(), window_total, self.max_visible_pages),
                message,
                crawl_triggered: job.is_some(),
                job_id: job.map(|j| j.job_id.clone()),
            },
        }
    }
}
