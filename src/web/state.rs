//! Application state shared across handlers

use crate::config::Settings;
use crate::crawler::{CrawlService, CrawlerClient};
use crate::index::{IndexClient, SearchIndex};
use crate::metrics::Metrics;
use crate::network::HttpClient;
use crate::search::SearchOrchestrator;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search with crawl fallback
    pub orchestrator: Arc<SearchOrchestrator>,
    /// Index used for liveness reporting
    pub index: Arc<dyn SearchIndex>,
    /// Crawler used by the direct crawl endpoints
    pub crawler: Arc<dyn CrawlService>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create application state talking to the configured services.
    ///
    /// Cancelling `shutdown` ends every pending crawl wait.
    pub fn new(settings: Settings, client: HttpClient, shutdown: CancellationToken) -> Self {
        let index: Arc<dyn SearchIndex> = Arc::new(IndexClient::new(client.clone(), &settings.index));
        let crawler: Arc<dyn CrawlService> = Arc::new(CrawlerClient::new(client, &settings.crawler));

        Self::with_backends(settings, index, crawler, shutdown)
    }

    /// Create application state over arbitrary index and crawler implementations
    pub fn with_backends(
        settings: Settings,
        index: Arc<dyn SearchIndex>,
        crawler: Arc<dyn CrawlService>,
        shutdown: CancellationToken,
    ) -> Self {
        let metrics = Arc::new(Metrics::new());
        let orchestrator = SearchOrchestrator::from_settings(index.clone(), crawler.clone(), &settings)
            .with_metrics(metrics.clone())
            .with_shutdown(shutdown);

        Self {
            settings: Arc::new(settings),
            orchestrator: Arc::new(orchestrator),
            index,
            crawler,
            metrics,
        }
    }
}
