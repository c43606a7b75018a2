//! Settings structures for crawlsearch configuration

use crate::crawler::CrawlOptions;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Upper bound for every configured timeout and wait, in seconds
pub const MAX_DURATION_SECS: f64 = 3600.0;

/// Seconds as a `Duration`, clamped to `[floor, MAX_DURATION_SECS]`; NaN becomes `floor`
pub fn secs_to_duration(secs: f64, floor: f64) -> Duration {
    Duration::from_secs_f64(secs.max(floor).min(MAX_DURATION_SECS))
}

fn check_secs(name: &str, value: f64, allow_zero: bool) -> Result<()> {
    let in_range = value.is_finite()
        && value <= MAX_DURATION_SECS
        && (value > 0.0 || (allow_zero && value == 0.0));
    if !in_range {
        bail!(
            "{} must be between {} and {} seconds, got {}",
            name,
            if allow_zero { "0" } else { "just above 0" },
            MAX_DURATION_SECS,
            value
        );
    }
    Ok(())
}

/// Main settings structure, loaded from `settings.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub index: IndexSettings,
    pub crawler: CrawlerSettings,
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (CRAWLSEARCH_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Merge overrides from an arbitrary variable source
    pub(crate) fn merge_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("CRAWLSEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("CRAWLSEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        // The legacy names are still honoured by existing deployments.
        if let Some(val) = var("CRAWLSEARCH_INDEX_URL").or_else(|| var("ELASTICSEARCH_URL")) {
            self.index.url = val;
        }
        if let Some(val) = var("CRAWLSEARCH_INDEX_NAME") {
            self.index.index_name = val;
        }
        if let Some(val) = var("CRAWLSEARCH_CRAWLER_URL").or_else(|| var("CRAWLER_SERVICE_URL")) {
            self.crawler.url = val;
        }
        if let Some(val) = var("CRAWLSEARCH_CRAWL_WAIT_SECS") {
            if let Ok(secs) = val.parse() {
                self.search.crawl_wait_secs = secs;
            }
        }
        if let Some(val) = var("CRAWLSEARCH_LOG") {
            self.logging.level = val;
        }
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.index.url)
            .map_err(|e| anyhow::anyhow!("invalid index url '{}': {}", self.index.url, e))?;
        Url::parse(&self.crawler.url)
            .map_err(|e| anyhow::anyhow!("invalid crawler url '{}': {}", self.crawler.url, e))?;

        if self.index.index_name.trim().is_empty() {
            bail!("index name must not be empty");
        }
        if self.search.default_page_size == 0 || self.search.max_page_size == 0 {
            bail!("page sizes must be greater than zero");
        }
        if self.search.default_page_size > self.search.max_page_size {
            bail!(
                "default page size {} exceeds max page size {}",
                self.search.default_page_size,
                self.search.max_page_size
            );
        }

        check_secs("index.request_timeout", self.index.request_timeout, false)?;
        check_secs("crawler.request_timeout", self.crawler.request_timeout, false)?;
        check_secs("outgoing.request_timeout", self.outgoing.request_timeout, false)?;
        check_secs("search.crawl_wait_secs", self.search.crawl_wait_secs, true)?;

        let deadline = self.server.request_timeout_secs;
        if deadline == 0 {
            bail!("server.request_timeout_secs must be greater than zero");
        }
        // A wait that outlives the request deadline turns every waiting search into a timeout.
        if self.search.crawl_wait_secs >= deadline as f64 {
            bail!(
                "search.crawl_wait_secs ({}) must be shorter than server.request_timeout_secs ({})",
                self.search.crawl_wait_secs,
                deadline
            );
        }
        Ok(())
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Deadline for a whole inbound request, including any crawl wait
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "127.0.0.1".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ServerSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Search index connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Base URL of the Elasticsearch-compatible cluster
    pub url: String,
    /// Name of the index holding crawled pages
    pub index_name: String,
    /// Per-request timeout in seconds
    pub request_timeout: f64,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            index_name: "pages".to_string(),
            request_timeout: 10.0,
        }
    }
}

/// Crawler service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerSettings {
    /// Base URL of the crawler service
    pub url: String,
    /// Path of the job submission endpoint
    pub submit_path: String,
    /// Path prefix of the job status endpoint; the job id is appended
    pub status_path: String,
    /// Per-request timeout in seconds
    pub request_timeout: f64,
    /// Crawl depth used when the orchestrator triggers a crawl
    pub max_depth: u32,
    /// Page budget used when the orchestrator triggers a crawl
    pub max_pages: u32,
    /// Ask the crawler to prioritise fallback jobs
    pub priority: bool,
    /// Crawl even when the crawler believes it already has results
    pub force_crawl: bool,
}

impl Default for CrawlerSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
            submit_path: "/crawl".to_string(),
            status_path: "/job-status".to_string(),
            request_timeout: 10.0,
            max_depth: 3,
            max_pages: 100,
            priority: true,
            force_crawl: true,
        }
    }
}

impl CrawlerSettings {
    /// Options attached to crawls triggered by an empty search
    pub fn crawl_options(&self) -> CrawlOptions {
        CrawlOptions {
            max_depth: self.max_depth,
            max_pages: self.max_pages,
            priority: self.priority,
            force_crawl: self.force_crawl,
        }
    }
}

/// Search behaviour settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Page size used when the request does not give one
    pub default_page_size: u32,
    /// Largest page size a caller may request
    pub max_page_size: u32,
    /// Highest `from + size` the index accepts
    pub max_result_window: u64,
    /// Delay before the single retry after triggering a crawl
    pub crawl_wait_secs: f64,
    /// How long a submitted crawl suppresses new submissions for the same query (0 disables)
    pub crawl_dedupe_secs: u64,
    /// Number of page links around the current page in `pageWindow`
    pub max_visible_pages: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
            max_result_window: 10_000,
            crawl_wait_secs: 5.0,
            crawl_dedupe_secs: 60,
            max_visible_pages: 5,
        }
    }
}

impl SearchSettings {
    pub fn crawl_wait(&self) -> Duration {
        secs_to_duration(self.crawl_wait_secs, 0.0)
    }

    pub fn crawl_dedupe_window(&self) -> Option<Duration> {
        (self.crawl_dedupe_secs > 0).then(|| Duration::from_secs(self.crawl_dedupe_secs))
    }
}

/// Outgoing request settings shared by the index and crawler clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Idle connections kept per host
    pub pool_maxsize: usize,
    /// Verify TLS certificates
    pub verify_ssl: bool,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            pool_maxsize: 20,
            verify_ssl: true,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
