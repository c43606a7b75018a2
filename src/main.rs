//! crawlsearch: search with crawl fallback
//!
//! This is the main entry point for the application.

use anyhow::{bail, Result};
use crawlsearch::{
    config::{self, Settings},
    network::HttpClient,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// What the command line asked for
enum Command {
    Serve { config: Option<PathBuf> },
    Help,
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = match parse_args(std::env::args().skip(1))? {
        Command::Serve { config } => config,
        Command::Help => {
            print_usage();
            return Ok(());
        }
        Command::Version => {
            println!("crawlsearch {}", crawlsearch::VERSION);
            return Ok(());
        }
    };

    // Load configuration
    let settings = config::load(config_path.as_deref())?;

    // Initialize logging
    init_logging(&settings);
    info!("Starting crawlsearch v{}", crawlsearch::VERSION);
    info!(
        "Index at {} ({}), crawler at {}",
        settings.index.url, settings.index.index_name, settings.crawler.url
    );

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    // Create application state
    let shutdown = CancellationToken::new();
    let state = AppState::new(settings.clone(), client, shutdown.clone());

    // Create router
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    info!("Starting server on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Install the fmt subscriber; `RUST_LOG` wins over the configured level
fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Resolve on Ctrl-C or SIGTERM and cancel pending crawl waits
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown requested, cancelling pending crawl waits");
    token.cancel();
}

fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut config = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-c" | "--config" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => bail!("{} requires a file argument", arg),
            },
            other => bail!("Unknown argument: {} (see --help)", other),
        }
    }

    Ok(Command::Serve { config })
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
crawlsearch v{}
Search an indexed page collection, crawling the web when nothing matches

USAGE:
    crawlsearch [OPTIONS]

OPTIONS:
    -c, --config <FILE>    Path to configuration file
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    CRAWLSEARCH_SETTINGS_PATH    Path to settings.yml
    CRAWLSEARCH_PORT             Server port
    CRAWLSEARCH_BIND_ADDRESS     Bind address
    CRAWLSEARCH_INDEX_URL        Index base URL (also ELASTICSEARCH_URL)
    CRAWLSEARCH_INDEX_NAME       Index holding crawled pages
    CRAWLSEARCH_CRAWLER_URL      Crawler base URL (also CRAWLER_SERVICE_URL)
    CRAWLSEARCH_CRAWL_WAIT_SECS  Wait before re-querying after a crawl
    CRAWLSEARCH_LOG              Log filter, overridden by RUST_LOG
"#,
        crawlsearch::VERSION
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert!(matches!(parse_args(args(&[])).unwrap(), Command::Serve { config: None }));
        assert!(matches!(parse_args(args(&["--help"])).unwrap(), Command::Help));
        assert!(matches!(parse_args(args(&["-V"])).unwrap(), Command::Version));

        match parse_args(args(&["-c", "custom.yml"])).unwrap() {
            Command::Serve { config } => assert_eq!(config, Some(PathBuf::from("custom.yml"))),
            _ => panic!("expected serve"),
        }

        assert!(parse_args(args(&["--config"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
    }
}
