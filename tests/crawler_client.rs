//! Crawler client contract tests
//!
//! Verify the submit and status requests sent to the crawler service and
//! the mapping of its replies.

use crawlsearch::config::CrawlerSettings;
use crawlsearch::crawler::{
    CrawlError, CrawlOptions, CrawlService, CrawlerClient, JobStatus, CRAWL_DECLINED,
};
use crawlsearch::network::HttpClient;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(url: String) -> CrawlerClient {
    let settings = CrawlerSettings {
        url,
        request_timeout: 2.0,
        ..Default::default()
    };
    CrawlerClient::new(HttpClient::new().unwrap(), &settings)
}

#[tokio::test]
async fn test_submit_sends_options_and_returns_job() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .and(body_json(json!({
            "query": "zzzznonexistentqueryxyz",
            "max_depth": 3,
            "max_pages": 100,
            "priority": true,
            "force_crawl": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "job-42",
            "status": "queued",
            "message": "Crawl job queued"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let job = client(server.uri())
        .submit("zzzznonexistentqueryxyz", &CrawlOptions::default())
        .await
        .unwrap();

    assert_eq!(job.job_id, "job-42");
    assert_eq!(job.status, JobStatus::Queued);
    assert_eq!(job.query, "zzzznonexistentqueryxyz");
}

#[tokio::test]
async fn test_submit_error_status_in_body_is_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "",
            "status": "error",
            "message": "Crawler is shutting down"
        })))
        .mount(&server)
        .await;

    let err = client(server.uri())
        .submit("rust", &CrawlOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::Rejected(_)));
    assert_eq!(err.public_message(), "Crawler is shutting down");
}

#[tokio::test]
async fn test_submit_declined_is_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "job-43",
            "status": "no_results",
            "message": "No results found for this query, try a broader search"
        })))
        .mount(&server)
        .await;

    let options = CrawlOptions {
        force_crawl: false,
        ..Default::default()
    };
    let err = client(server.uri()).submit("rust", &options).await.unwrap_err();

    assert!(matches!(err, CrawlError::Rejected(_)));
    assert_eq!(
        err.public_message(),
        "No results found for this query, try a broader search"
    );
}

#[tokio::test]
async fn test_submit_declined_without_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "job_id": "job-44", "status": "no_results" })),
        )
        .mount(&server)
        .await;

    let err = client(server.uri())
        .submit("rust", &CrawlOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.public_message(), CRAWL_DECLINED);
}

#[tokio::test]
async fn test_poll_status_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job-status/job-42"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(server.uri()).poll_status("job-42").await.unwrap_err();
    assert!(matches!(err, CrawlError::Status(500)));
}

#[tokio::test]
async fn test_submit_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(server.uri())
        .submit("rust", &CrawlOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::Status(503)));
    assert_eq!(err.public_message(), "Failed to start crawling process");
}

#[tokio::test]
async fn test_submit_unreachable_is_transport_error() {
    let err = client("http://127.0.0.1:1".to_string())
        .submit("rust", &CrawlOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::Transport(_)));
}

#[tokio::test]
async fn test_poll_status_maps_vocabulary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job-status/job-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "job-42",
            "query": "rust",
            "status": "in_progress",
            "pages_crawled": 12,
            "estimated_time_remaining": 30.0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let job = client(server.uri()).poll_status("job-42").await.unwrap();

    assert_eq!(job.status, JobStatus::Started);
    assert_eq!(job.pages_crawled, 12);
    assert_eq!(job.estimated_remaining_seconds, Some(30.0));
}

#[tokio::test]
async fn test_poll_status_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job-status/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Job not found" })))
        .mount(&server)
        .await;

    let err = client(server.uri()).poll_status("missing").await.unwrap_err();
    assert!(matches!(err, CrawlError::NotFound(ref id) if id == "missing"));
    assert_eq!(err.public_message(), "Crawl job not found");
}
