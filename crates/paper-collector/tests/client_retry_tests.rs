//! Retry-loop behavior of the HTTP client against a mock server.

use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paper_collector::client::HttpClient;
use paper_collector::config::{HttpConfig, RetryPolicy};
use paper_collector::error::ClientError;

fn test_client(mock_server: &MockServer) -> HttpClient {
    HttpClient::new(&HttpConfig::for_testing(&mock_server.uri())).unwrap()
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy::search().without_delays()
}

#[tokio::test]
async fn test_404_is_terminal_with_zero_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/DOI:10.1234/x"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Paper not found"))
        .expect(1) // exactly one attempt, no retries
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let url = format!("{}/graph/v1/paper/DOI:10.1234/x", mock_server.uri());

    let result = client.get::<serde_json::Value>(&url, &[], &fast_policy()).await;

    assert!(matches!(result, Err(ClientError::NotFound { .. })));
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn test_429_twice_then_200_returns_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit exceeded"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"title": "T"}]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let url = format!("{}/graph/v1/paper/search", mock_server.uri());

    let value: serde_json::Value = client.get(&url, &[], &fast_policy()).await.unwrap();

    assert_eq!(value["data"][0]["title"], "T");
    assert_eq!(client.request_count(), 3);
}

#[tokio::test]
async fn test_429_sleeps_the_configured_backoff() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let policy = RetryPolicy {
        max_retries: 3,
        rate_limit_backoff: Duration::from_millis(100),
        transport_backoff: Duration::ZERO,
        politeness_delay: Duration::ZERO,
        request_timeout: Duration::from_secs(5),
    };

    let client = test_client(&mock_server);
    let url = format!("{}/graph/v1/paper/search", mock_server.uri());

    let start = Instant::now();
    let result = client.get::<serde_json::Value>(&url, &[], &policy).await;

    assert!(result.is_ok());
    // Two 429s means the backoff was slept twice.
    assert!(start.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_retry_budget_exhausted_on_server_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(3) // first attempt + two retries
        .mount(&mock_server)
        .await;

    let policy = RetryPolicy { max_retries: 2, ..fast_policy() };

    let client = test_client(&mock_server);
    let url = format!("{}/graph/v1/paper/search", mock_server.uri());

    let result = client.get::<serde_json::Value>(&url, &[], &policy).await;

    match result {
        Err(ClientError::RetryBudgetExhausted { attempts }) => assert_eq!(attempts, 3),
        other => panic!("expected RetryBudgetExhausted, got {other:?}"),
    }
    assert_eq!(client.request_count(), 3);
}

#[tokio::test]
async fn test_malformed_json_is_retried_then_gives_up() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ invalid json here"))
        .mount(&mock_server)
        .await;

    let policy = RetryPolicy { max_retries: 1, ..fast_policy() };

    let client = test_client(&mock_server);
    let url = format!("{}/graph/v1/paper/search", mock_server.uri());

    let result = client.get::<serde_json::Value>(&url, &[], &policy).await;

    assert!(matches!(result, Err(ClientError::RetryBudgetExhausted { .. })));
    assert_eq!(client.request_count(), 2);
}

#[tokio::test]
async fn test_politeness_delay_after_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let policy = RetryPolicy {
        politeness_delay: Duration::from_millis(100),
        ..fast_policy()
    };

    let client = test_client(&mock_server);
    let url = format!("{}/graph/v1/paper/search", mock_server.uri());

    let start = Instant::now();
    let result = client.get::<serde_json::Value>(&url, &[], &policy).await;

    assert!(result.is_ok());
    assert!(start.elapsed() >= Duration::from_millis(100));
}

#[tokio::test]
async fn test_request_counter_shared_across_clones() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let clone = client.clone();
    let url = format!("{}/graph/v1/paper/search", mock_server.uri());

    let _: serde_json::Value = client.get(&url, &[], &fast_policy()).await.unwrap();
    let _: serde_json::Value = clone.get(&url, &[], &fast_policy()).await.unwrap();

    assert_eq!(client.request_count(), 2);
    assert_eq!(clone.request_count(), 2);
}
