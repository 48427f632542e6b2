//! Integration tests for rate-limit backoff in the GitHub client.

mod common;

use std::time::Duration;

use chrono::Utc;
use mockito::{Matcher, Server};
use serde_json::json;

use issue_harvest::domain::models::config::RateLimitConfig;
use issue_harvest::HarvestError;

use common::{mock_client, mock_client_with_limits, repo_path};

fn query() -> Vec<(String, String)> {
    vec![("state".to_string(), "all".to_string())]
}

#[tokio::test]
async fn test_retry_after_sleeps_then_repeats_identical_request() {
    let mut server = Server::new_async().await;
    let path = repo_path("/issues");

    let limited = server
        .mock("GET", path.as_str())
        .match_query(Matcher::Exact("state=all".into()))
        .match_header("authorization", "Bearer test-token")
        .with_status(403)
        .with_header("retry-after", "2")
        .with_body(r#"{"message":"You have exceeded a secondary rate limit"}"#)
        .expect(1)
        .create_async()
        .await;

    let ok = server
        .mock("GET", path.as_str())
        .match_query(Matcher::Exact("state=all".into()))
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_body(json!([{"number": 1}]).to_string())
        .expect(1)
        .create_async()
        .await;

    let (client, sleeper) = mock_client(&server.url());
    let page = client.get_page(&client.issues_url(), &query()).await.unwrap();

    assert_eq!(page.items, vec![json!({"number": 1})]);
    assert_eq!(sleeper.calls(), vec![Duration::from_secs(2)]);
    limited.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn test_exhausted_quota_waits_for_reset() {
    let mut server = Server::new_async().await;
    let path = repo_path("/issues");
    let reset = Utc::now().timestamp() + 10;

    server
        .mock("GET", path.as_str())
        .match_query(Matcher::Any)
        .with_status(403)
        .with_header("x-ratelimit-remaining", "0")
        .with_header("x-ratelimit-reset", &reset.to_string())
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", path.as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let (client, sleeper) = mock_client(&server.url());
    client.get_page(&client.issues_url(), &query()).await.unwrap();

    let calls = sleeper.calls();
    assert_eq!(calls.len(), 1);
    // reset - now + 3, allowing for the clock moving during the test
    assert!(calls[0] >= Duration::from_secs(11) && calls[0] <= Duration::from_secs(13));
}

#[tokio::test]
async fn test_plain_forbidden_is_fatal() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", repo_path("/issues").as_str())
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"message":"Resource not accessible by integration"}"#)
        .expect(1)
        .create_async()
        .await;

    let (client, sleeper) = mock_client(&server.url());
    let err = client
        .get_page(&client.issues_url(), &query())
        .await
        .unwrap_err();

    match err {
        HarvestError::Http { status, body, .. } => {
            assert_eq!(status, 403);
            assert!(body.contains("Resource not accessible"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(sleeper.calls().is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_fatal_with_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", repo_path("/issues").as_str())
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("internal oops")
        .expect(1)
        .create_async()
        .await;

    let (client, sleeper) = mock_client(&server.url());
    let err = client
        .get_page(&client.issues_url(), &query())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        HarvestError::Http { status: 500, ref body, .. } if body == "internal oops"
    ));
    assert!(err.is_fetch_failure());
    assert!(sleeper.calls().is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", repo_path("/issues").as_str())
        .match_query(Matcher::Any)
        .with_status(403)
        .with_header("retry-after", "1")
        .expect(3)
        .create_async()
        .await;

    let limits = RateLimitConfig {
        max_retries: 2,
        ..Default::default()
    };
    let (client, sleeper) = mock_client_with_limits(&server.url(), limits);
    let err = client
        .get_page(&client.issues_url(), &query())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        HarvestError::RateLimitRetriesExhausted { attempts: 2, .. }
    ));
    assert_eq!(sleeper.calls().len(), 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_json_body_is_a_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", repo_path("/issues").as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let (client, _) = mock_client(&server.url());
    let err = client
        .get_page(&client.issues_url(), &query())
        .await
        .unwrap_err();
    assert!(matches!(err, HarvestError::Decode { .. }));
}

#[tokio::test]
async fn test_requests_carry_api_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", repo_path("/issues").as_str())
        .match_query(Matcher::Any)
        .match_header("accept", "application/vnd.github+json")
        .match_header("x-github-api-version", "2022-11-28")
        .match_header("user-agent", Matcher::Regex("^issue-harvest/".into()))
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let (client, _) = mock_client(&server.url());
    client.get_page(&client.issues_url(), &query()).await.unwrap();
    mock.assert_async().await;
}
