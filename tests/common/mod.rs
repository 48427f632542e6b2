//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

use std::path::PathBuf;
use std::sync::Arc;

use issue_harvest::domain::models::config::{GitHubConfig, RateLimitConfig};
use issue_harvest::domain::ports::RecordingSleeper;
use issue_harvest::GitHubClient;
use tempfile::TempDir;

pub const OWNER: &str = "octo";
pub const REPO: &str = "hello";

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Path of an issues document inside a fresh temporary directory.
#[allow(dead_code)]
pub fn temp_data_path() -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join("issues.json");
    (dir, path)
}

#[allow(dead_code)]
/// GitHub settings pointing at a mock server.
pub fn github_config(base_url: &str) -> GitHubConfig {
    GitHubConfig {
        api_base_url: base_url.to_string(),
        owner: OWNER.to_string(),
        repo: REPO.to_string(),
        token: Some("test-token".to_string()),
        ..Default::default()
    }
}

/// Client for a mock server whose backoff sleeps are only recorded.
#[allow(dead_code)]
pub fn mock_client(base_url: &str) -> (GitHubClient, Arc<RecordingSleeper>) {
    mock_client_with_limits(base_url, RateLimitConfig::default())
}

#[allow(dead_code)]
pub fn mock_client_with_limits(
    base_url: &str,
    limits: RateLimitConfig,
) -> (GitHubClient, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::new());
    let client = GitHubClient::new(&github_config(base_url), &limits)
        .expect("Failed to create client")
        .with_sleeper(sleeper.clone());
    (client, sleeper)
}

/// Path of an endpoint of the mock repository.
#[allow(dead_code)]
pub fn repo_path(suffix: &str) -> String {
    format!("/repos/{OWNER}/{REPO}{suffix}")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
