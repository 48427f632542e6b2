//! GitHub HTTP client with rate-limit backoff.
//!
//! Wraps the GitHub REST API v3 collection endpoints used by the harvester.
//! Every page request goes through [`GitHubClient::get_page`], which sleeps
//! and retries the identical request when GitHub reports an exhausted quota
//! and surfaces any other non-success response as a fatal error.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::errors::{HarvestError, HarvestResult};
use crate::domain::models::config::{GitHubConfig, RateLimitConfig};
use crate::domain::ports::{Sleeper, TokioSleeper};

use super::pagination::{parse_link_header, PageCursor};
use super::rate_limit::{assess_backoff, BackoffDecision};

/// One decoded page of a collection endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Items on the page. A non-array body becomes a single item.
    pub items: Vec<Value>,
    /// Verbatim `rel="next"` URL, if any.
    pub next: Option<String>,
    /// Verbatim `rel="last"` URL, if any.
    pub last: Option<String>,
}

/// HTTP client for the GitHub REST API v3.
///
/// Cloning is cheap; clones share the connection pool and the sleeper.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    /// The underlying HTTP client, carrying the auth and version headers.
    http: Client,
    /// API base URL without a trailing slash.
    base_url: String,
    owner: String,
    repo: String,
    per_page: u32,
    /// Consecutive rate-limited retries allowed per page.
    max_retries: u32,
    reset_margin_secs: i64,
    sleeper: Arc<dyn Sleeper>,
}

impl GitHubClient {
    /// Build a client from the GitHub and rate-limit settings.
    ///
    /// The bearer token, `Accept`, API version and `User-Agent` headers are
    /// installed as client defaults so every request carries them.
    pub fn new(github: &GitHubConfig, rate_limit: &RateLimitConfig) -> HarvestResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_str(&github.api_version)
                .map_err(|e| HarvestError::Config(format!("invalid api_version: {e}")))?,
        );
        match github.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => {
                let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|e| HarvestError::Config(format!("invalid token: {e}")))?;
                auth.set_sensitive(true);
                headers.insert(header::AUTHORIZATION, auth);
            }
            None => warn!("No GitHub token configured; requests are unauthenticated"),
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(github.user_agent.clone());
        if let Some(secs) = github.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: github.api_base_url.trim_end_matches('/').to_string(),
            owner: github.owner.clone(),
            repo: github.repo.clone(),
            per_page: github.per_page,
            max_retries: rate_limit.max_retries,
            reset_margin_secs: rate_limit.reset_margin_secs,
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Replace the sleeper used during backoff.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Page size sent with every collection request.
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Repository owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Issues listing endpoint of the configured repository.
    pub fn issues_url(&self) -> String {
        format!("{}/repos/{}/{}/issues", self.base_url, self.owner, self.repo)
    }

    /// Timeline endpoint of one issue.
    pub fn timeline_url(&self, number: u64) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}/timeline",
            self.base_url, self.owner, self.repo, number
        )
    }

    /// Start a cursor over every page of a collection endpoint.
    pub fn paginate(&self, url: impl Into<String>, query: Vec<(String, String)>) -> PageCursor {
        PageCursor::new(self.clone(), url, query)
    }

    /// Fetch a single page, transparently waiting out rate limits.
    ///
    /// `query` is appended to `url`; the cursor passes it only for the first
    /// page since `next` links already encode it.
    pub async fn get_page(&self, url: &str, query: &[(String, String)]) -> HarvestResult<Page> {
        let mut attempts = 0;

        loop {
            debug!(url = url, attempt = attempts, "GET page");
            let response = self.http.get(url).query(query).send().await?;
            let status = response.status();

            let decision =
                assess_backoff(status, response.headers(), Utc::now(), self.reset_margin_secs);
            if let Some(delay) = decision.sleep_duration() {
                if attempts >= self.max_retries {
                    return Err(HarvestError::RateLimitRetriesExhausted {
                        url: url.to_string(),
                        attempts,
                    });
                }
                attempts += 1;
                let reason = match decision {
                    BackoffDecision::RetryAfter(_) => "retry-after",
                    _ => "quota-reset",
                };
                warn!(
                    url = url,
                    sleep_secs = delay.as_secs(),
                    attempt = attempts,
                    reason = reason,
                    "Rate limit reached, sleeping before retry"
                );
                self.sleeper.sleep(delay).await;
                continue;
            }

            if !status.is_success() {
                if status == StatusCode::FORBIDDEN {
                    warn!(
                        url = url,
                        "403 without rate-limit headers; check the token's permissions"
                    );
                }
                let body = response.text().await.unwrap_or_default();
                return Err(HarvestError::Http {
                    status: status.as_u16(),
                    url: url.to_string(),
                    body,
                });
            }

            let links = response
                .headers()
                .get(header::LINK)
                .and_then(|v| v.to_str().ok())
                .map(parse_link_header)
                .unwrap_or_default();

            let text = response.text().await?;
            let data: Value =
                serde_json::from_str(&text).map_err(|source| HarvestError::Decode {
                    url: url.to_string(),
                    source,
                })?;

            let items = match data {
                Value::Array(items) => items,
                other => vec![other],
            };

            return Ok(Page {
                items,
                next: links.next,
                last: links.last,
            });
        }
    }
}
