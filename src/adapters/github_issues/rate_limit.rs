//! Rate-limit detection for GitHub responses.
//!
//! GitHub signals quota exhaustion with HTTP 403 plus either a
//! `Retry-After` header (secondary limits) or an exhausted
//! `X-RateLimit-Remaining` together with an `X-RateLimit-Reset` epoch
//! (primary limits). A 403 carrying neither is a permission problem and is
//! never retried.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

/// Seconds to wait before retrying (secondary limits).
pub const RETRY_AFTER: &str = "retry-after";
/// Requests left in the current primary window.
pub const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
/// Epoch second at which the primary window resets.
pub const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// Shortest sleep ever requested.
const MIN_SLEEP_SECS: i64 = 1;

/// What to do with a response before handing it to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffDecision {
    /// Server asked for an explicit pause.
    RetryAfter(Duration),
    /// Primary quota is exhausted; wait until it resets.
    WaitForReset(Duration),
    /// Not a rate-limit response.
    Proceed,
}

impl BackoffDecision {
    /// How long to sleep before retrying, if at all.
    pub const fn sleep_duration(self) -> Option<Duration> {
        match self {
            Self::RetryAfter(d) | Self::WaitForReset(d) => Some(d),
            Self::Proceed => None,
        }
    }
}

/// Decide whether a response is a recoverable rate limit.
///
/// `reset_margin_secs` is added past the reset epoch so the retry lands
/// after the window has actually rolled over.
pub fn assess_backoff(
    status: StatusCode,
    headers: &HeaderMap,
    now: DateTime<Utc>,
    reset_margin_secs: i64,
) -> BackoffDecision {
    if status != StatusCode::FORBIDDEN {
        return BackoffDecision::Proceed;
    }

    if let Some(secs) = header_value::<i64>(headers, RETRY_AFTER) {
        return BackoffDecision::RetryAfter(secs_to_duration(secs.max(MIN_SLEEP_SECS)));
    }

    let remaining = headers
        .get(RATE_LIMIT_REMAINING)
        .and_then(|v| v.to_str().ok())
        .map(str::trim);
    if remaining == Some("0") {
        if let Some(reset) = header_value::<i64>(headers, RATE_LIMIT_RESET) {
            let secs = reset
                .saturating_sub(now.timestamp())
                .saturating_add(reset_margin_secs)
                .max(MIN_SLEEP_SECS);
            return BackoffDecision::WaitForReset(secs_to_duration(secs));
        }
    }

    BackoffDecision::Proceed
}

fn header_value<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<T>().ok())
}

fn secs_to_duration(secs: i64) -> Duration {
    Duration::from_secs(u64::try_from(secs).unwrap_or(1))
}
