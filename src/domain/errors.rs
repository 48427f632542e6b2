//! Domain errors for the issue harvesting pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can end a harvest run or a model load.
///
/// Rate-limited responses are recovered inside the client and never reach
/// callers unless the retry budget is exhausted. Malformed issues and
/// timeline items are dropped with a warning and never become errors.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Non-success response that is not a recoverable rate limit.
    #[error("GitHub returned {status} for {url}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
        /// Response body, as sent.
        body: String,
    },

    /// The retry budget ran out while the quota stayed exhausted.
    #[error("Rate limit still exhausted for {url} after {attempts} retries")]
    RateLimitRetriesExhausted {
        /// Requested URL.
        url: String,
        /// Retries made before giving up.
        attempts: u32,
    },

    /// Transport failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Successful response whose body is not JSON.
    #[error("Response from {url} is not valid JSON: {source}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },

    /// Writing the issues document failed.
    #[error("Failed to write issues to {}: {source}", path.display())]
    Persistence {
        /// Target document.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The issues document could not be read.
    #[error("Failed to read issues from {}: {source}", path.display())]
    LoadFailure {
        /// Source document.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The issues document is not a JSON array of records.
    #[error("Malformed issues document {}: {source}", path.display())]
    ParseFailure {
        /// Source document.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },

    /// Settings that cannot produce a working client.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl HarvestError {
    /// Returns true for the errors produced by the HTTP side of the pipeline.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Http { .. }
                | Self::RateLimitRetriesExhausted { .. }
                | Self::Network(_)
                | Self::Decode { .. }
        )
    }
}

/// Result alias used across the pipeline.
pub type HarvestResult<T> = Result<T, HarvestError>;
