//! Domain models
//!
//! Canonical records persisted by the harvester and loaded for analysis,
//! plus the configuration model.

pub mod config;
pub mod issue;
pub mod lenient;
pub mod timeline;

pub use config::{
    Config, GitHubConfig, IssueListingConfig, LoggingConfig, OutputConfig, RateLimitConfig,
};
pub use issue::{IssueRecord, IssueState};
pub use timeline::TimelineEvent;
