//! issue-harvest - GitHub issue and timeline harvester
//!
//! Pulls every issue of a repository through the GitHub REST API, follows
//! `Link`-header pagination, waits out rate limits, normalizes each issue's
//! timeline and writes the result as one JSON document that analysis code
//! can load back through a cached repository.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Canonical models, errors and ports
//! - **Adapters** (`adapters`): The GitHub REST client and payload mapping
//! - **Service Layer** (`services`): Harvest orchestration
//! - **Infrastructure Layer** (`infrastructure`): Config, logging, storage
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use issue_harvest::IssueRepository;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let repository = IssueRepository::new("poetry_issues.json");
//!     for issue in repository.issues().await? {
//!         println!("#{} {}", issue.number, issue.title.as_deref().unwrap_or(""));
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::github_issues::{GitHubClient, IssueAssembler, PageCursor, TimelineNormalizer};
pub use domain::models::{Config, IssueRecord, IssueState, TimelineEvent};
pub use domain::{HarvestError, HarvestResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::storage::{IssuePersister, IssueRepository};
pub use services::{HarvestReport, HarvestService};
