//! GitHub Issues ingestion adapter.
//!
//! Pages through a repository's issues listing, skips pull requests, fetches
//! each issue's timeline and maps everything onto the canonical records.
//! All requests run sequentially and wait out GitHub rate limits.

pub mod assembler;
pub mod client;
pub mod models;
pub mod normalizer;
pub mod pagination;
pub mod rate_limit;

pub use assembler::{build_record, is_pull_request, Assembled, IssueAssembler};
pub use client::{GitHubClient, Page};
pub use normalizer::TimelineNormalizer;
pub use pagination::{parse_link_header, LinkRelations, PageCursor};
pub use rate_limit::{assess_backoff, BackoffDecision};
