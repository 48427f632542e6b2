//! End-to-end harvest: list, assemble, deduplicate, persist.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::adapters::github_issues::{is_pull_request, Assembled, GitHubClient, IssueAssembler};
use crate::domain::errors::HarvestResult;
use crate::domain::models::config::{Config, IssueListingConfig};
use crate::domain::models::IssueRecord;
use crate::infrastructure::storage::IssuePersister;

/// Counters collected during one harvest run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HarvestReport {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Issues in the written document.
    pub issues_written: usize,
    /// Listing items skipped as pull requests.
    pub pull_requests_skipped: usize,
    /// Listing items without a usable number or shape.
    pub malformed_skipped: usize,
    /// Repeated issue numbers that were dropped.
    pub duplicates_skipped: usize,
    /// Timeline events across all written issues.
    pub events_collected: usize,
    /// Pages of the issues listing requested.
    pub listing_pages: usize,
    /// Where the document was written.
    pub output_path: PathBuf,
}

/// Pulls every issue of one repository and writes the canonical document.
#[derive(Debug, Clone)]
pub struct HarvestService {
    client: GitHubClient,
    assembler: IssueAssembler,
    listing: IssueListingConfig,
    persister: IssuePersister,
}

impl HarvestService {
    /// Assemble a service from its parts.
    pub fn new(client: GitHubClient, listing: IssueListingConfig, persister: IssuePersister) -> Self {
        Self {
            assembler: IssueAssembler::new(client.clone()),
            client,
            listing,
            persister,
        }
    }

    /// Wire the client and persister from loaded configuration.
    pub fn from_config(config: &Config) -> HarvestResult<Self> {
        let client = GitHubClient::new(&config.github, &config.rate_limit)?;
        Ok(Self::new(
            client,
            config.issues.clone(),
            IssuePersister::new(&config.output.data_path),
        ))
    }

    /// Query parameters of the first listing request.
    pub fn listing_query(&self) -> Vec<(String, String)> {
        vec![
            ("state".to_string(), self.listing.state.clone()),
            ("per_page".to_string(), self.client.per_page().to_string()),
            ("sort".to_string(), self.listing.sort.clone()),
            ("direction".to_string(), self.listing.direction.clone()),
        ]
    }

    /// Fetch and assemble every issue without writing anything.
    ///
    /// The first record wins when the listing repeats an issue number.
    pub async fn collect(&self) -> HarvestResult<(Vec<IssueRecord>, HarvestReport)> {
        let mut report = HarvestReport {
            owner: self.client.owner().to_string(),
            repo: self.client.repo().to_string(),
            output_path: self.persister.path().to_path_buf(),
            ..Default::default()
        };
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        info!(
            owner = %report.owner,
            repo = %report.repo,
            "Fetching issues"
        );

        let mut cursor = self
            .client
            .paginate(self.client.issues_url(), self.listing_query());

        while let Some(raw) = cursor.next().await? {
            if !is_pull_request(&raw) {
                if let Some(number) = raw.get("number").and_then(Value::as_u64) {
                    if seen.contains(&number) {
                        warn!(number, "Skipping duplicate issue");
                        report.duplicates_skipped += 1;
                        continue;
                    }
                    info!(number, "Fetching issue #{number}");
                }
            }

            match self.assembler.assemble(raw).await? {
                Assembled::Issue(record) => {
                    seen.insert(record.number);
                    report.events_collected += record.events.len();
                    issues.push(record);
                }
                Assembled::PullRequest => report.pull_requests_skipped += 1,
                Assembled::Malformed => report.malformed_skipped += 1,
            }
        }

        report.listing_pages = cursor.pages_fetched();
        report.issues_written = issues.len();
        Ok((issues, report))
    }

    /// Run the full pipeline and persist the result.
    pub async fn run(&self) -> HarvestResult<HarvestReport> {
        let (issues, report) = self.collect().await?;
        self.persister.persist(&issues)?;

        info!(
            issues = report.issues_written,
            pull_requests = report.pull_requests_skipped,
            malformed = report.malformed_skipped,
            duplicates = report.duplicates_skipped,
            events = report.events_collected,
            path = %report.output_path.display(),
            "Harvest complete"
        );
        Ok(report)
    }
}
