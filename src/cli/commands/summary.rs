//! `summary`: load a persisted document and print aggregate counts.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::debug;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::config::Config;
use crate::domain::models::IssueRecord;
use crate::infrastructure::storage::IssueRepository;

/// Arguments of `summary`.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Issues document to read (overrides output.data_path)
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

impl SummaryArgs {
    /// Apply the overrides given on the command line.
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.input {
            config.output.data_path.clone_from(path);
        }
    }
}

/// Aggregate counts over a loaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryOutput {
    /// Document that was read.
    pub path: PathBuf,
    /// Number of issues.
    pub issues: usize,
    /// Issues in the open state.
    pub open: usize,
    /// Issues in the closed state.
    pub closed: usize,
    /// Timeline events across all issues.
    pub events: usize,
    /// Comment events across all issues.
    pub comments: usize,
    /// Distinct label names in use.
    pub distinct_labels: usize,
}

impl SummaryOutput {
    /// Count over `issues` loaded from `path`.
    pub fn from_issues(path: PathBuf, issues: &[IssueRecord]) -> Self {
        let labels: BTreeSet<&str> = issues
            .iter()
            .flat_map(|issue| issue.labels.iter().map(String::as_str))
            .collect();
        Self {
            path,
            issues: issues.len(),
            open: issues.iter().filter(|i| i.is_open()).count(),
            closed: issues.iter().filter(|i| i.is_closed()).count(),
            events: issues.iter().map(|i| i.events.len()).sum(),
            comments: issues
                .iter()
                .flat_map(|i| &i.events)
                .filter(|e| e.is_comment())
                .count(),
            distinct_labels: labels.len(),
        }
    }
}

impl CommandOutput for SummaryOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Issues document {}:", self.path.display())];
        lines.push(format!("  Issues:          {}", self.issues));
        lines.push(format!("  Open / closed:   {} / {}", self.open, self.closed));
        lines.push(format!("  Timeline events: {}", self.events));
        lines.push(format!("  Comments:        {}", self.comments));
        lines.push(format!("  Distinct labels: {}", self.distinct_labels));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Load the document and print its summary.
pub async fn execute(config: &Config, json_mode: bool) -> Result<()> {
    let repository = IssueRepository::new(&config.output.data_path);
    let issues = repository
        .issues()
        .await
        .context("Failed to load issues document")?;
    debug!(loads = repository.load_count(), "Issues document ready");

    let summary = SummaryOutput::from_issues(repository.path().to_path_buf(), issues);
    output(&summary, json_mode);
    Ok(())
}
