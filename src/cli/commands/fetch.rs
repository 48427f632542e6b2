//! `fetch`: run the harvest pipeline.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::config::Config;
use crate::services::{HarvestReport, HarvestService};

/// Arguments of `fetch`.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Repository owner (overrides github.owner)
    #[arg(long)]
    pub owner: Option<String>,

    /// Repository name (overrides github.repo)
    #[arg(long)]
    pub repo: Option<String>,

    /// Output document (overrides output.data_path)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl FetchArgs {
    /// Apply the overrides given on the command line.
    pub fn apply(&self, config: &mut Config) {
        if let Some(owner) = &self.owner {
            config.github.owner.clone_from(owner);
        }
        if let Some(repo) = &self.repo {
            config.github.repo.clone_from(repo);
        }
        if let Some(path) = &self.output {
            config.output.data_path.clone_from(path);
        }
    }
}

impl CommandOutput for HarvestReport {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Harvested {}/{}:", self.owner, self.repo)];
        lines.push(format!("  Issues written:        {}", self.issues_written));
        lines.push(format!("  Timeline events:       {}", self.events_collected));
        lines.push(format!("  Pull requests skipped: {}", self.pull_requests_skipped));
        if self.malformed_skipped > 0 {
            lines.push(format!("  Malformed skipped:     {}", self.malformed_skipped));
        }
        if self.duplicates_skipped > 0 {
            lines.push(format!("  Duplicates skipped:    {}", self.duplicates_skipped));
        }
        lines.push(format!("  Listing pages:         {}", self.listing_pages));
        lines.push(format!("  Output:                {}", self.output_path.display()));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Run the harvest and print its report.
pub async fn execute(config: &Config, json_mode: bool) -> Result<()> {
    let service = HarvestService::from_config(config).context("Failed to build GitHub client")?;
    let report = service.run().await.with_context(|| {
        format!(
            "Harvest of {}/{} failed",
            config.github.owner, config.github.repo
        )
    })?;
    output(&report, json_mode);
    Ok(())
}
