//! Command-line interface.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::domain::models::config::Config;
use crate::infrastructure::config::ConfigLoader;

use self::commands::fetch::FetchArgs;
use self::commands::summary::SummaryArgs;

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(name = "issue-harvest")]
#[command(about = "Harvest GitHub issues and their timelines into a JSON document", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the config file (defaults to ./harvest.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every issue of a repository and write the issues document
    Fetch(FetchArgs),

    /// Load an issues document and print aggregate counts
    Summary(SummaryArgs),
}

impl Cli {
    /// Load the layered configuration and apply command-line overrides.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = ConfigLoader::load(self.config.as_deref())?;
        match &self.command {
            Commands::Fetch(args) => args.apply(&mut config),
            Commands::Summary(args) => args.apply(&mut config),
        }
        ConfigLoader::validate(&config)?;
        Ok(config)
    }
}

/// Print a fatal error and exit with status 1.
pub fn handle_error(err: &anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
