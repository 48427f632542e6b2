//! issue-harvest CLI entry point.

use clap::Parser;

use issue_harvest::cli::{commands, handle_error, Cli, Commands};
use issue_harvest::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(err) => handle_error(&err, cli.json),
    };

    let _logger = match LogConfig::try_from(&config.logging).and_then(|c| LoggerImpl::init(&c)) {
        Ok(logger) => logger,
        Err(err) => handle_error(&err, cli.json),
    };

    let result = match cli.command {
        Commands::Fetch(_) => commands::fetch::execute(&config, cli.json).await,
        Commands::Summary(_) => commands::summary::execute(&config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(&err, cli.json);
    }
}
