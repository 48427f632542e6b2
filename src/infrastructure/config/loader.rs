//! Layered configuration loading and validation.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project config file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "harvest.yaml";

/// Optional local overrides next to the project config.
pub const LOCAL_CONFIG_FILE: &str = "harvest.local.yaml";

/// Prefix of environment overrides, nested with `__`.
pub const ENV_PREFIX: &str = "HARVEST_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `github.owner` is blank.
    #[error("GitHub owner cannot be empty")]
    EmptyOwner,

    /// `github.repo` is blank.
    #[error("GitHub repo cannot be empty")]
    EmptyRepo,

    /// `github.api_base_url` is blank.
    #[error("GitHub api_base_url cannot be empty")]
    EmptyApiBaseUrl,

    /// `output.data_path` is blank.
    #[error("Output data_path cannot be empty")]
    EmptyDataPath,

    /// `github.per_page` is outside 1..=100.
    #[error("Invalid per_page: {0}. Must be between 1 and 100")]
    InvalidPerPage(u32),

    /// `rate_limit.max_retries` is zero.
    #[error("Invalid max_retries: {0}. Cannot be 0")]
    InvalidMaxRetries(u32),

    /// Unknown `logging.level`.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unknown `logging.format`.
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    /// Unknown `logging.rotation`.
    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `harvest.yaml`, or the file given explicitly
    /// 3. `harvest.local.yaml` (optional overrides)
    /// 4. `GITHUB_TOKEN` as `github.token`
    /// 5. Environment variables (`HARVEST_*` prefix, highest priority)
    pub fn load(config_path: Option<&Path>) -> Result<Config> {
        let primary = match config_path {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {}", path.display());
                }
                path.to_path_buf()
            }
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        let config: Config = Self::figment(&primary, Path::new(LOCAL_CONFIG_FILE))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Build the layered figment without extracting it.
    pub fn figment(primary: &Path, local: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(primary))
            .merge(Yaml::file(local))
            .merge(
                Env::raw()
                    .only(&["GITHUB_TOKEN"])
                    .map(|_| "github.token".into()),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration from a specific file, ignoring the environment
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.github.owner.trim().is_empty() {
            return Err(ConfigError::EmptyOwner);
        }
        if config.github.repo.trim().is_empty() {
            return Err(ConfigError::EmptyRepo);
        }
        if config.github.api_base_url.trim().is_empty() {
            return Err(ConfigError::EmptyApiBaseUrl);
        }
        if !(1..=100).contains(&config.github.per_page) {
            return Err(ConfigError::InvalidPerPage(config.github.per_page));
        }

        if config.output.data_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataPath);
        }

        if config.rate_limit.max_retries == 0 {
            return Err(ConfigError::InvalidMaxRetries(config.rate_limit.max_retries));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}
