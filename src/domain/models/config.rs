//! Configuration model with serde defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration structure for issue-harvest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// GitHub API connection settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Issue listing parameters
    #[serde(default)]
    pub issues: IssueListingConfig,

    /// Rate-limit backoff settings
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Output document settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// GitHub API connection settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GitHubConfig {
    /// Base URL of the REST API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Repository owner (user or organisation)
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Repository name
    #[serde(default = "default_repo")]
    pub repo: String,

    /// Static bearer credential
    #[serde(default)]
    pub token: Option<String>,

    /// Value of the `X-GitHub-Api-Version` header
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Value of the `User-Agent` header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Page size for every collection request (1-100)
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Optional request timeout; the HTTP client default applies when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_owner() -> String {
    "python-poetry".to_string()
}

fn default_repo() -> String {
    "poetry".to_string()
}

fn default_api_version() -> String {
    "2022-11-28".to_string()
}

fn default_user_agent() -> String {
    concat!("issue-harvest/", env!("CARGO_PKG_VERSION")).to_string()
}

const fn default_per_page() -> u32 {
    100
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            owner: default_owner(),
            repo: default_repo(),
            token: None,
            api_version: default_api_version(),
            user_agent: default_user_agent(),
            per_page: default_per_page(),
            timeout_secs: None,
        }
    }
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_base_url", &self.api_base_url)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("api_version", &self.api_version)
            .field("user_agent", &self.user_agent)
            .field("per_page", &self.per_page)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Query parameters for the issues listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IssueListingConfig {
    /// `open`, `closed` or `all`
    #[serde(default = "default_state")]
    pub state: String,

    /// `created`, `updated` or `comments`
    #[serde(default = "default_sort")]
    pub sort: String,

    /// `asc` or `desc`
    #[serde(default = "default_direction")]
    pub direction: String,
}

fn default_state() -> String {
    "all".to_string()
}

fn default_sort() -> String {
    "created".to_string()
}

fn default_direction() -> String {
    "asc".to_string()
}

impl Default for IssueListingConfig {
    fn default() -> Self {
        Self {
            state: default_state(),
            sort: default_sort(),
            direction: default_direction(),
        }
    }
}

/// Rate-limit backoff settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RateLimitConfig {
    /// Consecutive rate-limited retries allowed for a single page
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Seconds added past the advertised reset time before retrying
    #[serde(default = "default_reset_margin_secs")]
    pub reset_margin_secs: i64,
}

const fn default_max_retries() -> u32 {
    20
}

const fn default_reset_margin_secs() -> i64 {
    3
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            reset_margin_secs: default_reset_margin_secs(),
        }
    }
}

/// Output document settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OutputConfig {
    /// Path of the persisted issues document
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("poetry_issues.json")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling JSON log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Rotation for file logs: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
