use crate::models::SourceDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use strum::{Display, EnumString};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Upstream job-board sources
    pub sources: SourcesConfig,

    /// Search configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,

    /// Settings handed to the presentation layer
    #[serde(default)]
    pub presentation: PresentationConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());
        Self::load_from(&config_path)
    }

    /// Load configuration with an explicit override file
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let config: Config = config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(config_path).required(false))
            // Override with environment variables (prefix: JOBS_)
            .add_source(
                config::Environment::with_prefix("JOBS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Built-in defaults only, ignoring files and environment
    pub fn embedded() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()?
            .try_deserialize()
    }

    /// Check cross-field constraints the deserializer cannot express
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.sources.boards.is_empty() {
            return Err(config::ConfigError::Message(
                "at least one job board must be configured".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for board in &self.sources.boards {
            if board.board_id.trim().is_empty() {
                return Err(config::ConfigError::Message(format!(
                    "board '{}' has an empty board_id",
                    board.name
                )));
            }
            if !seen.insert(board.board_id.as_str()) {
                return Err(config::ConfigError::Message(format!(
                    "duplicate board_id '{}'",
                    board.board_id
                )));
            }
        }

        if self.sources.timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "sources.timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Base URL of the job-board API; the board id is appended as a path segment
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL used to build an apply link when a posting carries none
    #[serde(default = "default_apply_base_url")]
    pub apply_base_url: String,

    /// Per-source request timeout (seconds)
    #[serde(default = "default_source_timeout")]
    pub timeout_secs: u64,

    /// Ask the upstream for compensation details
    #[serde(default = "default_true")]
    pub include_compensation: bool,

    /// Configured boards
    #[serde(default)]
    pub boards: Vec<SourceDescriptor>,

    /// Bare city names rendered as "City, Country"
    #[serde(default)]
    pub city_aliases: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet interval before a typed query is applied (milliseconds)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Service name
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub prometheus_enabled: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ColorMode {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// Color mode for the session
    #[serde(default)]
    pub color_mode: ColorMode,

    /// Accent color
    #[serde(default = "default_brand_color")]
    pub brand_color: String,

    /// Page title
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::default(),
            brand_color: default_brand_color(),
            title: default_title(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_base_url() -> String {
    "https://api.ashbyhq.com/posting-api/job-board".to_string()
}

fn default_apply_base_url() -> String {
    "https://jobs.ashbyhq.com".to_string()
}

fn default_source_timeout() -> u64 {
    15
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "job-aggregator".to_string()
}

fn default_brand_color() -> String {
    "#c1ff72".to_string()
}

fn default_title() -> String {
    "AIJobsNow".to_string()
}

fn default_true() -> bool {
    true
}
