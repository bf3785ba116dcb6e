//! Configuration loading and management for tersify.
//!
//! Loads settings from `tersify.toml` with environment variable overrides for
//! deployment-specific values. Every field has a default, so running without a
//! config file is fine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Base URL used in development and as the last production fallback.
pub const LOCAL_BASE_URL: &str = "http://localhost:3000";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("unknown runtime mode: {0} (expected \"development\" or \"production\")")]
    InvalidMode(String),
    #[error("invalid origin URL {0}: {1}")]
    InvalidOrigin(String, String),
    #[error("summary.timeout_secs must be greater than zero")]
    ZeroTimeout,
}

/// Deployment mode, mirrors the development/production split of the hosting site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    Development,
    #[default]
    Production,
}

impl FromStr for RuntimeMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(RuntimeMode::Development),
            "production" | "prod" => Ok(RuntimeMode::Production),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeMode::Development => write!(f, "development"),
            RuntimeMode::Production => write!(f, "production"),
        }
    }
}

/// Where the summarisation service lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub mode: RuntimeMode,
    /// Explicit API base URL, preferred in production
    pub api_url: Option<String>,
    /// Public site URL, used when no API URL is set
    pub site_url: Option<String>,
    /// Origin that relative endpoints are resolved against
    pub origin: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            mode: RuntimeMode::default(),
            api_url: None,
            site_url: None,
            origin: LOCAL_BASE_URL.to_string(),
        }
    }
}

/// Summary request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Route of the summarisation handler
    pub path: String,
    /// Instruction sent when the user gives none
    pub default_instruction: String,
    /// Per-endpoint deadline
    pub timeout_secs: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            path: "/api/summary_gen".to_string(),
            default_instruction: "Create a comprehensive summary".to_string(),
            timeout_secs: crate::client::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl SummaryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Email relay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub endpoint: String,
    pub subject: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            endpoint: "/api/sendEmail".to_string(),
            subject: "AI Generated Summary".to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub runtime: RuntimeConfig,
    pub summary: SummaryConfig,
    pub email: EmailConfig,
}

impl Config {
    /// Load configuration from the default location (tersify.toml in cwd or home).
    ///
    /// Falls back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                let mut config = Config::default();
                config.apply_env(|key| std::env::var(key).ok())?;
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text without consulting the environment
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Override deployment values from the environment.
    ///
    /// Takes a lookup function so callers can supply something other than the
    /// process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup("TERSIFY_MODE") {
            self.runtime.mode = mode.parse()?;
        }
        if let Some(url) = lookup("TERSIFY_API_URL") {
            self.runtime.api_url = Some(url);
        }
        if let Some(url) = lookup("URL") {
            self.runtime.site_url = Some(url);
        }
        if let Some(origin) = lookup("TERSIFY_ORIGIN") {
            self.runtime.origin = origin;
        }
        Ok(())
    }

    /// Reject values that would make every request fail
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.summary.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        self.origin()?;
        Ok(())
    }

    /// Parsed origin for resolving relative endpoints
    pub fn origin(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.runtime.origin)
            .map_err(|e| ConfigError::InvalidOrigin(self.runtime.origin.clone(), e.to_string()))
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from("tersify.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        let home_config = dirs::home_dir()?
            .join(".config")
            .join("tersify")
            .join("tersify.toml");
        home_config.exists().then_some(home_config)
    }
}
