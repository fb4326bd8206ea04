//! Configuration management for Warda
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, WardaError};
use crate::sessions::TimestampPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Warda
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Session segmentation settings
    #[serde(default)]
    pub sessions: SessionConfig,
    /// Emotional timeline settings
    #[serde(default)]
    pub timeline: TimelineConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are relative to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Connection establishment timeout in seconds
    #[serde(default = "default_timeout")]
    pub connect_timeout_seconds: u64,

    /// Timeout for the whole exchange (send, wait, read) in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_seconds: default_timeout(),
            request_timeout_seconds: default_timeout(),
        }
    }
}

/// Session segmentation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Handling of unparseable message timestamps
    #[serde(default)]
    pub timestamp_policy: TimestampPolicy,
}

/// Emotional timeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Days of history requested when the caller gives none
    #[serde(default = "default_days")]
    pub default_days: u32,
}

fn default_days() -> u32 {
    7
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            default_days: default_days(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| WardaError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| WardaError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("WARDA_BASE_URL") {
            tracing::debug!(base_url = %base_url, "Env override: WARDA_BASE_URL");
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("WARDA_CONNECT_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.api.connect_timeout_seconds = value;
            } else {
                tracing::warn!("Invalid WARDA_CONNECT_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(timeout) = std::env::var("WARDA_REQUEST_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.api.request_timeout_seconds = value;
            } else {
                tracing::warn!("Invalid WARDA_REQUEST_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(policy) = std::env::var("WARDA_TIMESTAMP_POLICY") {
            match policy.parse::<TimestampPolicy>() {
                Ok(value) => {
                    self.sessions.timestamp_policy = value;
                    tracing::debug!(policy = %value, "Env override: WARDA_TIMESTAMP_POLICY");
                }
                Err(_) => {
                    tracing::warn!("Invalid WARDA_TIMESTAMP_POLICY: {}", policy);
                }
            }
        }

        if let Ok(days) = std::env::var("WARDA_TIMELINE_DAYS") {
            if let Ok(value) = days.parse() {
                self.timeline.default_days = value;
            } else {
                tracing::warn!("Invalid WARDA_TIMELINE_DAYS: {}", days);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.base_url {
            tracing::debug!(base_url = %base_url, "CLI override: --base-url");
            self.api.base_url = base_url.clone();
        }
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is not an absolute http(s) URL, a
    /// timeout is zero, or the default timeline window is zero days
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(WardaError::Config("api.base_url cannot be empty".to_string()).into());
        }

        let parsed = url::Url::parse(&self.api.base_url).map_err(|e| {
            WardaError::Config(format!(
                "Invalid api.base_url '{}': {}",
                self.api.base_url, e
            ))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(WardaError::Config(format!(
                "api.base_url must use http or https, got {}",
                parsed.scheme()
            ))
            .into());
        }

        if self.api.connect_timeout_seconds == 0 {
            return Err(WardaError::Config(
                "api.connect_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.api.request_timeout_seconds == 0 {
            return Err(WardaError::Config(
                "api.request_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.timeline.default_days == 0 {
            return Err(WardaError::Config(
                "timeline.default_days must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
