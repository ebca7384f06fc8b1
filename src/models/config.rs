//! Configuration data model and validation

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Scheme and host of the admin server, e.g. `http://pi.hole`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the admin API script on that server
    #[serde(default = "default_api_path")]
    pub api_path: String,

    /// Request timeout duration
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// chrono format string for chart labels (rendered in local time)
    #[serde(default = "default_label_format")]
    pub label_format: String,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_path: default_api_path(),
            timeout_seconds: default_timeout_secs(),
            label_format: default_label_format(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Full URL of the API script
    pub fn api_url(&self) -> Result<url::Url> {
        let base = url::Url::parse(&self.base_url)?;
        Ok(base.join(&self.api_path)?)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(AppError::config("Base URL cannot be empty"));
        }

        match url::Url::parse(&self.base_url) {
            Ok(parsed) => {
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(AppError::config(format!("Base URL must use http or https: {}", self.base_url)));
                }
                if parsed.host().is_none() {
                    return Err(AppError::config(format!("Base URL must have a host: {}", self.base_url)));
                }
            }
            Err(e) => {
                return Err(AppError::config(format!("Invalid base URL '{}': {}", self.base_url, e)));
            }
        }

        if !self.api_path.starts_with('/') {
            return Err(AppError::config(format!("API path must start with '/': {}", self.api_path)));
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > crate::defaults::MAX_TIMEOUT_SECS {
            return Err(AppError::config(format!(
                "Timeout cannot exceed {} seconds",
                crate::defaults::MAX_TIMEOUT_SECS
            )));
        }

        if self.label_format.trim().is_empty() {
            return Err(AppError::config("Label format cannot be empty"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_lookup(|key| std::env::var(key).ok())
    }

    /// Merge values from an arbitrary key lookup (the process environment in production)
    pub fn merge_from_lookup<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("SPEEDTEST_BASE_URL") {
            self.base_url = base_url.trim().trim_end_matches('/').to_string();
        }

        if let Some(api_path) = lookup("SPEEDTEST_API_PATH") {
            self.api_path = api_path.trim().to_string();
        }

        if let Some(timeout) = lookup("SPEEDTEST_TIMEOUT_SECONDS") {
            self.timeout_seconds = timeout.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid SPEEDTEST_TIMEOUT_SECONDS value '{}': {}", timeout, e)))?;
        }

        if let Some(label_format) = lookup("SPEEDTEST_LABEL_FORMAT") {
            self.label_format = label_format;
        }

        if let Some(enable_color) = lookup("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_base_url() -> String {
    crate::defaults::DEFAULT_BASE_URL.to_string()
}

fn default_api_path() -> String {
    crate::defaults::DEFAULT_API_PATH.to_string()
}

fn default_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_label_format() -> String {
    crate::defaults::DEFAULT_LABEL_FORMAT.to_string()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
