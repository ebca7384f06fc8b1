//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                eprintln!("Loaded configuration from .env file");
            }
        } else if debug {
            eprintln!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Speedtest Dashboard Configuration
#
# Values here are read at startup and can be overridden by command-line
# arguments.

# Scheme and host of the admin server
# SPEEDTEST_BASE_URL=http://pi.hole

# Path of the admin API script
# SPEEDTEST_API_PATH=/admin/api.php

# Request timeout in seconds (1-600). Running a test can take a while.
# SPEEDTEST_TIMEOUT_SECONDS=120

# chrono format for chart labels, rendered in local time
# SPEEDTEST_LABEL_FORMAT=%Y-%m-%d %H:%M

# Enable colored output (true/false)
# ENABLE_COLOR=true
"#
        .to_string()
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "SPEEDTEST_BASE_URL" => {
                let parsed = url::Url::parse(value.trim())
                    .map_err(|e| AppError::config(format!("Invalid SPEEDTEST_BASE_URL '{}': {}", value, e)))?;
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(AppError::config(format!(
                        "SPEEDTEST_BASE_URL must use http or https: {}",
                        value
                    )));
                }
            }
            "SPEEDTEST_API_PATH" => {
                if !value.trim().starts_with('/') {
                    return Err(AppError::config(format!(
                        "SPEEDTEST_API_PATH must start with '/': {}",
                        value
                    )));
                }
            }
            "SPEEDTEST_TIMEOUT_SECONDS" => {
                let timeout: u64 = value.trim().parse().map_err(|e| {
                    AppError::config(format!("Invalid SPEEDTEST_TIMEOUT_SECONDS value '{}': {}", value, e))
                })?;
                if timeout == 0 || timeout > crate::defaults::MAX_TIMEOUT_SECS {
                    return Err(AppError::config(format!(
                        "SPEEDTEST_TIMEOUT_SECONDS must be between 1 and {}, got: {}",
                        crate::defaults::MAX_TIMEOUT_SECS,
                        timeout
                    )));
                }
            }
            "SPEEDTEST_LABEL_FORMAT" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("SPEEDTEST_LABEL_FORMAT cannot be empty"));
                }
            }
            "ENABLE_COLOR" => {
                value.trim().parse::<bool>().map_err(|e| {
                    AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e))
                })?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("SPEEDTEST_BASE_URL", "Scheme and host of the admin server", "http://pi.hole"),
            ("SPEEDTEST_API_PATH", "Path of the admin API script", "/admin/api.php"),
            ("SPEEDTEST_TIMEOUT_SECONDS", "Request timeout in seconds (1-600)", "120"),
            ("SPEEDTEST_LABEL_FORMAT", "chrono format for chart labels", "%d.%m %H:%M"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        Self::validate_lookup(|key| std::env::var(key).ok())
    }

    /// Warnings for every supported variable whose value would be rejected
    pub fn validate_lookup<F>(lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(name, _, _)| lookup(name).map(|value| (name, value)))
            .filter_map(|(name, value)| Self::validate_env_var(name, &value).err())
            .map(|e| format!("Warning: {}", e))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_example_content_lists_every_variable() {
        let content = EnvManager::create_example_env_content();
        for (name, _, _) in EnvManager::get_supported_env_vars() {
            assert!(content.contains(&format!("{}=", name)), "missing {}", name);
        }
    }

    #[test]
    fn test_example_file_loads_as_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), EnvManager::create_example_env_content()).unwrap();
        // every line is commented out
        let pairs: Vec<_> = dotenv::from_path_iter(temp_file.path()).unwrap().collect();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_validate_env_var() {
        assert!(EnvManager::validate_env_var("SPEEDTEST_BASE_URL", "http://pi.hole").is_ok());
        assert!(EnvManager::validate_env_var("SPEEDTEST_API_PATH", "/admin/api.php").is_ok());
        assert!(EnvManager::validate_env_var("SPEEDTEST_TIMEOUT_SECONDS", "600").is_ok());
        assert!(EnvManager::validate_env_var("SPEEDTEST_LABEL_FORMAT", "%H:%M").is_ok());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "false").is_ok());
        assert!(EnvManager::validate_env_var("SOMETHING_ELSE", "whatever").is_ok());

        assert!(EnvManager::validate_env_var("SPEEDTEST_BASE_URL", "not-a-url").is_err());
        assert!(EnvManager::validate_env_var("SPEEDTEST_BASE_URL", "ftp://pi.hole").is_err());
        assert!(EnvManager::validate_env_var("SPEEDTEST_API_PATH", "admin/api.php").is_err());
        assert!(EnvManager::validate_env_var("SPEEDTEST_TIMEOUT_SECONDS", "0").is_err());
        assert!(EnvManager::validate_env_var("SPEEDTEST_TIMEOUT_SECONDS", "601").is_err());
        assert!(EnvManager::validate_env_var("SPEEDTEST_LABEL_FORMAT", " ").is_err());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "maybe").is_err());
    }

    #[test]
    fn test_validate_lookup() {
        let warnings = EnvManager::validate_lookup(|key| match key {
            "SPEEDTEST_TIMEOUT_SECONDS" => Some("0".to_string()),
            "ENABLE_COLOR" => Some("true".to_string()),
            _ => None,
        });
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Warning:"));
        assert!(warnings[0].contains("SPEEDTEST_TIMEOUT_SECONDS"));
    }
}
