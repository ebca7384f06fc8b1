//! Configuration parsing from CLI arguments and environment variables

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Defaults, then `.env`, then the process environment, then CLI flags
    pub fn parse(&self) -> Result<Config> {
        EnvManager::load_env_file(self.cli.debug)?;
        self.parse_with_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `parse` with an explicit environment and no `.env` loading
    pub fn parse_with_lookup<F>(&self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        config.merge_from_lookup(lookup)?;
        self.apply_cli_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Color choice for error reports: the color flags, then `ENABLE_COLOR`
    /// from the environment or `.env`, then terminal detection. Works when
    /// the rest of the configuration failed to load.
    pub fn error_colors(&self) -> bool {
        if EnvManager::load_env_file(false).is_err() {
            return self.cli.use_colors();
        }
        self.error_colors_with_lookup(|key| std::env::var(key).ok())
    }

    pub fn error_colors_with_lookup<F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.cli.no_color || self.cli.color {
            return self.cli.use_colors();
        }
        lookup("ENABLE_COLOR")
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or_else(|| self.cli.use_colors())
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(ref base_url) = self.cli.base_url {
            config.base_url = base_url.trim().trim_end_matches('/').to_string();
        }

        if let Some(ref api_path) = self.cli.api_path {
            config.api_path = api_path.trim().to_string();
        }

        if let Some(timeout) = self.cli.timeout {
            config.timeout_seconds = timeout;
        }

        if self.cli.no_color {
            config.enable_color = false;
        } else if self.cli.color {
            config.enable_color = true;
        }

        // CLI-only
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            eprintln!("Applied CLI overrides to configuration");
            eprintln!("{}", display_config_summary(config));
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let api_url = config
        .api_url()
        .map(|u| u.to_string())
        .unwrap_or_else(|e| format!("<invalid: {}>", e));

    [
        format!("API URL: {}", api_url),
        format!("Timeout: {}s", config.timeout_seconds),
        format!("Label Format: {}", config.label_format),
        format!("Color Output: {}", config.enable_color),
        format!("Verbose: {}", config.verbose),
        format!("Debug: {}", config.debug),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use clap::Parser;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<Config> {
        let cli = Cli::parse_from(args);
        ConfigParser::new(cli).parse_with_lookup(env_of(env))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["stdash", "history"], &[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_url().unwrap().as_str(), "http://localhost/admin/api.php");
    }

    #[test]
    fn test_env_values_apply() {
        let config = parse(
            &["stdash", "history"],
            &[
                ("SPEEDTEST_BASE_URL", "http://pi.hole/"),
                ("SPEEDTEST_TIMEOUT_SECONDS", "45"),
                ("ENABLE_COLOR", "false"),
            ],
        )
        .unwrap();

        assert_eq!(config.base_url, "http://pi.hole");
        assert_eq!(config.timeout_seconds, 45);
        assert!(!config.enable_color);
    }

    #[test]
    fn test_cli_overrides_env() {
        let config = parse(
            &["stdash", "run", "--base-url", "https://admin.example", "--timeout", "10", "--color"],
            &[
                ("SPEEDTEST_BASE_URL", "http://pi.hole"),
                ("SPEEDTEST_TIMEOUT_SECONDS", "45"),
                ("ENABLE_COLOR", "false"),
            ],
        )
        .unwrap();

        assert_eq!(config.base_url, "https://admin.example");
        assert_eq!(config.timeout_seconds, 10);
        assert!(config.enable_color);
    }

    #[test]
    fn test_flags_are_cli_only() {
        let config = parse(&["stdash", "history", "--verbose", "--no-color"], &[]).unwrap();
        assert!(config.verbose);
        assert!(!config.debug);
        assert!(!config.enable_color);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = parse(&["stdash", "history", "--base-url", "ftp://pi.hole"], &[]);
        assert!(matches!(result, Err(AppError::Config(_))));

        let result = parse(&["stdash", "history"], &[("SPEEDTEST_TIMEOUT_SECONDS", "soon")]);
        assert!(matches!(result, Err(AppError::Config(_))));

        let result = parse(&["stdash", "history", "--api-path", "admin/api.php"], &[]);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_config_summary() {
        let summary = display_config_summary(&Config::default());
        assert!(summary.contains("API URL: http://localhost/admin/api.php"));
        assert!(summary.contains("Timeout: 120s"));

        let mut broken = Config::default();
        broken.base_url = "nope".to_string();
        assert!(display_config_summary(&broken).contains("<invalid:"));
    }

    #[test]
    fn test_error_colors_follow_enable_color_despite_bad_config() {
        let cli = Cli::parse_from(["stdash", "history", "--base-url", "ftp://pi.hole"]);
        let parser = ConfigParser::new(cli);
        assert!(parser.parse_with_lookup(env_of(&[])).is_err());
        assert!(!parser.error_colors_with_lookup(env_of(&[("ENABLE_COLOR", "false")])));
        assert!(parser.error_colors_with_lookup(env_of(&[("ENABLE_COLOR", "true")])));
    }

    #[test]
    fn test_error_colors_flags_win() {
        let plain = ConfigParser::new(Cli::parse_from(["stdash", "history", "--no-color"]));
        assert!(!plain.error_colors_with_lookup(env_of(&[("ENABLE_COLOR", "true")])));

        let forced = ConfigParser::new(Cli::parse_from(["stdash", "history", "--color"]));
        assert!(forced.error_colors_with_lookup(env_of(&[("ENABLE_COLOR", "false")])));
    }

    #[test]
    fn test_error_colors_ignore_unparsable_setting() {
        let cli = Cli::parse_from(["stdash", "history"]);
        let expected = cli.use_colors();
        let parser = ConfigParser::new(cli);
        assert_eq!(parser.error_colors_with_lookup(env_of(&[("ENABLE_COLOR", "maybe")])), expected);
    }
}
