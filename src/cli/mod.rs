//! Command-line interface module with topic help

pub mod help;

pub use help::HelpSystem;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Speedtest dashboard - drive the speedtest admin backend from a terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "stdash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Backend base URL, e.g. http://pi.hole
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path of the admin API endpoint on the backend
    #[arg(long, global = true)]
    pub api_path: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long, global = true, value_parser = parse_duration)]
    pub timeout: Option<u64>,

    /// Force colored output
    #[arg(long, global = true)]
    pub color: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Show help for specific topic (config, api, examples)
    #[arg(long, value_name = "TOPIC")]
    pub help_topic: Option<String>,
}

/// Dashboard actions
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Load the measurement history and print the summary and table
    History,
    /// Trigger an on-demand speedtest, then reload the history
    Run,
    /// Save the automatic test interval, in hours
    Interval {
        /// Hours between automatic tests (1-24 expected; other values are sent as typed)
        #[arg(allow_negative_numbers = true)]
        hours: i64,
    },
    /// Load the history and render the admin page as HTML
    Render {
        /// Write the page to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if let Some(ref base_url) = self.base_url {
            if base_url.trim().is_empty() {
                return Err("--base-url cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Check if help should be displayed for a specific topic
    pub fn should_show_topic_help(&self) -> bool {
        self.help_topic.is_some()
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Display help for the specified topic or main help
    pub fn display_help(&self) -> String {
        let help_system = HelpSystem::new();
        let use_colors = self.use_colors();

        if let Some(topic) = &self.help_topic {
            help_system.display_topic_help(topic, use_colors).unwrap_or_else(|| {
                format!(
                    "Unknown help topic: '{}'\n\nAvailable topics: config, api, examples\n\n{}",
                    topic,
                    help_system.display_main_help(use_colors)
                )
            })
        } else {
            help_system.display_main_help(use_colors)
        }
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Configuration Summary:\n");
        if let Some(ref base_url) = self.base_url {
            summary.push_str(&format!("  Base URL: {}\n", base_url));
        }
        if let Some(ref api_path) = self.api_path {
            summary.push_str(&format!("  API path: {}\n", api_path));
        }
        if let Some(timeout) = self.timeout {
            summary.push_str(&format!("  Timeout: {}s\n", timeout));
        }
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));
        summary.push_str(&format!("  Verbose mode: {}\n", self.verbose));
        summary.push_str(&format!("  Debug mode: {}\n", self.debug));

        summary
    }
}

/// Parse duration from seconds string
fn parse_duration(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid duration: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Duration must be greater than 0".to_string())
            } else if secs > crate::defaults::MAX_TIMEOUT_SECS {
                Err(format!(
                    "Duration cannot exceed {} seconds",
                    crate::defaults::MAX_TIMEOUT_SECS
                ))
            } else {
                Ok(secs)
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    cfg!(unix)
}
