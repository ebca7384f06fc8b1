//! Topic help: configuration sources, the backend API contract, usage examples

use crate::config::env::EnvManager;
use colored::*;

/// Help text renderer for `--help-topic` and the bare `stdash` invocation
pub struct HelpSystem;

impl HelpSystem {
    pub fn new() -> Self {
        Self
    }

    /// Display the main help message
    pub fn display_main_help(&self, use_colors: bool) -> String {
        let mut help = String::new();

        help.push_str(&self.format_header(use_colors));
        help.push('\n');
        help.push_str(&self.format_usage_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_examples_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_environment_section(use_colors));
        help.push('\n');
        help.push_str("Run 'stdash --help' for the full option list, or 'stdash --help-topic <config|api|examples>'.\n");

        help
    }

    /// Display quick help for specific topics
    pub fn display_topic_help(&self, topic: &str, use_colors: bool) -> Option<String> {
        match topic.to_lowercase().as_str() {
            "config" | "configuration" | "env" => Some(self.format_config_help(use_colors)),
            "api" | "backend" => Some(self.format_api_help(use_colors)),
            "examples" => Some(self.format_examples_section(use_colors)),
            _ => None,
        }
    }

    fn section_title(title: &str, use_colors: bool) -> String {
        if use_colors {
            title.bright_green().bold().to_string()
        } else {
            title.to_string()
        }
    }

    fn format_header(&self, use_colors: bool) -> String {
        let title = "Speedtest Dashboard";
        let subtitle = "Terminal and HTML front end for the speedtest admin API";
        let version = env!("CARGO_PKG_VERSION");

        if use_colors {
            format!("{}\n{}\nVersion: {}\n", title.bright_cyan().bold(), subtitle.bright_blue(), version.green())
        } else {
            format!("{}\n{}\nVersion: {}\n", title, subtitle, version)
        }
    }

    fn format_usage_section(&self, use_colors: bool) -> String {
        let patterns = [
            "stdash history [OPTIONS]",
            "stdash run [OPTIONS]",
            "stdash interval <HOURS> [OPTIONS]",
            "stdash render [--output <FILE>] [OPTIONS]",
        ];

        let mut usage = format!("{}\n", Self::section_title("USAGE:", use_colors));
        for pattern in patterns {
            usage.push_str(&format!("  {}\n", pattern));
        }
        usage
    }

    fn format_examples_section(&self, use_colors: bool) -> String {
        let examples = [
            ExampleHelp {
                title: "Show the latest result and history",
                command: "stdash history --base-url http://pi.hole",
                description: "Loads the full history once and prints it",
            },
            ExampleHelp {
                title: "Run a test now",
                command: "stdash run --timeout 180",
                description: "Waits for the backend to finish, then reloads the history",
            },
            ExampleHelp {
                title: "Test every 12 hours",
                command: "stdash interval 12",
                description: "Values outside 1-24 are still sent; the backend decides",
            },
            ExampleHelp {
                title: "Export the admin page",
                command: "stdash render --output speedtest.html --no-color",
                description: "Writes a standalone page with the chart config embedded",
            },
        ];

        let mut output = format!("{}\n", Self::section_title("EXAMPLES:", use_colors));
        for example in examples {
            output.push_str(&example.format(use_colors));
        }
        output
    }

    fn format_environment_section(&self, use_colors: bool) -> String {
        let mut output = format!("{}\n", Self::section_title("ENVIRONMENT VARIABLES:", use_colors));
        output.push_str("Configuration priority: CLI arguments > Environment variables > .env file > Defaults\n\n");

        for (var_name, description, example) in EnvManager::get_supported_env_vars() {
            if use_colors {
                output.push_str(&format!("  {}: {}\n", var_name.bright_yellow().bold(), description));
            } else {
                output.push_str(&format!("  {}: {}\n", var_name, description));
            }
            output.push_str(&format!("      e.g. {}={}\n", var_name, example));
        }
        output
    }

    /// Variable list followed by a sample `.env` to copy
    fn format_config_help(&self, use_colors: bool) -> String {
        let mut output = self.format_environment_section(use_colors);
        output.push('\n');
        output.push_str(&format!("{}\n", Self::section_title("SAMPLE .env:", use_colors)));
        output.push_str(&EnvManager::create_example_env_content());
        output
    }

    fn format_api_help(&self, use_colors: bool) -> String {
        let mut output = format!("{}\n", Self::section_title("BACKEND API:", use_colors));
        output.push_str("All calls go to <base-url><api-path>, selected by query string:\n\n");
        output.push_str("  GET  ?speedtest            history, newest first: a JSON array of records\n");
        output.push_str("                             or {\"success\":false,\"message\":\"...\"}\n");
        output.push_str("  POST ?speedtest=run        run a test now; replies {\"success\":bool,\"message\"?}\n");
        output.push_str("  POST ?speedtest=interval   body {\"interval\":<hours>}; same reply shape\n\n");
        output.push_str("Record fields: timestamp, download (Mbps), upload (Mbps), ping (ms), server\n");
        output
    }
}

impl Default for HelpSystem {
    fn default() -> Self {
        Self::new()
    }
}

struct ExampleHelp {
    title: &'static str,
    command: &'static str,
    description: &'static str,
}

impl ExampleHelp {
    fn format(&self, use_colors: bool) -> String {
        if use_colors {
            format!(
                "  {}:\n    {}\n    {}\n",
                self.title.bright_yellow().bold(),
                self.command.bright_white(),
                self.description.bright_blue().italic()
            )
        } else {
            format!("  {}:\n    {}\n    {}\n", self.title, self.command, self.description)
        }
    }
}
