//! Colored formatter implementation with terminal color support
//!
//! Uses ANSI colors and Unicode symbols. Download speeds are color coded by
//! throughput tier.

use super::formatter::{history_rows, history_table_format, FormattingOptions, OutputFormatter, PlainFormatter};
use crate::{
    error::{AppError, Result},
    types::NotificationKind,
    ui::{Notification, SpeedChart, SummaryStats},
};
use colored::*;
use std::fmt::Write as _;

/// Throughput classification for color coding
#[derive(Debug, Clone, PartialEq)]
pub enum SpeedLevel {
    Excellent, // >= 100 Mbps
    Good,      // 25-100 Mbps
    Fair,      // 10-25 Mbps
    Poor,      // < 10 Mbps
}

impl SpeedLevel {
    /// Classify a throughput in Mbps
    pub fn from_mbps(mbps: f64) -> Self {
        if mbps >= 100.0 {
            Self::Excellent
        } else if mbps >= 25.0 {
            Self::Good
        } else if mbps >= 10.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Red,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
            border: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self {
            plain_formatter: PlainFormatter::new(options.clone()),
            options,
            color_scheme,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    fn create_section_header(&self, title: &str, icon: &str) -> String {
        if self.options.enable_color {
            format!("{} {}", icon, title.bold().color(self.color_scheme.header))
        } else {
            format!("{} {}", icon, title)
        }
    }

    /// Speed string colored by its tier
    fn speed_colored(&self, text: &str, mbps: f64) -> ColoredString {
        self.colorize(text, SpeedLevel::from_mbps(mbps).color())
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();

        let decorated_title = format!("📶 {}", title);
        let border = "═".repeat(decorated_title.chars().count() + 4);

        writeln!(output, "{}", self.colorize(&border, self.color_scheme.border))
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        writeln!(output, "  {}  ", self.bold(&decorated_title).color(self.color_scheme.header))
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        write!(output, "{}", self.colorize(&border, self.color_scheme.border))
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;

        Ok(output)
    }

    fn format_summary(&self, stats: Option<&SummaryStats>) -> Result<String> {
        let Some(stats) = stats else {
            return Ok(self
                .colorize("No measurements yet.", self.color_scheme.muted)
                .to_string());
        };

        let mut output = String::new();
        writeln!(output, "{}", self.create_section_header("Latest Result", "📊"))
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        writeln!(output, "⬇️  Download: {}", self.speed_colored(&stats.download, leading_number(&stats.download)))
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        writeln!(output, "⬆️  Upload:   {}", self.speed_colored(&stats.upload, leading_number(&stats.upload)))
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        writeln!(output, "⏱️  Ping:     {}", self.colorize(&stats.ping, self.color_scheme.info))
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        write!(output, "🌐 Server:   {}", self.colorize(&stats.server, self.color_scheme.info))
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;

        Ok(output)
    }

    fn format_history_table(&self, chart: &SpeedChart) -> Result<String> {
        if chart.is_empty() {
            return Ok(self
                .colorize("No measurements available.", self.color_scheme.muted)
                .to_string());
        }

        let format = history_table_format(self.options.table_borders);
        let rows = history_rows(chart, self.options.max_rows);
        let table = self.plain_formatter.create_table(&format, &rows);

        let mut output = String::new();
        writeln!(output, "{}", self.create_section_header("History", "📈"))
            .map_err(|e| AppError::io(format!("Failed to format history: {}", e)))?;
        write!(output, "{}", table)
            .map_err(|e| AppError::io(format!("Failed to format history: {}", e)))?;

        if let Some(best) = chart.download_series().iter().cloned().reduce(f64::max) {
            let level = SpeedLevel::from_mbps(best);
            write!(
                output,
                "\nPeak download: {}",
                self.colorize(&format!("{:.2} Mbps ({})", best, level.description()), level.color())
            )
            .map_err(|e| AppError::io(format!("Failed to format history: {}", e)))?;
        }

        Ok(output)
    }

    fn format_notification(&self, notification: &Notification) -> Result<String> {
        match notification.kind {
            NotificationKind::Success => self.format_success(&notification.text),
            NotificationKind::Error => self.format_error(&notification.text),
        }
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("❌ {}", self.colorize(error, self.color_scheme.error)))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("⚠️  {}", self.colorize(warning, self.color_scheme.warning)))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("✅ {}", self.colorize(message, self.color_scheme.success)))
    }
}

/// Helper functions for color management
impl ColoredFormatter {
    /// Check if terminal supports colors
    pub fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && std::env::var("TERM").map(|term| term != "dumb").unwrap_or(true)
    }

    /// Enable or disable colors at runtime
    pub fn set_colors_enabled(&mut self, enabled: bool) {
        self.options.enable_color = enabled && Self::supports_color();
    }
}

/// "93.21 Mbps" -> 93.21
fn leading_number(display: &str) -> f64 {
    display
        .split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(0.0)
}
