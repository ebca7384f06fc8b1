//! Output formatting and display system
//!
//! Renders dashboard state for the terminal, supporting both colored and
//! plain text output with table formatting.

mod colored;
mod formatter;

pub use self::colored::{ColorScheme, ColoredFormatter, SpeedLevel};
pub use self::formatter::{Alignment, Column, FormattingOptions, OutputFormatter, PlainFormatter, RowData, TableFormat};

use crate::{error::Result, ui::Dashboard, ui::NotificationCenter};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences.
    /// Verbose output tabulates the whole history; otherwise the newest 10 points.
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            table_borders: true,
            max_rows: if verbose { None } else { Some(10) },
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false, true)
    }
}

/// Turns dashboard state into terminal text
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
}

impl OutputCoordinator {
    pub fn new(formatter: Box<dyn OutputFormatter>) -> Self {
        Self { formatter }
    }

    /// Header, latest result and history table
    pub fn display_dashboard(&self, dashboard: &Dashboard) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.formatter.format_header(crate::ui::chart::CHART_TITLE)?);
        output.push_str("\n\n");
        output.push_str(&self.formatter.format_summary(dashboard.summary().stats())?);
        output.push_str("\n\n");
        output.push_str(&self.formatter.format_history_table(dashboard.chart())?);

        Ok(output)
    }

    /// Every banner still visible, newest first, one per line
    pub fn display_notifications(&self, notifications: &NotificationCenter) -> Result<String> {
        let lines = notifications
            .visible()
            .iter()
            .map(|n| self.formatter.format_notification(n))
            .collect::<Result<Vec<_>>>()?;
        Ok(lines.join("\n"))
    }

    pub fn display_warning(&self, warning: &str) -> Result<String> {
        self.formatter.format_warning(warning)
    }
}
