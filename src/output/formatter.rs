//! Core formatting traits and implementations
//!
//! This module defines the terminal rendering interface for dashboard state
//! and provides a plain text implementation with table formatting.

use crate::{
    error::{AppError, Result},
    types::NotificationKind,
    ui::{Notification, SpeedChart, SummaryStats},
};
use std::fmt::Write as _;

/// Main trait for terminal output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the latest-result summary, or a placeholder if nothing was loaded
    fn format_summary(&self, stats: Option<&SummaryStats>) -> Result<String>;

    /// Format the chart series as a table, one row per point
    fn format_history_table(&self, chart: &SpeedChart) -> Result<String>;

    /// Format a single banner
    fn format_notification(&self, notification: &Notification) -> Result<String>;

    /// Format error messages
    fn format_error(&self, error: &str) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Format success messages
    fn format_success(&self, message: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Show table borders
    pub table_borders: bool,
    /// Only the newest `max_rows` points are tabulated; `None` shows all
    pub max_rows: Option<usize>,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            table_borders: true,
            max_rows: None,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    pub columns: Vec<Column>,
    pub show_borders: bool,
    pub show_header: bool,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub alignment: Alignment,
    pub min_width: usize,
}

impl Column {
    pub fn new(header: &str, alignment: Alignment, min_width: usize) -> Self {
        Self {
            header: header.to_string(),
            alignment,
            min_width,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Columns of the history table
pub(crate) fn history_table_format(show_borders: bool) -> TableFormat {
    TableFormat {
        columns: vec![
            Column::new("Time", Alignment::Left, 16),
            Column::new("Download (Mbps)", Alignment::Right, 8),
            Column::new("Upload (Mbps)", Alignment::Right, 8),
        ],
        show_borders,
        show_header: true,
    }
}

/// Rows of the history table, honoring `max_rows`
pub(crate) fn history_rows(chart: &SpeedChart, max_rows: Option<usize>) -> Vec<RowData> {
    let limit = max_rows.unwrap_or(usize::MAX);
    chart
        .points()
        .take(limit)
        .map(|(label, down, up)| vec![label.to_string(), format!("{:.2}", down), format!("{:.2}", up)])
        .collect()
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    /// Create a table with the given format and data
    pub(crate) fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let column_widths = Self::calculate_column_widths(format, rows);
        let mut output = String::new();

        if format.show_header && !format.columns.is_empty() {
            if format.show_borders {
                output.push_str(&Self::create_horizontal_border(&column_widths));
                output.push('\n');
            }

            let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
            output.push_str(&Self::create_row(&headers, &column_widths, format));
            output.push('\n');

            if format.show_borders {
                output.push_str(&Self::create_horizontal_border(&column_widths));
                output.push('\n');
            }
        }

        for row in rows {
            output.push_str(&Self::create_row(row, &column_widths, format));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&Self::create_horizontal_border(&column_widths));
        }

        output.trim_end().to_string()
    }

    fn calculate_column_widths(format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        let num_columns = format
            .columns
            .len()
            .max(rows.iter().map(|r| r.len()).max().unwrap_or(0));

        (0..num_columns)
            .map(|idx| {
                let base = format
                    .columns
                    .get(idx)
                    .map(|c| c.min_width.max(c.header.chars().count()))
                    .unwrap_or(0);
                rows.iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .fold(base, usize::max)
            })
            .collect()
    }

    fn create_row(data: &[String], widths: &[usize], format: &TableFormat) -> String {
        let mut row = String::new();

        if format.show_borders {
            row.push('|');
        }

        for (idx, (cell, &width)) in data.iter().zip(widths.iter()).enumerate() {
            let alignment = format.columns.get(idx).map(|c| &c.alignment).unwrap_or(&Alignment::Left);
            let padded_cell = Self::align_text(cell, width, alignment);

            if format.show_borders {
                row.push(' ');
            }
            row.push_str(&padded_cell);
            if format.show_borders {
                row.push_str(" |");
            } else {
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    fn create_horizontal_border(widths: &[usize]) -> String {
        let mut border = String::new();
        if !widths.is_empty() {
            border.push('+');
            for &width in widths {
                border.push_str(&"-".repeat(width + 2));
                border.push('+');
            }
        }
        border
    }

    fn align_text(text: &str, width: usize, alignment: &Alignment) -> String {
        match alignment {
            Alignment::Left => format!("{:<width$}", text, width = width),
            Alignment::Right => format!("{:>width$}", text, width = width),
        }
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.chars().count() + 4);

        writeln!(output, "{}", border)
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        writeln!(output, "  {}  ", title)
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        write!(output, "{}", border)
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;

        Ok(output)
    }

    fn format_summary(&self, stats: Option<&SummaryStats>) -> Result<String> {
        let Some(stats) = stats else {
            return Ok("Latest Result: no measurements yet".to_string());
        };

        let mut output = String::new();
        writeln!(output, "Latest Result:")
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        writeln!(output, "--------------")
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        writeln!(output, "Download: {}", stats.download)
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        writeln!(output, "Upload:   {}", stats.upload)
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        writeln!(output, "Ping:     {}", stats.ping)
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        write!(output, "Server:   {}", stats.server)
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;

        Ok(output)
    }

    fn format_history_table(&self, chart: &SpeedChart) -> Result<String> {
        if chart.is_empty() {
            return Ok("No measurements available.".to_string());
        }
        let format = history_table_format(self.options.table_borders);
        let rows = history_rows(chart, self.options.max_rows);
        Ok(self.create_table(&format, &rows))
    }

    fn format_notification(&self, notification: &Notification) -> Result<String> {
        match notification.kind {
            NotificationKind::Success => self.format_success(&notification.text),
            NotificationKind::Error => self.format_error(&notification.text),
        }
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("ERROR: {}", error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("SUCCESS: {}", message))
    }
}
