//! Structured logging for the speedtest dashboard
//!
//! Every user action (load, run, save) is one correlated operation; the API
//! and error loggers add endpoint and error-category fields to each line.
//! Console lines for people, JSON lines under `--debug`. All output goes to
//! stderr so rendered pages and tables on stdout stay clean.

use crate::error::{AppError, Result};
use crate::models::Config;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// ANSI color for the level tag
    fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// One log line before formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Component tag (`APP`, `API`, `UI`)
    pub logger: String,
    /// Operation the line belongs to
    pub correlation_id: Option<String>,
    pub fields: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    Console,
    Json,
}

/// Leveled logger tagged with a component name.
///
/// Clones share the current operation id, so lines written by the settings
/// and dashboard controls during one action carry the same correlation id.
#[derive(Debug, Clone)]
pub struct Logger {
    /// `None` drops everything
    min_level: Option<LogLevel>,
    use_color: bool,
    format: LogFormat,
    name: String,
    current_operation: Arc<RwLock<Option<String>>>,
}

impl Logger {
    /// Info and above, colored console lines
    pub fn new(name: String) -> Self {
        Self {
            min_level: Some(LogLevel::Info),
            use_color: true,
            format: LogFormat::Console,
            name,
            current_operation: Arc::new(RwLock::new(None)),
        }
    }

    /// Warn by default, Info under `--verbose`, Debug and JSON under `--debug`
    pub fn with_config(name: String, config: &Config) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            min_level: Some(min_level),
            use_color: config.enable_color,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name,
            current_operation: Arc::new(RwLock::new(None)),
        }
    }

    /// Logger that writes nothing
    pub fn quiet(name: String) -> Self {
        Self {
            min_level: None,
            ..Self::new(name)
        }
    }

    /// Start a correlated operation and return its id
    pub async fn start_operation(&self, operation_name: &str) -> String {
        let correlation_id = Uuid::new_v4().to_string();
        *self.current_operation.write().await = Some(correlation_id.clone());

        self.debug(&format!("Started operation: {}", operation_name))
            .correlation_id(&correlation_id)
            .field("operation", operation_name)
            .log()
            .await;

        correlation_id
    }

    pub async fn end_operation(&self, correlation_id: &str, operation_name: &str, success: bool) {
        self.debug(&format!("Completed operation: {} (success: {})", operation_name, success))
            .correlation_id(correlation_id)
            .field("operation", operation_name)
            .field("success", success)
            .log()
            .await;

        let mut current = self.current_operation.write().await;
        if current.as_deref() == Some(correlation_id) {
            *current = None;
        }
    }

    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    pub fn would_log(&self, level: LogLevel) -> bool {
        self.min_level.is_some_and(|min| level >= min)
    }

    async fn write_entry(&self, mut entry: LogEntry) {
        if !self.would_log(entry.level) {
            return;
        }

        if entry.correlation_id.is_none() {
            entry.correlation_id = self.current_operation.read().await.clone();
        }

        let line = match self.format {
            LogFormat::Console => self.format_console(&entry),
            LogFormat::Json => format_json(&entry),
        };
        let _ = writeln!(io::stderr(), "{}", line);
    }

    /// `timestamp LEVEL [component] message [operation] {fields}`
    fn format_console(&self, entry: &LogEntry) -> String {
        let level = if self.use_color {
            format!("{}{:>5}\x1b[0m", entry.level.color_code(), entry.level.as_str())
        } else {
            format!("{:>5}", entry.level.as_str())
        };

        let mut line = format!(
            "{} {} [{}] {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            level,
            entry.logger,
            entry.message
        );

        if let Some(correlation_id) = &entry.correlation_id {
            let short: String = correlation_id.chars().take(8).collect();
            line.push_str(&format!(" [{}]", short));
        }

        if !entry.fields.is_empty() {
            let mut fields: Vec<String> = entry.fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            fields.sort();
            line.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        line
    }
}

fn format_json(entry: &LogEntry) -> String {
    serde_json::to_string(entry).unwrap_or_else(|_| {
        format!("{{\"error\": \"Failed to serialize log entry\", \"message\": {:?}}}", entry.message)
    })
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: HashMap::new(),
            },
        }
    }

    /// Add a correlation ID
    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_recoverable", error.is_recoverable())
            .field("error_exit_code", error.exit_code())
    }

    /// Finalize and write the log entry
    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

/// Specialized logger for calls to the speedtest backend
#[derive(Debug, Clone)]
pub struct ApiLogger {
    logger: Logger,
}

impl ApiLogger {
    /// Create a new API logger
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("API".to_string(), config),
        }
    }

    /// Wrap an existing logger
    pub fn from_logger(logger: Logger) -> Self {
        Self { logger }
    }

    /// Log a completed HTTP exchange
    pub async fn log_api_call(&self, method: &str, endpoint: &str, status_code: Option<u16>, duration_ms: f64) {
        let success = status_code.map(|code| (200..300).contains(&code)).unwrap_or(false);
        let level = if success { LogLevel::Debug } else { LogLevel::Warn };

        self.logger.log(level, &format!("{} {} -> {}", method, endpoint,
                status_code.map(|c| c.to_string()).unwrap_or_else(|| "no response".to_string())))
            .field("method", method)
            .field("endpoint", endpoint)
            .field("status_code", status_code)
            .field("duration_ms", duration_ms)
            .field("success", success)
            .log()
            .await;
    }

    /// Log an envelope that came back with `success: false`
    pub async fn log_backend_failure(&self, endpoint: &str, message: &str) {
        self.logger.warn(&format!("Backend reported failure on {}: {}", endpoint, message))
            .field("endpoint", endpoint)
            .field("backend_message", message)
            .log()
            .await;
    }

    /// Log a response shape that deviates from the documented contract
    pub async fn log_contract_deviation(&self, endpoint: &str, detail: &str) {
        self.logger.warn(&format!("Unexpected response shape from {}: {}", endpoint, detail))
            .field("endpoint", endpoint)
            .field("detail", detail)
            .log()
            .await;
    }
}

/// Error event logger with enhanced context
#[derive(Debug, Clone)]
pub struct ErrorEventLogger {
    logger: Logger,
}

impl ErrorEventLogger {
    /// Wrap an existing logger
    pub fn from_logger(logger: Logger) -> Self {
        Self { logger }
    }

    /// Log an application error with full context
    pub async fn log_error(&self, error: &AppError, context: Option<&str>, correlation_id: Option<&str>) {
        let message = if let Some(ctx) = context {
            format!("{}: {}", ctx, error)
        } else {
            error.to_string()
        };

        let mut builder = self.logger.error(&message)
            .error_info(error);

        if let Some(id) = correlation_id {
            builder = builder.correlation_id(id);
        }

        if let Some(ctx) = context {
            builder = builder.field("context", ctx);
        }

        builder.log().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Info,
            message: "Loaded 3 measurement(s)".to_string(),
            logger: "UI".to_string(),
            correlation_id: Some("0123456789abcdef".to_string()),
            fields: HashMap::from([("records".to_string(), serde_json::json!(3))]),
        }
    }

    #[test]
    fn test_log_level_parsing_and_order() {
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert!("trace".parse::<LogLevel>().is_err());
        assert!(LogLevel::Error > LogLevel::Info);
    }

    #[test]
    fn test_with_config_levels() {
        let mut config = Config::default();
        let quiet = Logger::with_config("T".to_string(), &config);
        assert!(!quiet.would_log(LogLevel::Info));
        assert!(quiet.would_log(LogLevel::Warn));

        config.verbose = true;
        let verbose = Logger::with_config("T".to_string(), &config);
        assert!(verbose.would_log(LogLevel::Info));
        assert!(!verbose.would_log(LogLevel::Debug));

        config.debug = true;
        let debug = Logger::with_config("T".to_string(), &config);
        assert!(debug.would_log(LogLevel::Debug));
        assert_eq!(debug.format, LogFormat::Json);
    }

    #[test]
    fn test_quiet_logger_drops_errors() {
        let logger = Logger::quiet("API".to_string());
        assert!(!logger.would_log(LogLevel::Error));
    }

    #[test]
    fn test_console_line() {
        let mut config = Config::default();
        config.enable_color = false;
        let logger = Logger::with_config("UI".to_string(), &config);

        let line = logger.format_console(&sample_entry());
        assert!(line.contains(" INFO [UI] Loaded 3 measurement(s) [01234567] {records=3}"));
        assert!(!line.contains('\x1b'));
    }

    #[test]
    fn test_json_line_round_trips() {
        let json = format_json(&sample_entry());
        let parsed: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.level, LogLevel::Info);
        assert_eq!(parsed.logger, "UI");
        assert_eq!(parsed.fields["records"], 3);
    }

    #[tokio::test]
    async fn test_operation_id_shared_by_clones() {
        let logger = Logger::quiet("UI".to_string());
        let clone = logger.clone();
        let id = logger.start_operation("load_data").await;
        assert_eq!(clone.current_operation.read().await.as_deref(), Some(id.as_str()));

        clone.end_operation(&id, "load_data", true).await;
        assert!(logger.current_operation.read().await.is_none());
    }

    #[tokio::test]
    async fn test_api_and_error_logging_do_not_panic() {
        let config = Config::default();
        let api_logger = ApiLogger::new(&config);
        api_logger.log_api_call("GET", "/admin/api.php?speedtest", Some(200), 12.5).await;
        api_logger.log_api_call("POST", "/admin/api.php?speedtest=run", None, 3000.0).await;
        api_logger.log_backend_failure("/admin/api.php?speedtest=run", "device busy").await;

        let err_logger = ErrorEventLogger::from_logger(Logger::with_config("UI".to_string(), &config));
        err_logger.log_error(&AppError::network("refused"), Some("loading history"), Some("abc")).await;
    }
}
