//! Measurement record as produced by the speedtest backend

use crate::error::{AppError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Timestamp format used by SQL-backed backends that store naive UTC times
const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One speedtest result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// When the test ran
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Download throughput in Mbit/s
    #[serde(deserialize_with = "deserialize_number")]
    pub download: f64,
    /// Upload throughput in Mbit/s
    #[serde(deserialize_with = "deserialize_number")]
    pub upload: f64,
    /// Round-trip latency in milliseconds
    #[serde(deserialize_with = "deserialize_number")]
    pub ping: f64,
    /// Label of the server the test ran against
    pub server: String,
}

impl MeasurementRecord {
    pub fn new(timestamp: DateTime<Utc>, download: f64, upload: f64, ping: f64, server: impl Into<String>) -> Self {
        Self {
            timestamp,
            download,
            upload,
            ping,
            server: server.into(),
        }
    }

    /// Reject negative or non-finite measurements
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("download", self.download), ("upload", self.upload), ("ping", self.ping)] {
            if !value.is_finite() {
                return Err(AppError::parse(format!("{} is not a finite number", name)));
            }
            if value < 0.0 {
                return Err(AppError::parse(format!("{} must not be negative, got {}", name, value)));
            }
        }
        Ok(())
    }

    pub fn download_display(&self) -> String {
        format!("{:.2} Mbps", self.download)
    }

    pub fn upload_display(&self) -> String {
        format!("{:.2} Mbps", self.upload)
    }

    pub fn ping_display(&self) -> String {
        format!("{:.2} ms", self.ping)
    }
}

/// Validate a whole history; the first bad record fails it
pub fn validate_history(records: &[MeasurementRecord]) -> Result<()> {
    for (index, record) in records.iter().enumerate() {
        record
            .validate()
            .map_err(|e| AppError::parse(format!("record {} is malformed: {}", index, e)))?;
    }
    Ok(())
}

/// Parse RFC 3339 first, then the naive `YYYY-MM-DD HH:MM:SS` form as UTC
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, NAIVE_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| AppError::parse(format!("Unrecognised timestamp: '{}'", raw)))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

fn deserialize_number<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got '{}'", text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decode_rfc3339_record() {
        let json = r#"{"timestamp": "2024-01-01T00:00:00Z", "download": 93.21, "upload": 11.05, "ping": 14.3, "server": "NYC-1"}"#;
        let record: MeasurementRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(record.download, 93.21);
        assert_eq!(record.server, "NYC-1");
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_decode_naive_timestamp_and_string_numbers() {
        let json = r#"{"timestamp": "2024-03-05 14:30:00", "download": "250.5", "upload": "40", "ping": " 9.8 ", "server": "Frankfurt"}"#;
        let record: MeasurementRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.timestamp, Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap());
        assert_eq!(record.download, 250.5);
        assert_eq!(record.upload, 40.0);
        assert_eq!(record.ping, 9.8);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let bad_time = r#"{"timestamp": "yesterday", "download": 1, "upload": 1, "ping": 1, "server": "x"}"#;
        assert!(serde_json::from_str::<MeasurementRecord>(bad_time).is_err());

        let bad_number = r#"{"timestamp": "2024-01-01T00:00:00Z", "download": "fast", "upload": 1, "ping": 1, "server": "x"}"#;
        assert!(serde_json::from_str::<MeasurementRecord>(bad_number).is_err());

        let missing_server = r#"{"timestamp": "2024-01-01T00:00:00Z", "download": 1, "upload": 1, "ping": 1}"#;
        assert!(serde_json::from_str::<MeasurementRecord>(missing_server).is_err());
    }

    #[test]
    fn test_display_formatting() {
        let record = MeasurementRecord::new(Utc::now(), 93.21, 11.05, 14.3, "NYC-1");
        assert_eq!(record.download_display(), "93.21 Mbps");
        assert_eq!(record.upload_display(), "11.05 Mbps");
        assert_eq!(record.ping_display(), "14.30 ms");
    }

    #[test]
    fn test_validate_history_reports_index() {
        let records = vec![
            MeasurementRecord::new(Utc::now(), 10.0, 1.0, 5.0, "a"),
            MeasurementRecord::new(Utc::now(), 10.0, -1.0, 5.0, "b"),
        ];
        let err = validate_history(&records).unwrap_err();
        assert!(err.to_string().contains("record 1"));
        assert!(err.to_string().contains("upload"));

        let nan = MeasurementRecord::new(Utc::now(), f64::NAN, 1.0, 1.0, "c");
        assert!(nan.validate().is_err());
    }
}
