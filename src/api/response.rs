//! Wire types of the speedtest backend API
//!
//! Mutation endpoints answer with an envelope. The history endpoint answers
//! with a bare array on success and an envelope on failure, so its response
//! is decoded by JSON type rather than by probing for a `success` field.

use crate::error::{AppError, Result};
use crate::models::{record::validate_history, MeasurementRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const UNKNOWN_FAILURE: &str = "unknown error";

/// `{success, message?}` object returned by mutation endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    /// Not part of the documented contract; some backends wrap the history in it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    /// Absent `success` counts as failure
    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }

    pub fn failure_message(&self) -> String {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(UNKNOWN_FAILURE)
            .to_string()
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(AppError::api(self.failure_message()))
        }
    }

    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(AppError::parse(format!(
                "Expected a JSON object envelope, got {}",
                json_type_name(&value)
            )));
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Decoded answer of the history endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryResponse {
    /// Bare array of records, the documented success shape
    Records(Vec<MeasurementRecord>),
    /// `success: true` envelope, records taken from its `data` array if any
    Enveloped(Vec<MeasurementRecord>),
    /// Envelope without `success: true`
    Failure(String),
}

impl HistoryResponse {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(_) => {
                let records: Vec<MeasurementRecord> = serde_json::from_value(value)?;
                validate_history(&records)?;
                Ok(Self::Records(records))
            }
            Value::Object(_) => {
                let envelope = Envelope::from_value(value)?;
                if !envelope.is_success() {
                    return Ok(Self::Failure(envelope.failure_message()));
                }

                let records: Vec<MeasurementRecord> = match envelope.data {
                    Some(data @ Value::Array(_)) => serde_json::from_value(data)?,
                    Some(Value::Null) | None => Vec::new(),
                    Some(other) => {
                        return Err(AppError::parse(format!(
                            "Expected history data to be an array, got {}",
                            json_type_name(&other)
                        )))
                    }
                };
                validate_history(&records)?;
                Ok(Self::Enveloped(records))
            }
            other => Err(AppError::parse(format!(
                "Expected an array of records or an envelope, got {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn into_result(self) -> Result<Vec<MeasurementRecord>> {
        match self {
            Self::Records(records) | Self::Enveloped(records) => Ok(records),
            Self::Failure(message) => Err(AppError::api(message)),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
