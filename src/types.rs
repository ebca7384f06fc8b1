//! Type definitions shared across the view controls

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Kind of a notification banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    /// Bootstrap alert class for this kind
    pub fn css_class(&self) -> &'static str {
        match self {
            NotificationKind::Success => "alert-success",
            NotificationKind::Error => "alert-danger",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Error => write!(f, "error"),
        }
    }
}

/// State of the run-test trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerState {
    /// Enabled, spinner hidden
    Idle,
    /// Disabled, spinner shown, a run request is outstanding
    Busy,
}

/// How a user action settled
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The call went through and the view was updated
    Succeeded,
    /// The call failed; an error notification was raised
    Failed(AppError),
    /// The control was disabled, nothing was sent
    Ignored,
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Succeeded)
    }

    /// Convert into a `Result`, treating `Ignored` as success
    pub fn into_result(self) -> Result<()> {
        match self {
            ActionOutcome::Failed(error) => Err(error),
            ActionOutcome::Succeeded | ActionOutcome::Ignored => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_kind_styles() {
        assert_eq!(NotificationKind::Success.css_class(), "alert-success");
        assert_eq!(NotificationKind::Error.css_class(), "alert-danger");
        assert_eq!(NotificationKind::Error.to_string(), "error");
    }

    #[test]
    fn test_outcome_into_result() {
        assert!(ActionOutcome::Succeeded.into_result().is_ok());
        assert!(ActionOutcome::Ignored.into_result().is_ok());
        let failed = ActionOutcome::Failed(AppError::api("device busy"));
        assert!(!failed.is_success());
        assert_eq!(failed.into_result().unwrap_err(), AppError::api("device busy"));
    }
}
