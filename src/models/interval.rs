//! Test-scheduling cadence held by the backend

use crate::defaults::{DEFAULT_INTERVAL_HOURS, MAX_INTERVAL_HOURS, MIN_INTERVAL_HOURS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hours between automatic speedtests.
///
/// The bounds are hints for the input field; the backend owns enforcement,
/// so out-of-range values are representable and get sent as typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalSetting(i64);

impl IntervalSetting {
    pub const MIN: i64 = MIN_INTERVAL_HOURS as i64;
    pub const MAX: i64 = MAX_INTERVAL_HOURS as i64;

    pub fn new(hours: i64) -> Self {
        Self(hours)
    }

    pub fn hours(&self) -> i64 {
        self.0
    }

    pub fn is_within_bounds(&self) -> bool {
        (Self::MIN..=Self::MAX).contains(&self.0)
    }
}

impl Default for IntervalSetting {
    fn default() -> Self {
        Self(DEFAULT_INTERVAL_HOURS as i64)
    }
}

impl fmt::Display for IntervalSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request body of the interval-update call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalUpdate {
    pub interval: IntervalSetting,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_and_bounds() {
        let interval = IntervalSetting::default();
        assert_eq!(interval.hours(), 6);
        assert!(interval.is_within_bounds());

        assert!(IntervalSetting::new(1).is_within_bounds());
        assert!(IntervalSetting::new(24).is_within_bounds());
        assert!(!IntervalSetting::new(0).is_within_bounds());
        assert!(!IntervalSetting::new(25).is_within_bounds());
    }

    #[test]
    fn test_update_body_shape() {
        let body = IntervalUpdate { interval: IntervalSetting::new(12) };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"interval":12}"#);
    }
}
