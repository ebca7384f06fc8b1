//! Speedtest Dashboard
//!
//! Settings form and history dashboard for periodic network speedtest
//! results. The backend that runs the tests and stores the history is an
//! external collaborator reached over a small JSON API; this crate keeps the
//! view state (chart series, summary stats, notifications, the run trigger)
//! and renders it as HTML or terminal output.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod types;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use api::{HttpSpeedtestApi, SpeedtestApi};
pub use error::{AppError, Result};
pub use models::{Config, IntervalSetting, MeasurementRecord};
pub use types::{ActionOutcome, NotificationKind};
pub use ui::{Dashboard, NotificationCenter, SettingsControl, SpeedChart, SpeedtestPage, SummaryPanel};
pub use utils::clock::{Clock, ManualClock, SystemClock};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_BASE_URL: &str = "http://localhost";
    pub const DEFAULT_API_PATH: &str = "/admin/api.php";
    /// Speedtests routinely take close to a minute, so the transport timeout is generous
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
    pub const MAX_TIMEOUT_SECS: u64 = 600;
    pub const DEFAULT_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M";
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    pub const DEFAULT_INTERVAL_HOURS: u32 = 6;
    pub const MIN_INTERVAL_HOURS: u32 = 1;
    pub const MAX_INTERVAL_HOURS: u32 = 24;

    pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);
}
