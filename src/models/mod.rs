//! Data models and structures for the speedtest dashboard

pub mod config;
pub mod interval;
pub mod record;

// Re-export main model types
pub use config::Config;
pub use interval::{IntervalSetting, IntervalUpdate};
pub use record::MeasurementRecord;
