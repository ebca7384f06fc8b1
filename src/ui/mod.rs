//! Admin page view-controls: settings form, dashboard, notifications

pub mod chart;
pub mod dashboard;
pub mod notifications;
pub mod page;
pub mod settings;
pub mod summary;
pub mod trigger;

#[cfg(test)]
pub(crate) mod test_support;

pub use chart::SpeedChart;
pub use dashboard::Dashboard;
pub use notifications::{Notification, NotificationCenter};
pub use page::SpeedtestPage;
pub use settings::SettingsControl;
pub use summary::{SummaryPanel, SummaryStats};
pub use trigger::{BusyGuard, TriggerControl};
