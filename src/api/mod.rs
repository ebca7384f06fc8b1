//! Contract with the speedtest backend
//!
//! The backend runs the measurements and stores the history; the dashboard
//! only calls it. [`SpeedtestApi`] is the seam between the view controls and
//! the transport, so controls can be driven by a scripted double in tests.

pub mod client;
pub mod response;


pub use client::{Endpoint, HttpSpeedtestApi};
pub use response::{Envelope, HistoryResponse};

use crate::{
    error::Result,
    models::{IntervalSetting, MeasurementRecord},
};
use async_trait::async_trait;

/// Calls the dashboard makes against the backend.
///
/// Application-level failures (`success: false`) come back as
/// [`AppError::Api`](crate::error::AppError::Api) carrying the backend's message.
#[async_trait]
pub trait SpeedtestApi: Send + Sync {
    /// Full measurement history, in the order the backend returns it
    async fn fetch_history(&self) -> Result<Vec<MeasurementRecord>>;

    /// Trigger an on-demand measurement; does not return the new record
    async fn run_test(&self) -> Result<()>;

    /// Update the automatic test cadence
    async fn update_interval(&self, interval: IntervalSetting) -> Result<()>;
}
