//! Dashboard: history chart, latest-result summary and the run-test trigger

use crate::{
    api::SpeedtestApi,
    logging::{ErrorEventLogger, Logger},
    models::MeasurementRecord,
    types::{ActionOutcome, NotificationKind},
    ui::{
        chart::SpeedChart,
        notifications::NotificationCenter,
        summary::SummaryPanel,
        trigger::TriggerControl,
    },
    utils::html::{escape, escape_script_json},
};
use std::sync::Arc;

pub const LOAD_FAILED: &str = "Error loading speedtest data";
pub const RUN_SUCCEEDED: &str = "Speedtest completed successfully";
pub const RUN_FAILED: &str = "Error running speedtest";

/// Keeps the chart and summary in step with the backend's history
pub struct Dashboard {
    api: Arc<dyn SpeedtestApi>,
    notifications: NotificationCenter,
    chart: SpeedChart,
    summary: SummaryPanel,
    trigger: TriggerControl,
    records: Vec<MeasurementRecord>,
    logger: Logger,
    error_logger: ErrorEventLogger,
}

impl Dashboard {
    pub fn new(api: Arc<dyn SpeedtestApi>, notifications: NotificationCenter, label_format: &str) -> Self {
        Self::with_logger(api, notifications, label_format, Logger::quiet("DASHBOARD".to_string()))
    }

    pub fn with_logger(
        api: Arc<dyn SpeedtestApi>,
        notifications: NotificationCenter,
        label_format: &str,
        logger: Logger,
    ) -> Self {
        Self {
            api,
            notifications,
            chart: SpeedChart::new(label_format),
            summary: SummaryPanel::new(),
            trigger: TriggerControl::new(),
            records: Vec::new(),
            error_logger: ErrorEventLogger::from_logger(logger.clone()),
            logger,
        }
    }

    /// Fetch the full history and redraw.
    ///
    /// On failure the chart, summary and cached records keep their prior state.
    pub async fn load_data(&mut self) -> ActionOutcome {
        let correlation_id = self.logger.start_operation("load_data").await;

        let outcome = match self.api.fetch_history().await {
            Ok(records) => {
                self.chart.replace(&records);
                self.records = records;
                // The backend orders newest first; the first record is the latest
                let latest = self.records.first().cloned();
                self.update_summary(latest.as_ref());

                self.logger
                    .info(&format!("Loaded {} measurement(s)", self.records.len()))
                    .correlation_id(&correlation_id)
                    .field("records", self.records.len())
                    .log()
                    .await;
                ActionOutcome::Succeeded
            }
            Err(error) => {
                self.error_logger
                    .log_error(&error, Some("loading history"), Some(&correlation_id))
                    .await;
                self.notifications
                    .error(format!("{}: {}", LOAD_FAILED, error.notification_text()));
                ActionOutcome::Failed(error)
            }
        };

        self.logger
            .end_operation(&correlation_id, "load_data", outcome.is_success())
            .await;
        outcome
    }

    /// Trigger an on-demand measurement, then reload on success.
    ///
    /// Returns `Ignored` without calling the backend if a run is already in
    /// flight. The trigger is re-enabled when this returns, whatever happened.
    pub async fn run_test(&mut self) -> ActionOutcome {
        let Some(_busy) = self.trigger.try_begin() else {
            self.logger.debug("Run trigger is busy, ignoring click").log().await;
            return ActionOutcome::Ignored;
        };
        let correlation_id = self.logger.start_operation("run_test").await;

        let outcome = match self.api.run_test().await {
            Ok(()) => {
                self.load_data().await;
                self.notifications.success(RUN_SUCCEEDED);
                ActionOutcome::Succeeded
            }
            Err(error) => {
                self.error_logger
                    .log_error(&error, Some("running speedtest"), Some(&correlation_id))
                    .await;
                self.notifications
                    .error(format!("{}: {}", RUN_FAILED, error.notification_text()));
                ActionOutcome::Failed(error)
            }
        };

        self.logger
            .end_operation(&correlation_id, "run_test", outcome.is_success())
            .await;
        outcome
    }

    /// Render `record` into the summary panel; `None` leaves it as is
    pub fn update_summary(&mut self, record: Option<&MeasurementRecord>) {
        self.summary.update(record);
    }

    /// Raise a banner next to the summary panel
    pub fn show_message(&self, text: impl Into<String>, kind: NotificationKind) -> u64 {
        self.notifications.show_message(text, kind)
    }

    pub fn chart(&self) -> &SpeedChart {
        &self.chart
    }

    pub fn summary(&self) -> &SummaryPanel {
        &self.summary
    }

    pub fn trigger(&self) -> &TriggerControl {
        &self.trigger
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Records from the last successful load, in backend order
    pub fn records(&self) -> &[MeasurementRecord] {
        &self.records
    }

    /// Dashboard box markup, including the chart config for the client-side renderer
    pub fn render_html(&self) -> String {
        let chart_config = escape_script_json(&self.chart.to_chartjs_config().to_string());
        let disabled = if self.trigger.is_enabled() { "" } else { " disabled" };
        let spinner_style = if self.trigger.spinner_visible() { "" } else { r#" style="display: none;""# };

        format!(
            r#"<div class="row">
    <div class="col-md-12">
        <div class="box" id="speedtest-dashboard">
            <div class="box-header with-border">
                <h3 class="box-title">{}</h3>
                <button type="button" class="btn btn-primary" id="run-speedtest"{}>Run Speedtest</button>
                <span class="spinner-border spinner-border-sm" id="speedtest-spinner" role="status"{}></span>
            </div>
            <div class="box-body">
                <div class="chart-container" style="position: relative; height: 300px;">
                    <canvas id="speedtest-chart"></canvas>
                </div>
                <script type="application/json" id="speedtest-chart-config">{}</script>
                <div class="speedtest-stats">{}</div>
{}
            </div>
        </div>
    </div>
</div>"#,
            escape(crate::ui::chart::CHART_TITLE),
            disabled,
            spinner_style,
            chart_config,
            self.summary.render_html(),
            self.notifications.render_html(),
        )
    }
}
