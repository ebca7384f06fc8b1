//! Interval settings form

use crate::{
    api::SpeedtestApi,
    logging::{ErrorEventLogger, Logger},
    models::IntervalSetting,
    types::ActionOutcome,
    ui::notifications::NotificationCenter,
    utils::html::escape,
};
use std::sync::Arc;

pub const INTERVAL_SAVED: &str = "Interval updated successfully";
pub const INTERVAL_SAVE_FAILED: &str = "Error updating interval";

/// Numeric interval field and its save button
pub struct SettingsControl {
    api: Arc<dyn SpeedtestApi>,
    notifications: NotificationCenter,
    value: IntervalSetting,
    logger: Logger,
    error_logger: ErrorEventLogger,
}

impl SettingsControl {
    pub fn new(api: Arc<dyn SpeedtestApi>, notifications: NotificationCenter) -> Self {
        Self::with_logger(api, notifications, Logger::quiet("SETTINGS".to_string()))
    }

    pub fn with_logger(api: Arc<dyn SpeedtestApi>, notifications: NotificationCenter, logger: Logger) -> Self {
        Self {
            api,
            notifications,
            value: IntervalSetting::default(),
            error_logger: ErrorEventLogger::from_logger(logger.clone()),
            logger,
        }
    }

    /// Current field value
    pub fn value(&self) -> IntervalSetting {
        self.value
    }

    /// What the user typed. Bounds are hints only and are not enforced here.
    pub fn set_value(&mut self, value: IntervalSetting) {
        self.value = value;
    }

    /// Push the field value to the backend and raise a banner with the result.
    /// The field keeps whatever the user typed either way.
    pub async fn save_interval(&self) -> ActionOutcome {
        let value = self.value;
        let correlation_id = self.logger.start_operation("save_interval").await;

        if !value.is_within_bounds() {
            self.logger
                .warn(&format!(
                    "Interval {} is outside {}-{} hours; sending it anyway",
                    value,
                    IntervalSetting::MIN,
                    IntervalSetting::MAX
                ))
                .correlation_id(&correlation_id)
                .log()
                .await;
        }

        let outcome = match self.api.update_interval(value).await {
            Ok(()) => {
                self.notifications.success(INTERVAL_SAVED);
                ActionOutcome::Succeeded
            }
            Err(error) => {
                self.error_logger
                    .log_error(&error, Some("updating interval"), Some(&correlation_id))
                    .await;
                self.notifications
                    .error(format!("{}: {}", INTERVAL_SAVE_FAILED, error.notification_text()));
                ActionOutcome::Failed(error)
            }
        };

        self.logger
            .end_operation(&correlation_id, "save_interval", outcome.is_success())
            .await;
        outcome
    }

    /// Settings box markup
    pub fn render_html(&self) -> String {
        format!(
            r#"<div class="row">
    <div class="col-md-12">
        <div class="box" id="speedtest-settings">
            <div class="box-header with-border">
                <h3 class="box-title">Speedtest Settings</h3>
            </div>
            <div class="box-body">
                <div class="form-group">
                    <label for="speedtest-interval">Test Interval (hours):</label>
                    <input type="number" class="form-control" id="speedtest-interval" min="{}" max="{}" value="{}">
                </div>
                <button type="button" class="btn btn-primary" id="save-speedtest-settings">Save Settings</button>
            </div>
        </div>
    </div>
</div>"#,
            IntervalSetting::MIN,
            IntervalSetting::MAX,
            escape(&self.value.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::types::NotificationKind;
    use crate::ui::test_support::ScriptedApi;
    use crate::utils::clock::ManualClock;
    use std::time::Duration;

    fn settings(api: Arc<ScriptedApi>) -> (SettingsControl, ManualClock) {
        let clock = ManualClock::default();
        let notifications = NotificationCenter::new(Arc::new(clock.clone()));
        (SettingsControl::new(api, notifications), clock)
    }

    #[test]
    fn test_default_field_value() {
        let (control, _clock) = settings(Arc::new(ScriptedApi::new()));
        assert_eq!(control.value().hours(), 6);

        let html = control.render_html();
        assert!(html.contains(r#"id="speedtest-interval" min="1" max="24" value="6""#));
        assert!(html.contains(r#"id="save-speedtest-settings""#));
    }

    #[tokio::test]
    async fn test_save_success_banner_expires() {
        let api = Arc::new(ScriptedApi::new());
        let (mut control, clock) = settings(api.clone());
        control.set_value(IntervalSetting::new(12));

        assert_eq!(control.save_interval().await, ActionOutcome::Succeeded);
        assert_eq!(api.sent_intervals(), vec![IntervalSetting::new(12)]);

        let banners = control.notifications.visible();
        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].kind, NotificationKind::Success);
        assert_eq!(banners[0].text, INTERVAL_SAVED);

        clock.advance(Duration::from_secs(5));
        assert!(control.notifications.visible().is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_keeps_typed_value() {
        let api = Arc::new(ScriptedApi::new());
        api.push_interval(Err(AppError::api("interval must be between 1 and 24")));
        let (mut control, _clock) = settings(api);
        control.set_value(IntervalSetting::new(12));

        let outcome = control.save_interval().await;
        assert!(matches!(outcome, ActionOutcome::Failed(AppError::Api(_))));
        assert_eq!(control.value(), IntervalSetting::new(12));

        let banners = control.notifications.visible();
        assert_eq!(banners[0].kind, NotificationKind::Error);
        assert_eq!(banners[0].text, "Error updating interval: interval must be between 1 and 24");
    }

    #[tokio::test]
    async fn test_failure_on_untouched_field_keeps_default() {
        let api = Arc::new(ScriptedApi::new());
        api.push_interval(Err(AppError::network("connection refused")));
        let (control, _clock) = settings(api);

        control.save_interval().await;
        assert_eq!(control.value(), IntervalSetting::default());
        assert!(control.render_html().contains(r#"value="6""#));
    }

    #[tokio::test]
    async fn test_out_of_range_value_is_sent_as_typed() {
        let api = Arc::new(ScriptedApi::new());
        let (mut control, _clock) = settings(api.clone());
        control.set_value(IntervalSetting::new(48));

        control.save_interval().await;
        assert_eq!(api.sent_intervals(), vec![IntervalSetting::new(48)]);
    }

    #[tokio::test]
    async fn test_save_does_not_touch_history() {
        let api = Arc::new(ScriptedApi::new());
        let (control, _clock) = settings(api.clone());
        control.save_interval().await;
        assert_eq!(api.calls(), vec!["update_interval"]);
    }
}
