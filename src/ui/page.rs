//! Full admin page: settings box above the dashboard, one shared banner stack

use crate::{
    api::SpeedtestApi,
    logging::Logger,
    models::Config,
    types::ActionOutcome,
    ui::{dashboard::Dashboard, notifications::NotificationCenter, settings::SettingsControl},
    utils::clock::Clock,
    utils::html::escape,
};
use std::sync::Arc;

const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js";

/// Draws the embedded chart config and wires the page buttons to the backend.
/// Results are shown in place: banners after `.speedtest-stats`, chart and
/// summary redrawn from a fresh `?speedtest` fetch.
const PAGE_SCRIPT: &str = r#"(function () {
    const api = document.body.dataset.api;
    const config = JSON.parse(document.getElementById('speedtest-chart-config').textContent);
    const chart = new Chart(document.getElementById('speedtest-chart'), config);

    function request(query, options) {
        return fetch(api + '?' + query, options).then(function (response) { return response.json(); });
    }

    function post(query, body) {
        return request(query, {
            method: 'POST',
            headers: body ? { 'Content-Type': 'application/json' } : {},
            body: body ? JSON.stringify(body) : undefined,
        });
    }

    function failureText(data) {
        return (data && data.message) || 'unknown error';
    }

    function showMessage(message, kind) {
        const alert = document.createElement('div');
        alert.className = 'alert ' + (kind === 'success' ? 'alert-success' : 'alert-danger') + ' alert-dismissible fade show';
        alert.setAttribute('role', 'alert');
        alert.textContent = message;
        const close = document.createElement('button');
        close.type = 'button';
        close.className = 'btn-close';
        close.setAttribute('data-bs-dismiss', 'alert');
        close.setAttribute('aria-label', 'Close');
        close.addEventListener('click', function () { alert.remove(); });
        alert.appendChild(close);

        document.querySelector('.speedtest-stats').after(alert);
        setTimeout(function () { alert.remove(); }, 5000);
    }

    function label(timestamp) {
        const iso = /[zZ]|[+-]\d\d:?\d\d$/.test(timestamp) ? timestamp : timestamp.replace(' ', 'T') + 'Z';
        return new Date(iso).toISOString().slice(0, 16).replace('T', ' ');
    }

    function updateStats(latest) {
        const stats = document.querySelector('.speedtest-stats');
        stats.replaceChildren();
        if (!latest) return;

        const cells = [
            ['col-4', 'Download', Number(latest.download).toFixed(2) + ' Mbps'],
            ['col-4', 'Upload', Number(latest.upload).toFixed(2) + ' Mbps'],
            ['col-4', 'Ping', Number(latest.ping).toFixed(2) + ' ms'],
            ['col-12', 'Server', String(latest.server)],
        ];
        let row = null;
        cells.forEach(function (cell, i) {
            if (i === 0 || i === 3) {
                row = document.createElement('div');
                row.className = 'row';
                stats.appendChild(row);
            }
            const col = document.createElement('div');
            col.className = cell[0];
            const heading = document.createElement('h6');
            heading.textContent = cell[1];
            const value = document.createElement('p');
            value.textContent = cell[2];
            col.append(heading, value);
            row.appendChild(col);
        });
    }

    function loadSpeedtestData() {
        return request('speedtest')
            .then(function (data) {
                let records;
                if (Array.isArray(data)) {
                    records = data;
                } else if (data && data.success) {
                    records = Array.isArray(data.data) ? data.data : [];
                } else {
                    showMessage('Error loading speedtest data: ' + failureText(data), 'error');
                    return;
                }

                chart.data.labels = records.map(function (r) { return label(r.timestamp); });
                chart.data.datasets[0].data = records.map(function (r) { return Number(r.download); });
                chart.data.datasets[1].data = records.map(function (r) { return Number(r.upload); });
                chart.update();
                updateStats(records[0]);
            })
            .catch(function (error) {
                showMessage('Error loading speedtest data: ' + error, 'error');
            });
    }

    document.getElementById('run-speedtest').addEventListener('click', function () {
        const button = this;
        const spinner = document.getElementById('speedtest-spinner');
        if (button.disabled) return;
        button.disabled = true;
        spinner.style.display = 'inline-block';

        post('speedtest=run')
            .then(function (data) {
                if (data && data.success) {
                    showMessage('Speedtest completed successfully', 'success');
                    return loadSpeedtestData();
                }
                showMessage('Error running speedtest: ' + failureText(data), 'error');
            })
            .catch(function (error) {
                showMessage('Error running speedtest: ' + error, 'error');
            })
            .finally(function () {
                button.disabled = false;
                spinner.style.display = 'none';
            });
    });

    document.getElementById('save-speedtest-settings').addEventListener('click', function () {
        const interval = parseInt(document.getElementById('speedtest-interval').value, 10);
        post('speedtest=interval', { interval: interval })
            .then(function (data) {
                if (data && data.success) {
                    showMessage('Interval updated successfully', 'success');
                } else {
                    showMessage('Error updating interval: ' + failureText(data), 'error');
                }
            })
            .catch(function (error) {
                showMessage('Error updating interval: ' + error, 'error');
            });
    });

    document.querySelectorAll('[data-notification-id]').forEach(function (alert) {
        setTimeout(function () { alert.remove(); }, 5000);
    });
})();"#;

/// Settings form and dashboard sharing one notification stack
pub struct SpeedtestPage {
    settings: SettingsControl,
    dashboard: Dashboard,
    notifications: NotificationCenter,
    api_url: String,
}

impl SpeedtestPage {
    pub fn new(
        api: Arc<dyn SpeedtestApi>,
        notifications: NotificationCenter,
        label_format: &str,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            settings: SettingsControl::new(Arc::clone(&api), notifications.clone()),
            dashboard: Dashboard::new(api, notifications.clone(), label_format),
            notifications,
            api_url: api_url.into(),
        }
    }

    /// Build from loaded configuration, logging through `Logger::with_config`
    pub fn from_config(api: Arc<dyn SpeedtestApi>, config: &Config, clock: Arc<dyn Clock>) -> crate::Result<Self> {
        let api_url = config.api_url()?;
        let notifications = NotificationCenter::new(clock);
        let logger = Logger::with_config("UI".to_string(), config);

        Ok(Self {
            settings: SettingsControl::with_logger(Arc::clone(&api), notifications.clone(), logger.clone()),
            dashboard: Dashboard::with_logger(api, notifications.clone(), &config.label_format, logger),
            notifications,
            api_url: api_url.to_string(),
        })
    }

    /// Page-load hook: fetch history once
    pub async fn initialize(&mut self) -> ActionOutcome {
        self.dashboard.load_data().await
    }

    pub fn settings(&self) -> &SettingsControl {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsControl {
        &mut self.settings
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn dashboard_mut(&mut self) -> &mut Dashboard {
        &mut self.dashboard
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Standalone HTML document
    pub fn render_html(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Speedtest</title>
<script src="{}"></script>
</head>
<body data-api="{}">
{}
{}
<script>
{}
</script>
</body>
</html>
"#,
            CHART_JS_CDN,
            escape(&self.api_url),
            self.settings.render_html(),
            self.dashboard.render_html(),
            PAGE_SCRIPT,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::IntervalSetting;
    use crate::ui::test_support::{nyc_record, ScriptedApi};
    use crate::utils::clock::ManualClock;

    fn page(api: Arc<ScriptedApi>) -> SpeedtestPage {
        let clock = ManualClock::default();
        SpeedtestPage::new(
            api,
            NotificationCenter::new(Arc::new(clock)),
            "%Y-%m-%d %H:%M",
            "http://localhost/admin/api.php",
        )
    }

    #[tokio::test]
    async fn test_initialize_loads_history_once() {
        let api = Arc::new(ScriptedApi::new());
        api.push_history(Ok(vec![nyc_record()]));
        let mut page = page(api.clone());

        assert_eq!(page.initialize().await, ActionOutcome::Succeeded);
        assert_eq!(api.calls(), vec!["fetch_history"]);
        assert_eq!(page.dashboard().chart().len(), 1);
    }

    #[tokio::test]
    async fn test_settings_and_dashboard_share_banners() {
        let api = Arc::new(ScriptedApi::new());
        api.push_interval(Err(AppError::api("bad interval")));
        api.push_run(Err(AppError::api("device busy")));
        let mut page = page(api);

        page.settings_mut().set_value(IntervalSetting::new(3));
        page.settings().save_interval().await;
        page.dashboard_mut().run_test().await;

        let banners = page.notifications().visible();
        assert_eq!(banners.len(), 2);
        assert_eq!(banners[0].text, "Error running speedtest: device busy");
        assert_eq!(banners[1].text, "Error updating interval: bad interval");
    }

    #[tokio::test]
    async fn test_render_document() {
        let api = Arc::new(ScriptedApi::new());
        api.push_history(Ok(vec![nyc_record()]));
        let mut page = page(api);
        page.initialize().await;

        let html = page.render_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"data-api="http://localhost/admin/api.php""#));
        let settings_at = html.find(r#"id="speedtest-settings""#).unwrap();
        let chart_at = html.find(r#"id="speedtest-chart""#).unwrap();
        assert!(settings_at < chart_at);
        assert!(html.contains("NYC-1"));
        assert!(html.contains("Network Speed Test Results"));
    }

    #[tokio::test]
    async fn test_page_script_updates_in_place() {
        let api = Arc::new(ScriptedApi::new());
        api.push_history(Ok(vec![nyc_record()]));
        let mut page = page(api);
        page.initialize().await;

        let html = page.render_html();
        let script_at = html.rfind("<script>").unwrap();
        let script = &html[script_at..];

        assert!(!script.contains("location.reload"));
        assert!(script.contains("data.success"));
        assert!(script.contains("'Speedtest completed successfully'"));
        assert!(script.contains("'Error running speedtest: '"));
        assert!(script.contains("'Interval updated successfully'"));
        assert!(script.contains("'Error updating interval: '"));
        assert!(script.contains("'Error loading speedtest data: '"));
        assert!(script.contains("'alert-success'"));
        assert!(script.contains("'alert-danger'"));
        assert!(script.contains(".speedtest-stats').after(alert)"));
        assert!(script.contains("setTimeout(function () { alert.remove(); }, 5000)"));
        assert!(script.contains("return loadSpeedtestData();"));
        assert!(script.contains("request('speedtest')"));
        assert!(script.contains("chart.update()"));
        assert_eq!(script.matches(".catch(").count(), 3);
    }

    #[tokio::test]
    async fn test_page_script_keeps_typed_interval_after_failed_save() {
        let api = Arc::new(ScriptedApi::new());
        let page = page(api);
        let html = page.render_html();
        let script = &html[html.rfind("<script>").unwrap()..];

        let save_at = script.find("getElementById('save-speedtest-settings')").unwrap();
        let save_handler = &script[save_at..];
        let handler_end = save_handler.find("});\n\n").unwrap();
        let save_handler = &save_handler[..handler_end];
        assert!(!save_handler.contains("speedtest-interval').value ="));
        assert!(!save_handler.contains("reload"));
    }

    #[test]
    fn test_from_config_rejects_bad_url() {
        let mut config = Config::default();
        config.base_url = "not a url".to_string();
        let result = SpeedtestPage::from_config(
            Arc::new(ScriptedApi::new()),
            &config,
            Arc::new(ManualClock::default()),
        );
        assert!(result.is_err());
    }
}
