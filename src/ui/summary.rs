//! Summary stats panel for the most recent measurement

use crate::models::MeasurementRecord;
use crate::utils::html::escape;
use serde::Serialize;

/// Rendered values shown in the panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub download: String,
    pub upload: String,
    pub ping: String,
    pub server: String,
}

impl From<&MeasurementRecord> for SummaryStats {
    fn from(record: &MeasurementRecord) -> Self {
        Self {
            download: record.download_display(),
            upload: record.upload_display(),
            ping: record.ping_display(),
            server: record.server.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryPanel {
    stats: Option<SummaryStats>,
}

impl SummaryPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the panel content. `None` leaves it untouched and returns false.
    pub fn update(&mut self, record: Option<&MeasurementRecord>) -> bool {
        match record {
            Some(record) => {
                self.stats = Some(SummaryStats::from(record));
                true
            }
            None => false,
        }
    }

    pub fn stats(&self) -> Option<&SummaryStats> {
        self.stats.as_ref()
    }

    /// Inner HTML of the `.speedtest-stats` element
    pub fn render_html(&self) -> String {
        let Some(stats) = &self.stats else {
            return String::new();
        };

        format!(
            r#"<div class="row">
    <div class="col-4">
        <h6>Download</h6>
        <p>{}</p>
    </div>
    <div class="col-4">
        <h6>Upload</h6>
        <p>{}</p>
    </div>
    <div class="col-4">
        <h6>Ping</h6>
        <p>{}</p>
    </div>
</div>
<div class="row">
    <div class="col-12">
        <h6>Server</h6>
        <p>{}</p>
    </div>
</div>"#,
            escape(&stats.download),
            escape(&stats.upload),
            escape(&stats.ping),
            escape(&stats.server),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn nyc_record() -> MeasurementRecord {
        MeasurementRecord::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), 93.21, 11.05, 14.3, "NYC-1")
    }

    #[test]
    fn test_update_formats_two_decimals() {
        let mut panel = SummaryPanel::new();
        assert!(panel.update(Some(&nyc_record())));

        let stats = panel.stats().unwrap();
        assert_eq!(stats.download, "93.21 Mbps");
        assert_eq!(stats.upload, "11.05 Mbps");
        assert_eq!(stats.ping, "14.30 ms");
        assert_eq!(stats.server, "NYC-1");
    }

    #[test]
    fn test_update_with_none_is_noop() {
        let mut panel = SummaryPanel::new();
        assert!(!panel.update(None));
        assert!(panel.stats().is_none());
        assert_eq!(panel.render_html(), "");

        panel.update(Some(&nyc_record()));
        let before = panel.clone();
        assert!(!panel.update(None));
        assert_eq!(panel, before);
    }

    #[test]
    fn test_update_replaces_wholesale() {
        let mut panel = SummaryPanel::new();
        panel.update(Some(&nyc_record()));

        let mut other = nyc_record();
        other.server = "LAX-2".to_string();
        other.ping = 3.0;
        panel.update(Some(&other));

        let html = panel.render_html();
        assert!(html.contains("LAX-2"));
        assert!(html.contains("3.00 ms"));
        assert!(!html.contains("NYC-1"));
    }

    #[test]
    fn test_render_escapes_server_label() {
        let mut record = nyc_record();
        record.server = "<script>alert(1)</script>".to_string();
        let mut panel = SummaryPanel::new();
        panel.update(Some(&record));

        let html = panel.render_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
