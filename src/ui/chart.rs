//! Line chart model: one label series and two value series kept index-aligned

use crate::models::MeasurementRecord;
use chrono::Local;
use serde_json::{json, Value};
use std::fmt::Write as _;

pub const CHART_TITLE: &str = "Network Speed Test Results";
pub const DOWNLOAD_DATASET_LABEL: &str = "Download (Mbps)";
pub const UPLOAD_DATASET_LABEL: &str = "Upload (Mbps)";
pub const DOWNLOAD_COLOR: &str = "rgb(75, 192, 192)";
pub const UPLOAD_COLOR: &str = "rgb(255, 99, 132)";
const LINE_TENSION: f64 = 0.1;

/// Data behind the speed chart
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedChart {
    labels: Vec<String>,
    download: Vec<f64>,
    upload: Vec<f64>,
    label_format: String,
    revision: u64,
}

impl SpeedChart {
    pub fn new(label_format: impl Into<String>) -> Self {
        Self {
            labels: Vec::new(),
            download: Vec::new(),
            upload: Vec::new(),
            label_format: label_format.into(),
            revision: 0,
        }
    }

    /// Replace all three series from `records`, in their given order.
    ///
    /// The new series are built first and swapped in together, so readers
    /// never observe series of different lengths.
    pub fn replace(&mut self, records: &[MeasurementRecord]) {
        let labels: Vec<String> = records.iter().map(|r| self.format_label(r)).collect();
        let download: Vec<f64> = records.iter().map(|r| r.download).collect();
        let upload: Vec<f64> = records.iter().map(|r| r.upload).collect();

        self.labels = labels;
        self.download = download;
        self.upload = upload;
        self.revision += 1;
    }

    fn format_label(&self, record: &MeasurementRecord) -> String {
        let local = record.timestamp.with_timezone(&Local);
        let mut label = String::new();
        // chrono reports bad format strings as a fmt error rather than at parse time
        if write!(label, "{}", local.format(&self.label_format)).is_err() {
            label.clear();
            label.push_str(&local.to_rfc3339());
        }
        label
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn download_series(&self) -> &[f64] {
        &self.download
    }

    pub fn upload_series(&self) -> &[f64] {
        &self.upload
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of completed `replace` calls
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// `(label, download, upload)` per point
    pub fn points(&self) -> impl Iterator<Item = (&str, f64, f64)> + '_ {
        self.labels
            .iter()
            .zip(self.download.iter())
            .zip(self.upload.iter())
            .map(|((label, down), up)| (label.as_str(), *down, *up))
    }

    /// Chart.js line-chart configuration for the current data
    pub fn to_chartjs_config(&self) -> Value {
        json!({
            "type": "line",
            "data": {
                "labels": self.labels,
                "datasets": [
                    {
                        "label": DOWNLOAD_DATASET_LABEL,
                        "data": self.download,
                        "borderColor": DOWNLOAD_COLOR,
                        "tension": LINE_TENSION,
                    },
                    {
                        "label": UPLOAD_DATASET_LABEL,
                        "data": self.upload,
                        "borderColor": UPLOAD_COLOR,
                        "tension": LINE_TENSION,
                    }
                ]
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "scales": { "y": { "beginAtZero": true } },
                "plugins": {
                    "legend": { "position": "top" },
                    "title": { "display": true, "text": CHART_TITLE }
                }
            }
        })
    }
}

impl Default for SpeedChart {
    fn default() -> Self {
        Self::new(crate::defaults::DEFAULT_LABEL_FORMAT)
    }
}
