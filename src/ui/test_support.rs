//! Scripted backend double for view-control tests

use crate::{
    api::SpeedtestApi,
    error::Result,
    models::{IntervalSetting, MeasurementRecord},
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Answers queued per call; an empty queue answers with success
#[derive(Default)]
pub struct ScriptedApi {
    history: Mutex<VecDeque<Result<Vec<MeasurementRecord>>>>,
    run: Mutex<VecDeque<Result<()>>>,
    interval: Mutex<VecDeque<Result<()>>>,
    calls: Mutex<Vec<&'static str>>,
    sent_intervals: Mutex<Vec<IntervalSetting>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_history(&self, answer: Result<Vec<MeasurementRecord>>) {
        self.history.lock().unwrap().push_back(answer);
    }

    pub fn push_run(&self, answer: Result<()>) {
        self.run.lock().unwrap().push_back(answer);
    }

    pub fn push_interval(&self, answer: Result<()>) {
        self.interval.lock().unwrap().push_back(answer);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent_intervals(&self) -> Vec<IntervalSetting> {
        self.sent_intervals.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeedtestApi for ScriptedApi {
    async fn fetch_history(&self) -> Result<Vec<MeasurementRecord>> {
        self.calls.lock().unwrap().push("fetch_history");
        self.history.lock().unwrap().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn run_test(&self) -> Result<()> {
        self.calls.lock().unwrap().push("run_test");
        self.run.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn update_interval(&self, interval: IntervalSetting) -> Result<()> {
        self.calls.lock().unwrap().push("update_interval");
        self.sent_intervals.lock().unwrap().push(interval);
        self.interval.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

pub fn nyc_record() -> MeasurementRecord {
    MeasurementRecord::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), 93.21, 11.05, 14.3, "NYC-1")
}

pub fn record_at(hour: u32, download: f64, server: &str) -> MeasurementRecord {
    MeasurementRecord::new(
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
        download,
        download / 10.0,
        12.0,
        server,
    )
}
