//! reqwest-backed implementation of [`SpeedtestApi`]

use super::{
    response::{Envelope, HistoryResponse},
    SpeedtestApi,
};
use crate::{
    error::{AppError, Result},
    logging::{ApiLogger, Logger},
    models::{Config, IntervalSetting, IntervalUpdate, MeasurementRecord},
};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde_json::Value;
use std::time::{Duration, Instant};

const USER_AGENT: &str = concat!("speedtest-dashboard/", env!("CARGO_PKG_VERSION"));

/// The three calls the dashboard makes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    History,
    RunTest,
    UpdateInterval,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::History => Method::GET,
            Endpoint::RunTest | Endpoint::UpdateInterval => Method::POST,
        }
    }

    /// Query string selecting the action on the API script
    pub fn query(&self) -> &'static str {
        match self {
            Endpoint::History => "speedtest",
            Endpoint::RunTest => "speedtest=run",
            Endpoint::UpdateInterval => "speedtest=interval",
        }
    }
}

/// Speedtest backend client over HTTP
pub struct HttpSpeedtestApi {
    client: Client,
    api_url: Url,
    logger: ApiLogger,
}

impl HttpSpeedtestApi {
    /// Create a client from configuration, logging at the configured level
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config, ApiLogger::new(config))
    }

    /// Create a client with an explicit logger
    pub fn new(config: &Config, logger: ApiLogger) -> Result<Self> {
        let api_url = config.api_url()?;
        Self::with_timeout(api_url, config.timeout(), logger)
    }

    /// Create a client against an explicit API script URL
    pub fn with_timeout(api_url: Url, timeout: Duration, logger: ApiLogger) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url,
            logger,
        })
    }

    /// Client that only logs fatal events, for tests and embedding
    pub fn quiet(api_url: Url, timeout: Duration) -> Result<Self> {
        Self::with_timeout(api_url, timeout, ApiLogger::from_logger(Logger::quiet("API".to_string())))
    }

    /// URL for an endpoint
    pub fn endpoint_url(&self, endpoint: Endpoint) -> Url {
        let mut url = self.api_url.clone();
        url.set_query(Some(endpoint.query()));
        url
    }

    /// Issue a request and decode the body as JSON.
    ///
    /// A non-2xx answer is still accepted when its body is an envelope, since
    /// the backend reports its own failures that way.
    async fn send(&self, endpoint: Endpoint, body: Option<&IntervalUpdate>) -> Result<Value> {
        let url = self.endpoint_url(endpoint);
        let method = endpoint.method();
        let started = Instant::now();

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                self.logger
                    .log_api_call(method.as_str(), url.as_str(), None, elapsed_ms(started))
                    .await;
                return Err(e.into());
            }
        };

        let status = response.status();
        let bytes = response.bytes().await
            .map_err(|e| AppError::http_request(format!("Failed to read response body: {}", e)))?;

        self.logger
            .log_api_call(method.as_str(), url.as_str(), Some(status.as_u16()), elapsed_ms(started))
            .await;

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) if status.is_success() => Ok(value),
            Ok(value) if is_envelope(&value) => Ok(value),
            Ok(_) => Err(status_error(status)),
            Err(_) if !status.is_success() => Err(status_error(status)),
            Err(e) => Err(AppError::parse(format!("Response is not valid JSON: {}", e))),
        }
    }

    async fn send_envelope(&self, endpoint: Endpoint, body: Option<&IntervalUpdate>) -> Result<()> {
        let value = self.send(endpoint, body).await?;
        let envelope = Envelope::from_value(value)?;

        if !envelope.is_success() {
            self.logger
                .log_backend_failure(endpoint.query(), &envelope.failure_message())
                .await;
        }

        envelope.into_result()
    }
}

#[async_trait]
impl SpeedtestApi for HttpSpeedtestApi {
    async fn fetch_history(&self) -> Result<Vec<MeasurementRecord>> {
        let value = self.send(Endpoint::History, None).await?;
        let response = HistoryResponse::from_value(value)?;

        match &response {
            HistoryResponse::Enveloped(_) => {
                self.logger
                    .log_contract_deviation(Endpoint::History.query(), "records wrapped in a success envelope")
                    .await;
            }
            HistoryResponse::Failure(message) => {
                self.logger.log_backend_failure(Endpoint::History.query(), message).await;
            }
            HistoryResponse::Records(_) => {}
        }

        response.into_result()
    }

    async fn run_test(&self) -> Result<()> {
        self.send_envelope(Endpoint::RunTest, None).await
    }

    async fn update_interval(&self, interval: IntervalSetting) -> Result<()> {
        let body = IntervalUpdate { interval };
        self.send_envelope(Endpoint::UpdateInterval, Some(&body)).await
    }
}

fn is_envelope(value: &Value) -> bool {
    value.as_object().map(|o| o.contains_key("success")).unwrap_or(false)
}

fn status_error(status: StatusCode) -> AppError {
    AppError::http_request(format!("HTTP {}", status))
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
