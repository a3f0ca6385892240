//! HTTP access to the pipeline service.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::stream::SseLauncher;
use crate::{Config, CoreError, NewsReport};

/// Response of the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Client for the pipeline's HTTP endpoints.
#[derive(Debug, Clone)]
pub struct NewsClient {
    /// Bounded by the request timeout; used for request/response calls.
    http: reqwest::Client,
    /// Connect timeout only; used for event streams.
    streaming: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl NewsClient {
    pub fn new(config: &Config) -> Result<Self, CoreError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;
        let streaming = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self {
            http,
            streaming,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Launcher opening event streams against the same service.
    pub fn stream_launcher(&self) -> SseLauncher {
        SseLauncher::new(self.streaming.clone(), self.base_url.clone())
    }

    /// Run the whole pipeline for `topic` and wait for the report.
    ///
    /// This blocks for as long as the pipeline runs, up to the configured
    /// request timeout.
    pub async fn fetch_news(&self, topic: &str) -> Result<NewsReport, CoreError> {
        let url = format!(
            "{}/api/news?topic={}",
            self.base_url,
            urlencoding::encode(topic)
        );
        log::info!("fetching report for topic {topic:?}");
        self.get_json(&url).await
    }

    pub async fn health(&self) -> Result<HealthStatus, CoreError> {
        let url = format!("{}/api/health", self.base_url);
        self.get_json(&url).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, CoreError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| self.map_reqwest_error(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|err| self.map_reqwest_error(err))?;
        Ok(serde_json::from_str(&body)?)
    }

    fn map_reqwest_error(&self, err: reqwest::Error) -> CoreError {
        if err.is_timeout() {
            CoreError::Timeout(self.request_timeout)
        } else {
            CoreError::Http(err)
        }
    }
}
