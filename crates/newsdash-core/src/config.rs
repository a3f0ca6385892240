use std::time::Duration;

/// Environment variable overriding the pipeline base URL.
pub const API_URL_ENV: &str = "NEWSDASH_API_URL";

/// Environment variable overriding the non-streaming request timeout, in seconds.
pub const REQUEST_TIMEOUT_ENV: &str = "NEWSDASH_REQUEST_TIMEOUT";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Connection settings shared by the streaming and non-streaming paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the pipeline service, without a trailing slash.
    pub api_url: String,
    /// Upper bound for a whole non-streaming request. The pipeline run behind
    /// it takes minutes.
    pub request_timeout: Duration,
    /// Upper bound for establishing a connection, on both paths.
    pub connect_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(600),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Defaults overridden by `NEWSDASH_API_URL` and `NEWSDASH_REQUEST_TIMEOUT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(API_URL_ENV) {
            config = config.with_api_url(&url);
        }
        if let Some(secs) = lookup(REQUEST_TIMEOUT_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            config.request_timeout = Duration::from_secs(secs);
        }
        config
    }

    /// Replace the base URL; blank values keep the current one.
    pub fn with_api_url(mut self, url: &str) -> Self {
        let url = url.trim().trim_end_matches('/');
        if !url.is_empty() {
            self.api_url = url.to_string();
        }
        self
    }
}
