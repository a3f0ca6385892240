//! Client side of the news-analysis pipeline: event-stream sessions, result
//! classification and the dashboard state built from them.

use std::time::Duration;

use thiserror::Error;

pub mod classify;
pub mod client;
pub mod config;
pub mod controller;
pub mod model;
pub mod progress;
pub mod session;
pub mod sse;
pub mod stream;

pub use classify::{Classified, classify};
pub use client::{HealthStatus, NewsClient};
pub use config::{API_URL_ENV, Config, DEFAULT_API_URL, REQUEST_TIMEOUT_ENV};
pub use controller::{DashboardController, DashboardSnapshot, Notification, RETRY_MESSAGE};
pub use model::{Article, NewsReport, Sentiment, SentimentDistribution, SessionResult};
pub use progress::{LineStatus, LogAccumulator, ProgressLine};
pub use session::{
    COMPLETION_MARKER, Generation, SessionEvent, SessionEventKind, SessionLauncher, SessionPhase,
    SessionReceiver, SessionSender, SessionUpdate, StreamError, StreamSession,
};
pub use sse::{SseDecoder, SseEvent};
pub use stream::{SseLauncher, stream_url};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}
