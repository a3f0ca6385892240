//! Server-sent event connection to the pipeline's streaming endpoint.

use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use tokio_util::sync::CancellationToken;

use crate::session::{
    Generation, SessionEvent, SessionLauncher, SessionSender, StreamError,
};
use crate::sse::SseDecoder;

/// Path of the streaming endpoint, relative to the base URL.
pub const STREAM_PATH: &str = "/api/news-stream";

/// Build `{base}/api/news-stream?topic=...` with the topic percent-encoded.
pub fn stream_url(base_url: &str, topic: &str) -> String {
    format!(
        "{}{}?topic={}",
        base_url.trim_end_matches('/'),
        STREAM_PATH,
        urlencoding::encode(topic)
    )
}

/// Opens one HTTP event stream per session on the tokio runtime.
#[derive(Debug, Clone)]
pub struct SseLauncher {
    client: reqwest::Client,
    base_url: String,
}

impl SseLauncher {
    /// `client` should carry no overall timeout: the stream stays open for the
    /// whole pipeline run.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl SessionLauncher for SseLauncher {
    fn launch(
        &self,
        topic: &str,
        generation: Generation,
        events: SessionSender,
        cancel: CancellationToken,
    ) {
        let client = self.client.clone();
        let url = stream_url(&self.base_url, topic);
        tokio::spawn(async move {
            read_stream(client, url, generation, events, cancel).await;
        });
    }
}

/// Pump one event stream into `events` until it ends, fails or is canceled.
async fn read_stream(
    client: reqwest::Client,
    url: String,
    generation: Generation,
    events: SessionSender,
    cancel: CancellationToken,
) {
    let send_failure = |error: StreamError| {
        if !cancel.is_cancelled() {
            let _ = events.send(SessionEvent::failed(generation, error));
        }
    };

    log::debug!("session {generation}: GET {url}");
    let request = client
        .get(&url)
        .header(ACCEPT, "text/event-stream")
        .send();
    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        response = request => response,
    };

    let response = match response {
        Ok(response) => response,
        Err(err) => {
            send_failure(StreamError::Connect(err.to_string()));
            return;
        }
    };
    let status = response.status();
    if !status.is_success() {
        send_failure(StreamError::Status(status.as_u16()));
        return;
    }

    let mut decoder = SseDecoder::new();
    let mut body = response.bytes_stream();
    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            chunk = body.next() => chunk,
        };

        match chunk {
            Some(Ok(bytes)) => {
                for event in decoder.feed(&bytes) {
                    if cancel.is_cancelled() {
                        return;
                    }
                    if !event.is_message() {
                        log::debug!(
                            "session {generation}: ignoring {:?} event ({} bytes)",
                            event.event,
                            event.data.len()
                        );
                        continue;
                    }
                    if events
                        .send(SessionEvent::message(generation, event.data))
                        .is_err()
                    {
                        return;
                    }
                }
            }
            Some(Err(err)) => {
                send_failure(StreamError::Read(err.to_string()));
                return;
            }
            None => {
                send_failure(StreamError::Closed);
                return;
            }
        }
    }
}
