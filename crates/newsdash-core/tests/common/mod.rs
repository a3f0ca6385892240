//! Mock pipeline service for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::convert::Infallible;
use std::time::Duration;

use axum::Router;
use axum::extract::Query;
use axum::response::sse::{Event, Sse};
use futures_util::Stream;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;

use newsdash_core::{SessionEvent, SessionReceiver};

pub const RESULT_JSON: &str = r#"{"articles":[{"headline":"X","summary":"Y","sentiment":"Positive","source":"S","url":"http://x","publish_date":"2024-01-01"}],"sentiment_distribution":{"Positive":1}}"#;

pub type Params = Query<HashMap<String, String>>;

/// Serve `router` on an ephemeral loopback port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn topic(Query(params): Params) -> String {
    params.get("topic").cloned().unwrap_or_default()
}

/// SSE response emitting `payloads` as unnamed events, then closing.
pub fn events(
    payloads: Vec<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(tokio_stream::iter(
        payloads
            .into_iter()
            .map(|data| Ok(Event::default().data(data))),
    ))
}

/// Like [`events`], but the stream then stays open without sending.
pub fn events_then_hang(
    payloads: Vec<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let head = tokio_stream::iter(
        payloads
            .into_iter()
            .map(|data| Ok(Event::default().data(data))),
    );
    Sse::new(head.chain(tokio_stream::pending()))
}

/// The three-stage run the pipeline performs for `topic`.
pub fn pipeline_run(topic: &str) -> Vec<String> {
    vec![
        format!("Starting pipeline for {topic}"),
        "⏳ Running sentiment analysis...".to_string(),
        RESULT_JSON.to_string(),
    ]
}

pub fn channel() -> (newsdash_core::SessionSender, SessionReceiver) {
    mpsc::unbounded_channel()
}

/// Next event, failing the test if none arrives within five seconds.
pub async fn next_event(rx: &mut SessionReceiver) -> SessionEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a session event")
        .expect("event channel closed")
}
