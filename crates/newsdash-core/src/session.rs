//! Lifecycle of one streaming search.
//!
//! A [`StreamSession`] is opened through a [`SessionLauncher`], which runs the
//! connection on the runtime and reports back over a channel. Every event is
//! tagged with the generation of the session that produced it, so the owner
//! can discard events from sessions it has already replaced.

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::classify::{Classified, classify};
use crate::progress::{LogAccumulator, ProgressLine};
use crate::SessionResult;

/// Identifies one session within a controller. Strictly increasing.
pub type Generation = u64;

/// Text of the line appended when the result arrives.
pub const COMPLETION_MARKER: &str = "✅ Pipeline complete";

/// Transport-level failure of a streaming connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("could not connect: {0}")]
    Connect(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("stream read failed: {0}")]
    Read(String),
    #[error("stream closed before a result arrived")]
    Closed,
}

/// What the connection reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEventKind {
    /// Payload of one unnamed server-sent event.
    Message(String),
    /// The connection failed or ended; nothing follows.
    Failed(StreamError),
}

/// An event from the connection of session `generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    pub generation: Generation,
    pub kind: SessionEventKind,
}

impl SessionEvent {
    pub fn message(generation: Generation, payload: impl Into<String>) -> Self {
        Self {
            generation,
            kind: SessionEventKind::Message(payload.into()),
        }
    }

    pub fn failed(generation: Generation, error: StreamError) -> Self {
        Self {
            generation,
            kind: SessionEventKind::Failed(error),
        }
    }
}

pub type SessionSender = mpsc::UnboundedSender<SessionEvent>;
pub type SessionReceiver = mpsc::UnboundedReceiver<SessionEvent>;

/// Starts the connection behind a session.
///
/// Implementations must return without waiting for the connection, deliver
/// events for `generation` in arrival order, and stop sending once `cancel`
/// fires.
pub trait SessionLauncher: Send + Sync {
    fn launch(
        &self,
        topic: &str,
        generation: Generation,
        events: SessionSender,
        cancel: CancellationToken,
    );
}

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session has been opened.
    Idle,
    /// Connection requested, nothing received yet.
    Open,
    /// At least one progress line received.
    Streaming,
    Completed,
    Errored,
    Canceled,
}

impl SessionPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Errored | Self::Canceled)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Open => "Connecting...",
            Self::Streaming => "Streaming...",
            Self::Completed => "Complete",
            Self::Errored => "Error",
            Self::Canceled => "Canceled",
        }
    }
}

/// State change caused by one applied event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    LogUpdated(ProgressLine),
    ResultReady(SessionResult),
    Failed(StreamError),
}

/// One streaming search, from open to its terminal outcome.
#[derive(Debug)]
pub struct StreamSession {
    generation: Generation,
    topic: String,
    phase: SessionPhase,
    log: LogAccumulator,
    cancel: CancellationToken,
}

impl StreamSession {
    /// Start the connection for `topic` and return immediately.
    pub fn open(
        launcher: &dyn SessionLauncher,
        topic: &str,
        generation: Generation,
        events: SessionSender,
    ) -> Self {
        let cancel = CancellationToken::new();
        log::info!("opening session {generation} for topic {topic:?}");
        launcher.launch(topic, generation, events, cancel.clone());
        Self {
            generation,
            topic: topic.to_string(),
            phase: SessionPhase::Open,
            log: LogAccumulator::new(),
            cancel,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn log(&self) -> &LogAccumulator {
        &self.log
    }

    /// Apply one event. Returns `None` once the session is terminal.
    pub fn apply(&mut self, kind: SessionEventKind) -> Option<SessionUpdate> {
        if self.phase.is_terminal() {
            log::debug!(
                "session {} is {:?}; ignoring late event",
                self.generation,
                self.phase
            );
            return None;
        }

        match kind {
            SessionEventKind::Message(payload) => match classify(&payload) {
                Classified::Progress(text) => {
                    self.phase = SessionPhase::Streaming;
                    Some(SessionUpdate::LogUpdated(self.log.append(text)))
                }
                Classified::Result(result) => {
                    self.log.append(COMPLETION_MARKER);
                    self.close(SessionPhase::Completed);
                    Some(SessionUpdate::ResultReady(result))
                }
            },
            SessionEventKind::Failed(error) => {
                log::warn!("session {} stream error: {error}", self.generation);
                self.close(SessionPhase::Errored);
                Some(SessionUpdate::Failed(error))
            }
        }
    }

    /// Close the connection. Returns `false` if the session had already ended.
    pub fn cancel(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.close(SessionPhase::Canceled);
        true
    }

    fn close(&mut self, phase: SessionPhase) {
        self.cancel.cancel();
        self.phase = phase;
        log::info!(
            "session {} closed: {} ({} lines)",
            self.generation,
            phase.label(),
            self.log.len()
        );
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::progress::LineStatus;

    /// Launcher that only records what it was asked to start.
    #[derive(Default)]
    pub(crate) struct RecordingLauncher {
        pub launched: Mutex<Vec<(String, Generation, CancellationToken)>>,
    }

    impl RecordingLauncher {
        pub fn topics(&self) -> Vec<String> {
            self.launched
                .lock()
                .unwrap()
                .iter()
                .map(|(topic, _, _)| topic.clone())
                .collect()
        }

        pub fn token(&self, index: usize) -> CancellationToken {
            self.launched.lock().unwrap()[index].2.clone()
        }
    }

    impl SessionLauncher for RecordingLauncher {
        fn launch(
            &self,
            topic: &str,
            generation: Generation,
            _events: SessionSender,
            cancel: CancellationToken,
        ) {
            self.launched
                .lock()
                .unwrap()
                .push((topic.to_string(), generation, cancel));
        }
    }

    const RESULT: &str = r#"{"articles":[{"headline":"X","sentiment":"Positive"}],"sentiment_distribution":{"Positive":1}}"#;

    fn open(launcher: &RecordingLauncher) -> StreamSession {
        let (tx, _rx) = mpsc::unbounded_channel();
        StreamSession::open(launcher, "AI", 1, tx)
    }

    fn message(payload: &str) -> SessionEventKind {
        SessionEventKind::Message(payload.to_string())
    }

    #[test]
    fn open_launches_without_receiving() {
        let launcher = RecordingLauncher::default();
        let session = open(&launcher);
        assert_eq!(session.phase(), SessionPhase::Open);
        assert_eq!(launcher.topics(), vec!["AI"]);
        assert!(!launcher.token(0).is_cancelled());
    }

    #[test]
    fn progress_keeps_streaming() {
        let launcher = RecordingLauncher::default();
        let mut session = open(&launcher);

        let update = session.apply(message("⏳ working..."));
        assert_eq!(
            update,
            Some(SessionUpdate::LogUpdated(ProgressLine::new("⏳ working...")))
        );
        session.apply(message("⏳ working..."));
        assert_eq!(session.phase(), SessionPhase::Streaming);
        assert_eq!(session.log().len(), 2);
        assert!(!launcher.token(0).is_cancelled());
    }

    #[test]
    fn n_progress_then_result_gives_n_plus_one_lines() {
        let launcher = RecordingLauncher::default();
        let mut session = open(&launcher);
        for i in 0..5 {
            session.apply(message(&format!("step {i}")));
        }

        let update = session.apply(message(RESULT));
        assert!(matches!(update, Some(SessionUpdate::ResultReady(ref r)) if r.articles.len() == 1));
        assert_eq!(session.log().len(), 6);
        let last = session.log().last().unwrap();
        assert_eq!(last.text, COMPLETION_MARKER);
        assert_eq!(last.status, LineStatus::Complete);
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert!(launcher.token(0).is_cancelled());
    }

    #[test]
    fn repeated_result_is_ignored() {
        let launcher = RecordingLauncher::default();
        let mut session = open(&launcher);
        session.apply(message(RESULT));

        assert_eq!(session.apply(message(RESULT)), None);
        assert_eq!(session.apply(message("late line")), None);
        assert_eq!(session.log().len(), 1);
        assert_eq!(session.phase(), SessionPhase::Completed);
    }

    #[test]
    fn transport_error_is_terminal() {
        let launcher = RecordingLauncher::default();
        let mut session = open(&launcher);

        let update = session.apply(SessionEventKind::Failed(StreamError::Closed));
        assert_eq!(update, Some(SessionUpdate::Failed(StreamError::Closed)));
        assert_eq!(session.phase(), SessionPhase::Errored);
        assert!(launcher.token(0).is_cancelled());
        assert_eq!(session.apply(message(RESULT)), None);
        assert!(session.log().is_empty());
    }

    #[test]
    fn cancel_closes_once() {
        let launcher = RecordingLauncher::default();
        let mut session = open(&launcher);
        session.apply(message("Running Fetcher Agent..."));

        assert!(session.cancel());
        assert!(launcher.token(0).is_cancelled());
        assert_eq!(session.phase(), SessionPhase::Canceled);
        assert!(!session.cancel());
        assert_eq!(session.apply(message(RESULT)), None);
    }

    #[test]
    fn cancel_after_completion_keeps_completed() {
        let launcher = RecordingLauncher::default();
        let mut session = open(&launcher);
        session.apply(message(RESULT));
        assert!(!session.cancel());
        assert_eq!(session.phase(), SessionPhase::Completed);
    }

    #[test]
    fn dropping_a_session_closes_its_connection() {
        let launcher = RecordingLauncher::default();
        drop(open(&launcher));
        assert!(launcher.token(0).is_cancelled());
    }
}
