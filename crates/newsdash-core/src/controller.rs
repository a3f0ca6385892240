//! Search orchestration and the state the presentation layer reads.

use std::sync::Arc;

use crate::progress::ProgressLine;
use crate::session::{
    Generation, SessionEvent, SessionLauncher, SessionPhase, SessionSender, SessionUpdate,
    StreamSession,
};
use crate::{Article, SentimentDistribution};

/// Message shown when the stream fails; the user has to search again.
pub const RETRY_MESSAGE: &str = "Stream error. Please try again.";

/// What changed after an event was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    LogUpdated(ProgressLine),
    ResultReady,
    Failed(String),
}

/// Owned copy of everything the dashboard displays.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardSnapshot {
    pub topic: Option<String>,
    pub log: Vec<ProgressLine>,
    pub articles: Vec<Article>,
    pub sentiment: SentimentDistribution,
    pub error: String,
    pub warning: Option<String>,
    pub loading: bool,
}

/// Runs one streaming search at a time and keeps the displayed state.
///
/// All mutation happens on the task that owns the controller: connection
/// tasks only send [`SessionEvent`]s, which the owner passes to
/// [`handle_event`](Self::handle_event). Events from any session other than
/// the current generation are discarded there.
pub struct DashboardController {
    launcher: Arc<dyn SessionLauncher>,
    events: SessionSender,
    generation: Generation,
    session: Option<StreamSession>,
    search_line: Option<ProgressLine>,
    articles: Vec<Article>,
    sentiment: SentimentDistribution,
    error: String,
    warning: Option<String>,
    loading: bool,
}

impl DashboardController {
    /// `events` is the sending half of the channel the owner drains.
    pub fn new(launcher: Arc<dyn SessionLauncher>, events: SessionSender) -> Self {
        Self {
            launcher,
            events,
            generation: 0,
            session: None,
            search_line: None,
            articles: Vec::new(),
            sentiment: SentimentDistribution::new(),
            error: String::new(),
            warning: None,
            loading: false,
        }
    }

    /// Start a search, replacing any session in progress.
    ///
    /// Returns the new session's generation, or `None` for a blank topic.
    pub fn search(&mut self, topic: &str) -> Option<Generation> {
        if topic.trim().is_empty() {
            return None;
        }

        if let Some(previous) = self.session.as_mut() {
            if previous.cancel() {
                log::info!(
                    "session {} superseded by a new search",
                    previous.generation()
                );
            }
        }

        self.generation += 1;
        self.articles.clear();
        self.sentiment = SentimentDistribution::new();
        self.error.clear();
        self.warning = None;
        self.loading = true;
        self.search_line = Some(ProgressLine::pending(format!(
            "🔎 Searching for \"{topic}\"..."
        )));
        self.session = Some(StreamSession::open(
            self.launcher.as_ref(),
            topic,
            self.generation,
            self.events.clone(),
        ));
        Some(self.generation)
    }

    /// Stop the running search. Returns `false` if nothing was running.
    pub fn cancel(&mut self) -> bool {
        let canceled = self
            .session
            .as_mut()
            .is_some_and(|session| session.cancel());
        if canceled {
            self.loading = false;
        }
        canceled
    }

    /// Apply an event from a connection task.
    pub fn handle_event(&mut self, event: SessionEvent) -> Option<Notification> {
        if event.generation != self.generation {
            log::debug!(
                "dropping event from superseded session {} (current {})",
                event.generation,
                self.generation
            );
            return None;
        }
        let session = self.session.as_mut()?;

        match session.apply(event.kind)? {
            SessionUpdate::LogUpdated(line) => Some(Notification::LogUpdated(line)),
            SessionUpdate::ResultReady(result) => {
                log::info!(
                    "session {}: {} articles",
                    self.generation,
                    result.articles.len()
                );
                self.articles = result.articles;
                self.sentiment = result.sentiment_distribution;
                self.warning = result.error;
                self.loading = false;
                Some(Notification::ResultReady)
            }
            SessionUpdate::Failed(_) => {
                self.error = RETRY_MESSAGE.to_string();
                self.loading = false;
                Some(Notification::Failed(self.error.clone()))
            }
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn phase(&self) -> SessionPhase {
        self.session
            .as_ref()
            .map_or(SessionPhase::Idle, StreamSession::phase)
    }

    pub fn topic(&self) -> Option<&str> {
        self.session.as_ref().map(StreamSession::topic)
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Retry message after a stream failure, empty otherwise.
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Failure note the pipeline attached to its result, if any.
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn sentiment(&self) -> &SentimentDistribution {
        &self.sentiment
    }

    /// Lines produced by the current session alone, without the search line.
    pub fn session_log(&self) -> &[ProgressLine] {
        self.session
            .as_ref()
            .map(|session| session.log().lines())
            .unwrap_or_default()
    }

    /// The displayed log: the search line, then the session's lines in order.
    pub fn log(&self) -> impl Iterator<Item = &ProgressLine> {
        self.search_line.iter().chain(self.session_log())
    }

    pub fn log_len(&self) -> usize {
        usize::from(self.search_line.is_some()) + self.session_log().len()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            topic: self.topic().map(str::to_string),
            log: self.log().cloned().collect(),
            articles: self.articles.clone(),
            sentiment: self.sentiment.clone(),
            error: self.error.clone(),
            warning: self.warning.clone(),
            loading: self.loading,
        }
    }
}
