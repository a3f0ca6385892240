//! Ordered progress log with a display status per line.

/// Display status of a progress line, derived from its text.
///
/// The pipeline does not send a status field, so this is a presentation hint
/// read off emoji and keywords, not a correctness signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStatus {
    Pending,
    Running,
    Complete,
}

impl LineStatus {
    pub fn of(text: &str) -> Self {
        let lower = text.to_lowercase();
        if text.contains('✅') || lower.contains("complete") {
            Self::Complete
        } else if text.contains('⏳') || lower.contains("running") {
            Self::Running
        } else {
            Self::Pending
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Complete => "complete",
        }
    }
}

/// One status update from the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressLine {
    pub text: String,
    pub status: LineStatus,
}

impl ProgressLine {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let status = LineStatus::of(&text);
        Self { text, status }
    }

    /// A line that is always [`LineStatus::Pending`] whatever its text says.
    pub fn pending(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: LineStatus::Pending,
        }
    }
}

/// Append-only, arrival-ordered buffer of progress lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogAccumulator {
    lines: Vec<ProgressLine>,
}

impl LogAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: impl Into<String>) -> ProgressLine {
        let line = ProgressLine::new(text);
        self.lines.push(line.clone());
        line
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[ProgressLine] {
        &self.lines
    }

    pub fn last(&self) -> Option<&ProgressLine> {
        self.lines.last()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
