use ratatui::style::{Color, Modifier, Style};

use newsdash_core::{LineStatus, Sentiment, SessionPhase};

/// Color theme for the TUI.
pub struct Theme {
    pub positive: Color,
    pub neutral: Color,
    pub negative: Color,
    pub other: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub active: Color,
    pub spinner: Color,
    pub error: Color,
    pub warning: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    /// Dark terminal theme with a blue header.
    pub fn newsroom() -> Self {
        Self {
            positive: Color::Green,
            neutral: Color::Gray,
            negative: Color::Red,
            other: Color::Magenta,

            header_fg: Color::Black,
            header_bg: Color::Cyan,
            border: Color::DarkGray,
            text: Color::White,
            dim: Color::DarkGray,
            highlight_bg: Color::Rgb(25, 40, 60),
            active: Color::Cyan,
            spinner: Color::Cyan,
            error: Color::Red,
            warning: Color::Yellow,
            footer_fg: Color::DarkGray,
            footer_bg: Color::Reset,
        }
    }

    pub fn sentiment_color(&self, sentiment: &Sentiment) -> Color {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
            Sentiment::Other(_) => self.other,
        }
    }

    pub fn line_status_style(&self, status: LineStatus) -> Style {
        match status {
            LineStatus::Pending => Style::default().fg(self.dim),
            LineStatus::Running => Style::default().fg(self.spinner),
            LineStatus::Complete => Style::default().fg(self.positive).add_modifier(Modifier::BOLD),
        }
    }

    pub fn phase_color(&self, phase: SessionPhase) -> Color {
        match phase {
            SessionPhase::Idle | SessionPhase::Canceled => self.dim,
            SessionPhase::Open | SessionPhase::Streaming => self.active,
            SessionPhase::Completed => self.positive,
            SessionPhase::Errored => self.error,
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default().fg(self.header_fg).bg(self.header_bg).add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default().bg(self.highlight_bg).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }
}
