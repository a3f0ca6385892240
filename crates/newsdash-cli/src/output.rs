//! Plain-text rendering of progress lines and reports.

use std::fmt::Write;

use owo_colors::OwoColorize;

use newsdash_core::{Article, LineStatus, ProgressLine, Sentiment, SentimentDistribution};

const BAR_WIDTH: usize = 30;

/// Applies colors only when enabled.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn line(&self, line: &ProgressLine) -> String {
        let marker = match line.status {
            LineStatus::Pending => "·",
            LineStatus::Running => "›",
            LineStatus::Complete => "✔",
        };
        let text = format!("{marker} {}", line.text);
        if !self.color {
            return text;
        }
        match line.status {
            LineStatus::Pending => text.dimmed().to_string(),
            LineStatus::Running => text.cyan().to_string(),
            LineStatus::Complete => text.green().bold().to_string(),
        }
    }

    pub fn sentiment(&self, sentiment: &Sentiment, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        match sentiment {
            Sentiment::Positive => text.green().to_string(),
            Sentiment::Neutral => text.white().to_string(),
            Sentiment::Negative => text.red().to_string(),
            Sentiment::Other(_) => text.magenta().to_string(),
        }
    }

    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn error(&self, text: &str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn warning(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Distribution as horizontal bars, known labels first.
pub fn render_distribution(distribution: &SentimentDistribution, painter: &Painter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", painter.heading("Sentiment"));
    if distribution.is_empty() {
        let _ = writeln!(out, "  {}", painter.dim("(none)"));
        return out;
    }

    let label_width = distribution
        .ordered()
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    for (label, count) in distribution.ordered() {
        let share = distribution.share(label);
        let filled = (share * BAR_WIDTH as f64).round() as usize;
        let bar = "█".repeat(filled);
        let sentiment = Sentiment::from(label);
        let _ = writeln!(
            out,
            "  {:<label_width$}  {} {count} ({:.0}%)",
            label,
            painter.sentiment(&sentiment, &bar),
            share * 100.0,
        );
    }
    out
}

/// Numbered article list with source, date, link and summary.
pub fn render_articles(articles: &[Article], painter: &Painter) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        painter.heading(&format!("Articles ({})", articles.len()))
    );
    for (i, article) in articles.iter().enumerate() {
        let badge = format!("[{}]", article.sentiment);
        let _ = writeln!(
            out,
            "{:>3}. {} {}",
            i + 1,
            painter.sentiment(&article.sentiment, &badge),
            painter.heading(&article.headline)
        );
        let meta: Vec<&str> = [article.source.as_str(), article.publish_date.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        if !meta.is_empty() {
            let _ = writeln!(out, "     {}", painter.dim(&meta.join(" · ")));
        }
        if !article.url.is_empty() {
            let _ = writeln!(out, "     {}", article.url);
        }
        if !article.summary.is_empty() {
            let _ = writeln!(out, "     {}", article.summary.replace('\n', "\n     "));
        }
    }
    out
}
