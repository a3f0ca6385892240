use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::App;
use crate::theme::Theme;
use crate::view::{format_date, truncate};

/// Render the Article detail screen.
pub fn render(f: &mut Frame, app: &App, index: usize) {
    let theme = &app.theme;
    let area = f.area();
    let Some(article) = app.controller.articles().get(index) else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1), // breadcrumb
        Constraint::Min(5),    // scrollable content
        Constraint::Length(1), // footer
    ])
    .split(area);

    // --- Breadcrumb ---
    let topic = app.controller.topic().unwrap_or_default();
    let breadcrumb = Line::from(vec![
        Span::styled(" NEWSDASH ", theme.header_style()),
        Span::styled(" > ", Style::default().fg(theme.dim)),
        Span::styled(
            topic,
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" > ", Style::default().fg(theme.dim)),
        Span::styled(
            format!("#{} {}", index + 1, truncate(&article.headline, 50)),
            Style::default().fg(theme.text),
        ),
    ]);
    f.render_widget(Paragraph::new(breadcrumb), chunks[0]);

    // --- Content ---
    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        article.headline.as_str(),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    let color = theme.sentiment_color(&article.sentiment);
    lines.push(Line::from(vec![
        Span::styled(format!("  {:<12}", "Sentiment"), Style::default().fg(theme.dim)),
        Span::styled(
            format!(" {} ", article.sentiment),
            Style::default().fg(theme.header_fg).bg(color).add_modifier(Modifier::BOLD),
        ),
    ]));
    labeled_line(&mut lines, "Source", &article.source, theme);
    labeled_line(&mut lines, "Published", &format_date(&article.publish_date), theme);
    labeled_line(&mut lines, "URL", &article.url, theme);
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        "SUMMARY",
        Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
    )));
    if article.summary.is_empty() {
        lines.push(Line::from(Span::styled(
            "(no summary)",
            Style::default().fg(theme.dim),
        )));
    } else {
        for paragraph in article.summary.lines() {
            lines.push(Line::from(Span::styled(paragraph, Style::default().fg(theme.text))));
        }
    }

    let max_scroll = (lines.len() as u16).saturating_sub(1);
    let content = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style()),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll.min(max_scroll), 0));
    f.render_widget(content, chunks[1]);

    let footer = Line::from(Span::styled(
        " j/k:scroll  Esc:back  ?:help  q:quit",
        theme.footer_style(),
    ));
    f.render_widget(Paragraph::new(footer), chunks[2]);
}

fn labeled_line(lines: &mut Vec<Line>, label: &str, value: &str, theme: &Theme) {
    let value = if value.is_empty() { "—" } else { value };
    lines.push(Line::from(vec![
        Span::styled(format!("  {label:<12}"), Style::default().fg(theme.dim)),
        Span::styled(format!(" {value}"), Style::default().fg(theme.text)),
    ]));
}
