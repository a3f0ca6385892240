use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use newsdash_core::{LineStatus, Sentiment};

use crate::theme::Theme;
use crate::view::popup_area;

/// Key bindings by the mode they apply in.
const BINDINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "Search box",
        &[
            ("/ or i", "edit the topic"),
            ("Enter", "start the search"),
            ("Ctrl+u", "clear the topic"),
            ("Esc", "leave the search box"),
        ],
    ),
    (
        "Dashboard",
        &[
            ("x", "cancel the running search"),
            ("j k ↑ ↓", "select an article"),
            ("PgUp PgDn", "move a page (also Ctrl+u / Ctrl+d)"),
            ("g G", "first / last article (also Home / End)"),
            ("Enter", "open the selected article"),
        ],
    ),
    (
        "Article",
        &[("j k", "scroll the summary"), ("Esc", "back to the dashboard")],
    ),
    (
        "Anywhere",
        &[("?", "toggle this help"), ("q", "quit"), ("Ctrl+c", "force quit")],
    ),
];

const KEY_WIDTH: usize = 12;

/// Render the help overlay: key bindings, then what the colors mean.
pub fn render(f: &mut Frame, theme: &Theme) {
    let lines = help_lines(theme);
    // Borders plus one spare row.
    let height = lines.len() as u16 + 3;
    let popup = popup_area(f.area(), 64, height);

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.active))
            .title(" Help · ? to close "),
    );
    f.render_widget(Clear, popup);
    f.render_widget(help, popup);
}

fn help_lines(theme: &Theme) -> Vec<Line<'static>> {
    let heading = Style::default()
        .fg(theme.active)
        .add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();

    for (mode, keys) in BINDINGS {
        lines.push(Line::styled(format!(" {mode}"), heading));
        lines.extend(keys.iter().map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("   {key:<KEY_WIDTH$}"), Style::default().fg(theme.text)),
                Span::styled(*action, Style::default().fg(theme.dim)),
            ])
        }));
    }

    lines.push(Line::styled(" Progress", heading));
    lines.push(Line::from(
        [LineStatus::Pending, LineStatus::Running, LineStatus::Complete]
            .into_iter()
            .flat_map(|status| {
                [
                    Span::raw("   "),
                    Span::styled(format!("● {}", status.label()), theme.line_status_style(status)),
                ]
            })
            .collect::<Vec<_>>(),
    ));

    lines.push(Line::styled(" Sentiment", heading));
    lines.push(Line::from(
        [
            Sentiment::Positive,
            Sentiment::Neutral,
            Sentiment::Negative,
            Sentiment::Other("other".into()),
        ]
        .into_iter()
        .flat_map(|sentiment| {
            let color = theme.sentiment_color(&sentiment);
            [
                Span::raw("   "),
                Span::styled(format!("■ {sentiment}"), Style::default().fg(color)),
            ]
        })
        .collect::<Vec<_>>(),
    ));

    lines
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn rendered(width: u16, height: u16) -> String {
        let theme = Theme::newsroom();
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, &theme)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn lists_every_binding_and_the_legend() {
        let text = rendered(100, 40);
        for (mode, keys) in BINDINGS {
            assert!(text.contains(mode), "missing section {mode}");
            for (_, action) in *keys {
                assert!(text.contains(action), "missing binding {action}");
            }
        }
        assert!(text.contains("● running"));
        assert!(text.contains("■ Negative"));
    }

    #[test]
    fn popup_fits_a_small_terminal() {
        let text = rendered(40, 12);
        assert!(text.contains("Help"));
        assert!(text.contains("Search box"));
    }
}
