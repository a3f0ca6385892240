use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState,
};

use newsdash_core::{LineStatus, Sentiment, SessionPhase};

use crate::app::App;
use crate::view::{format_date, spinner_char, truncate};

/// Render the Dashboard screen.
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::vertical([
        Constraint::Length(1),  // header
        Constraint::Length(3),  // search box
        Constraint::Length(10), // progress + sentiment
        Constraint::Min(5),     // articles
        Constraint::Length(1),  // footer
    ])
    .split(area);

    let panels = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);

    render_header(f, chunks[0], app);
    render_search(f, chunks[1], app);
    render_progress(f, panels[0], app);
    render_sentiment(f, panels[1], app);
    render_articles(f, chunks[3], app);
    render_footer(f, chunks[4], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let phase = app.controller.phase();
    let mut spans = vec![
        Span::styled(" NEWSDASH ", theme.header_style()),
        Span::styled(
            " Dashboard ",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(topic) = app.controller.topic() {
        spans.push(Span::styled(format!("· {topic} "), Style::default().fg(theme.dim)));
    }
    let status = if app.controller.loading() {
        format!("{} {}", spinner_char(app.tick), phase.label())
    } else {
        phase.label().to_string()
    };
    spans.push(Span::styled(
        status,
        Style::default().fg(theme.phase_color(phase)),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_search(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let border = if app.editing {
        Style::default().fg(theme.active)
    } else {
        theme.border_style()
    };
    let mut spans = vec![Span::styled(&app.query, Style::default().fg(theme.text))];
    if app.editing {
        spans.push(Span::styled("▏", Style::default().fg(theme.active)));
    } else if app.query.is_empty() {
        spans.push(Span::styled(
            "press / to search a topic",
            Style::default().fg(theme.dim),
        ));
    }
    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Topic "),
    );
    f.render_widget(input, area);
}

fn render_progress(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let loading = app.controller.loading();
    let total = app.controller.log_len();
    let visible = (area.height as usize).saturating_sub(2);
    let width = (area.width as usize).saturating_sub(6);

    // Follow the tail of the log.
    let lines: Vec<Line> = app
        .controller
        .log()
        .enumerate()
        .skip(total.saturating_sub(visible))
        .map(|(i, line)| {
            let is_last = i + 1 == total;
            let marker = if is_last && loading && line.status != LineStatus::Complete {
                spinner_char(app.tick)
            } else {
                '●'
            };
            let style = theme.line_status_style(line.status);
            // Multi-line payloads are shown on one row.
            let text = line.text.replace('\n', " ⏎ ");
            Line::from(vec![
                Span::styled(format!(" {marker} "), style),
                Span::styled(truncate(&text, width), style),
            ])
        })
        .collect();

    let body = if lines.is_empty() {
        Paragraph::new(Line::from(Span::styled(
            " No search yet",
            Style::default().fg(theme.dim),
        )))
    } else {
        Paragraph::new(lines)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(format!(" Progress ({total}) "));
    f.render_widget(body.block(block), area);
}

fn render_sentiment(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let distribution = app.controller.sentiment();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(format!(" Sentiment ({}) ", distribution.total()));

    if distribution.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            " No data",
            Style::default().fg(theme.dim),
        )))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let bars: Vec<Bar> = distribution
        .ordered()
        .into_iter()
        .map(|(label, count)| {
            let color = theme.sentiment_color(&Sentiment::from(label));
            let share = distribution.share(label) * 100.0;
            Bar::default()
                .value(count)
                .label(Line::from(truncate(label, 8)))
                .text_value(format!("{count} ({share:.0}%)"))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(theme.header_fg).bg(color))
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let gaps = bars.len().saturating_sub(1) as u16;
    let bar_width = (inner_width.saturating_sub(gaps) / (bars.len() as u16).max(1)).clamp(3, 12);

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1);
    f.render_widget(chart, area);
}

fn render_articles(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let articles = app.controller.articles();
    let wide = area.width >= 100;

    let header_cells = if wide {
        vec!["#", "Sentiment", "Headline", "Source", "Published"]
    } else {
        vec!["#", "Sentiment", "Headline"]
    };
    let header = Row::new(header_cells.iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
    }))
    .height(1);

    let headline_width = if wide {
        (area.width as usize).saturating_sub(56)
    } else {
        (area.width as usize).saturating_sub(20)
    };

    let rows: Vec<Row> = articles
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let sentiment = Cell::from(article.sentiment.label().to_string())
                .style(Style::default().fg(theme.sentiment_color(&article.sentiment)));
            let headline = Cell::from(truncate(&article.headline, headline_width));
            let mut cells = vec![Cell::from(format!("{}", i + 1)), sentiment, headline];
            if wide {
                cells.push(
                    Cell::from(truncate(&article.source, 18)).style(Style::default().fg(theme.dim)),
                );
                cells.push(
                    Cell::from(format_date(&article.publish_date))
                        .style(Style::default().fg(theme.dim)),
                );
            }
            Row::new(cells)
        })
        .collect();

    let widths = if wide {
        vec![
            Constraint::Length(4),
            Constraint::Length(10),
            Constraint::Min(20),
            Constraint::Length(18),
            Constraint::Length(16),
        ]
    } else {
        vec![
            Constraint::Length(4),
            Constraint::Length(10),
            Constraint::Min(15),
        ]
    };

    let title = if app.controller.phase() == SessionPhase::Completed || !articles.is_empty() {
        format!(" Articles ({}) ", articles.len())
    } else {
        " Articles ".to_string()
    };
    let table = Table::new(rows, &widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(title),
        )
        .row_highlight_style(theme.highlight_style());

    let mut state = TableState::default();
    if !articles.is_empty() {
        state.select(Some(app.article_cursor));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let error = app.controller.error();

    let mut spans = Vec::new();
    if !error.is_empty() {
        spans.push(Span::styled(
            format!(" {error} "),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        ));
    } else if let Some(warning) = app.controller.warning() {
        spans.push(Span::styled(
            format!(" Pipeline warning: {warning} "),
            Style::default().fg(theme.warning),
        ));
    }
    spans.push(Span::styled(hints(app), theme.footer_style()));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn hints(app: &App) -> &'static str {
    if app.editing {
        " | Enter:search  Esc:leave input  Ctrl+u:clear  Ctrl+c:quit"
    } else if app.controller.loading() {
        " | x:cancel  /:new search  ?:help  q:quit"
    } else {
        " | /:search  j/k:nav  Enter:open  ?:help  q:quit"
    }
}
