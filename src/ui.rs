//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! The layout is a two-row split: the ranked story list on top and a one-line
//! status bar at the bottom.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_story_list(app, frame, main_area);
    draw_status_bar(app, frame, status_area);
}

/// Render the ranked story list.
fn draw_story_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = app
        .stories
        .iter()
        .enumerate()
        .map(|(rank, story)| {
            let mut spans = vec![
                Span::styled(
                    format!("{:>3}. ", rank + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(&story.item.title, Style::default().fg(Color::White)),
            ];
            if !story.host.is_empty() {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    format!("({})", story.host),
                    Style::default().fg(Color::Cyan),
                ));
            }
            spans.push(Span::styled(
                format!("  {} points by {}", story.item.score, story.item.by),
                Style::default().fg(Color::DarkGray),
            ));

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(list_items)
        .block(
            Block::default()
                .title(" Quiet Hacker News ")
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let rendered = app
        .elapsed
        .map(|d| format!("rendered in {d:.2?}"))
        .unwrap_or_default();

    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} stories", app.stories.len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(rendered, Style::default().fg(Color::DarkGray)),
        Span::raw("  q: quit  r: refresh  ↑/↓: scroll"),
    ]));
    frame.render_widget(status, area);
}
