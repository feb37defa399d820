use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::prefs::ViewKind;
use crate::tui::app::{App, Mode};

use super::helpers::spans_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let (mut spans, hint): (Vec<Span>, String) = match app.mode {
        Mode::Search => (
            vec![
                Span::styled(
                    format!("/{}", app.search.text()),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
            ],
            "Enter keep  Esc clear".to_string(),
        ),
        Mode::Form => (Vec::new(), String::new()),
        Mode::Navigate => {
            let mut spans = Vec::new();
            if let Some(status) = &app.status {
                spans.push(Span::styled(
                    status.clone(),
                    Style::default().fg(app.theme.yellow).bg(bg),
                ));
            } else if !app.search.is_empty() {
                spans.push(Span::styled(format!("/{}", app.search.text()), dim));
            }
            (spans, counts(app))
        }
    };

    let content_width = spans_width(&spans);
    let hint_width = hint.chars().count();
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, dim));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn counts(app: &App) -> String {
    match app.view() {
        ViewKind::Kanban => {
            let board = app.board();
            format!(
                "{} changes \u{00B7} {} ideas  ? help ",
                board.change_count, board.idea_count
            )
        }
        ViewKind::Specs => format!("{} specs  ? help ", app.visible_specs().len()),
    }
}
