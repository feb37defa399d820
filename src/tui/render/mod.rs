pub mod board_view;
pub mod detail_view;
pub mod header;
pub mod help_overlay;
pub mod helpers;
pub mod idea_form;
pub mod popup;
pub mod settings_view;
pub mod specs_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use regex::Regex;

use super::app::{App, Overlay};
use super::swipe::CELL_PX;
use crate::io::prefs::ViewKind;

/// Draw one frame: header, active view, status row, then overlays
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Layout decisions feed back into input handling for the next event
    app.narrow = area.width < app.narrow_width;
    if !app.narrow {
        app.swipe.cancel();
    }
    app.swipe.set_width(area.width as f32 * CELL_PX);
    app.refresh_board();
    let app: &App = app;

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);

    match app.view() {
        ViewKind::Kanban => board_view::render_board(frame, app, chunks[1]),
        ViewKind::Specs => specs_view::render_specs(frame, app, chunks[1]),
    }

    status_row::render_status_row(frame, app, chunks[2]);

    match &app.overlay {
        None => {}
        Some(Overlay::Help) => help_overlay::render_help_overlay(frame, app, area),
        Some(Overlay::ChangeDetail { scroll }) => {
            detail_view::render_change_detail(frame, app, *scroll, area)
        }
        Some(Overlay::IdeaDetail { id }) => detail_view::render_idea_detail(frame, app, id, area),
        Some(Overlay::IdeaForm(form)) => idea_form::render_idea_form(frame, app, form, area),
        Some(Overlay::Settings(panel)) => {
            settings_view::render_settings(frame, app, panel, area)
        }
        Some(Overlay::ConfirmDelete { title, .. }) => {
            popup::render_confirm(
                frame,
                app,
                "Delete idea",
                &format!("Delete \u{201c}{}\u{201d}? This cannot be undone.", title),
                "y delete  n cancel",
                area,
            );
        }
    }

    // Alerts sit on top of everything
    if let Some(message) = &app.alert {
        popup::render_alert(frame, app, message, area);
    }
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let Some(re) = search_re else {
        spans.push(Span::styled(text.to_string(), base_style));
        return;
    };

    let mut last_end = 0;
    for m in re.find_iter(text) {
        if m.is_empty() {
            continue;
        }
        if m.start() > last_end {
            spans.push(Span::styled(
                text[last_end..m.start()].to_string(),
                base_style,
            ));
        }
        spans.push(Span::styled(
            text[m.start()..m.end()].to_string(),
            highlight_style,
        ));
        last_end = m.end();
    }
    if last_end < text.len() || text.is_empty() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}
