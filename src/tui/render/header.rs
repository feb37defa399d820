use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::prefs::ViewKind;
use crate::tui::app::App;

use super::helpers::spans_width;

/// Render the header: view tabs and filter state, with a separator line below
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let width = chunks[0].width as usize;

    let mut left: Vec<Span> = vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled("\u{25B6}", Style::default().fg(app.theme.purple).bg(bg)),
        Span::styled(" ", Style::default().bg(bg)),
    ];
    for view in [ViewKind::Kanban, ViewKind::Specs] {
        let label = match view {
            ViewKind::Kanban => " Board ",
            ViewKind::Specs => " Specs ",
        };
        left.push(Span::styled(label, tab_style(app, app.view() == view)));
        left.push(Span::styled("\u{2502}", dim));
    }

    let right = indicators(app);
    let used = spans_width(&left) + spans_width(&right);
    if used < width {
        left.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
        left.extend(right);
    }

    frame.render_widget(
        Paragraph::new(Line::from(left)).style(Style::default().bg(bg)),
        chunks[0],
    );

    let separator = "\u{2500}".repeat(chunks[1].width as usize);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(separator, dim))),
        chunks[1],
    );
}

/// Source filter, archived flag, sort order and the live indicator
fn indicators(app: &App) -> Vec<Span<'static>> {
    let bg = app.theme.background;
    let label = Style::default().fg(app.theme.dim).bg(bg);
    let value = Style::default().fg(app.theme.text).bg(bg);

    let source = match app.settings.selected_source() {
        Some(id) => app
            .store
            .sources
            .items()
            .iter()
            .find(|s| s.id == id)
            .map_or_else(|| id.to_string(), |s| s.name.clone()),
        None => "All projects".to_string(),
    };

    let mut spans = vec![
        Span::styled("project ", label),
        Span::styled(source, value),
    ];
    if app.view() == ViewKind::Kanban {
        spans.push(Span::styled("  sort ", label));
        spans.push(Span::styled(app.sort.label(), value));
        if app.settings.show_archived() {
            spans.push(Span::styled(
                "  +archived",
                Style::default().fg(app.theme.yellow).bg(bg),
            ));
        }
    }

    let status = app.store.live.status();
    spans.push(Span::styled("  ", label));
    spans.push(Span::styled(
        "\u{25CF} ",
        Style::default().fg(app.theme.connection_color(status)).bg(bg),
    ));
    spans.push(Span::styled(status.label(), value));
    spans.push(Span::styled(" ", label));
    spans
}

fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(app.theme.background)
    }
}
