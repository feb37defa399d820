use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, DraftField, SettingsPanel};
use crate::util::unicode;

use super::help_overlay::centered_rect;

/// Settings overlay: the server's source list
pub fn render_settings(frame: &mut Frame, app: &App, panel: &SettingsPanel, area: Rect) {
    let overlay_area = centered_rect(70, 70, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let header = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let hint = if panel.draft.is_some() {
        " tab switch field  enter add  esc cancel "
    } else if app.sources_editable() {
        " a add  d remove  esc close "
    } else {
        " esc close "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .title(Span::styled(" Settings ", header))
        .title_bottom(Span::styled(hint, dim))
        .style(Style::default().bg(bg));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let width = inner.width as usize;
    let config = &app.store.config;
    let mut lines: Vec<Line> = vec![Line::from(Span::styled(" Sources", header))];

    let sources = app.settings_sources();
    if let Some(err) = config.error() {
        lines.push(Line::from(Span::styled(
            format!(" Failed to load config: {err}"),
            Style::default().fg(app.theme.red).bg(bg),
        )));
    }
    if config.loading() {
        lines.push(Line::from(Span::styled(" Loading\u{2026}", dim)));
    } else if sources.is_empty() && config.error().is_none() {
        lines.push(Line::from(Span::styled(" No sources configured", dim)));
    }

    let name_w = sources
        .iter()
        .map(|s| unicode::display_width(&s.name))
        .max()
        .unwrap_or(0)
        .min(width / 3);
    for (i, source) in sources.iter().enumerate() {
        let selected = i == panel.cursor && panel.draft.is_none();
        let row_bg = if selected { app.theme.selection_bg } else { bg };
        let text = format!(
            "  {}  {}",
            unicode::fit_to_width(&source.name, name_w),
            source.path
        );
        lines.push(Line::from(Span::styled(
            unicode::fit_to_width(&text, width),
            Style::default().fg(app.theme.text).bg(row_bg),
        )));
    }

    if panel.saving() {
        lines.push(Line::from(Span::styled(" Saving\u{2026}", dim)));
    }
    if let Some(err) = &panel.error {
        lines.push(Line::from(Span::styled(
            format!(" {err}"),
            Style::default().fg(app.theme.red).bg(bg),
        )));
    }

    let mut cursor = None;
    if let Some(draft) = &panel.draft {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(" Add source", header)));
        for (field, label, input) in [
            (DraftField::Name, "Name", &draft.name),
            (DraftField::Path, "Path", &draft.path),
        ] {
            let focused = draft.field == field;
            let style = if focused {
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(app.theme.selection_bg)
            } else {
                Style::default().fg(app.theme.text).bg(bg)
            };
            if focused {
                cursor = Some((lines.len() as u16, input.cursor_col()));
            }
            lines.push(Line::from(vec![
                Span::styled(format!("  {label:<6}"), dim),
                Span::styled(
                    unicode::fit_to_width(input.text(), width.saturating_sub(9)),
                    style,
                ),
            ]));
        }
    }

    frame.render_widget(Paragraph::new(lines), inner);

    if let Some((row, col)) = cursor
        && row < inner.height
    {
        frame.set_cursor_position(Position::new(inner.x + 8 + col as u16, inner.y + row));
    }
}
