use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ops::specs;
use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::wrap_text;

const SIDEBAR_W: u16 = 32;

/// Spec browser: grouped sidebar and the selected spec's content
pub fn render_specs(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let source = app.settings.selected_source();
    let groups = specs::group_specs(app.store.specs.items(), source);

    if groups.is_empty() {
        let message = if app.store.specs.loading() && !app.store.specs.loaded() {
            "Loading specs\u{2026}"
        } else {
            specs::empty_message(source)
        };
        let line = Rect {
            y: area.y + area.height / 2,
            height: 1,
            ..area
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(app.theme.dim).bg(bg)))
                .alignment(Alignment::Center),
            line,
        );
        return;
    }

    let sidebar_w = SIDEBAR_W.min(area.width / 2);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_w), Constraint::Min(1)])
        .split(area);

    // Sidebar
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(chunks[0]);
    frame.render_widget(block, chunks[0]);

    let width = inner.width as usize;
    let header_style = Style::default()
        .fg(app.theme.purple)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0;
    let mut index = 0;
    for (source_id, group) in &groups {
        let name = app
            .store
            .sources
            .items()
            .iter()
            .find(|s| s.id == *source_id)
            .map_or(*source_id, |s| s.name.as_str());
        lines.push(Line::from(Span::styled(
            unicode::truncate_to_width(&format!(" {name}"), width),
            header_style,
        )));
        for spec in group {
            let selected = index == app.spec_cursor;
            if selected {
                selected_line = lines.len();
            }
            let style = if selected {
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(app.theme.selection_bg)
            } else {
                Style::default().fg(app.theme.text).bg(bg)
            };
            lines.push(Line::from(Span::styled(
                unicode::fit_to_width(&format!("   {}", specs::spec_title(spec)), width),
                style,
            )));
            index += 1;
        }
    }
    let scroll = (selected_line as u16).saturating_sub(inner.height.saturating_sub(1));
    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);

    render_content(frame, app, chunks[1]);
}

fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let area = Rect {
        x: area.x + 1,
        width: area.width.saturating_sub(2),
        ..area
    };
    let detail = &app.store.spec_detail;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let lines: Vec<Line> = if let Some(err) = detail.error() {
        vec![Line::from(Span::styled(
            format!("Failed to load spec: {err}"),
            Style::default().fg(app.theme.red).bg(bg),
        ))]
    } else if let Some(spec) = detail.item() {
        let mut lines = vec![
            Line::from(Span::styled(
                spec.path.clone(),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        lines.extend(
            wrap_text(&spec.content, area.width as usize)
                .into_iter()
                .map(|l| Line::from(Span::styled(l, Style::default().fg(app.theme.text).bg(bg)))),
        );
        lines
    } else if detail.loading() {
        vec![Line::from(Span::styled("Loading\u{2026}", dim))]
    } else {
        vec![Line::from(Span::styled("Select a spec", dim))]
    };

    frame.render_widget(Paragraph::new(lines), area);
}
