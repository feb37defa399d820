use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use regex::Regex;

use crate::ops::board::{self, BoardItem, Column};
use crate::tui::app::App;
use crate::tui::swipe::CELL_PX;
use crate::util::unicode;

use super::helpers::{progress_bar, task_count};
use super::push_highlighted_spans;

/// Rows per card including the gap below it
const CARD_H: u16 = 4;
const PLACEHOLDER_ROWS: usize = 3;

/// Render the kanban board in the content area
pub fn render_board(frame: &mut Frame, app: &App, area: Rect) {
    let mut area = area;

    // Failed refresh: banner above whatever we last loaded
    if let Some(err) = app.store.board_error() {
        let banner = Rect { height: 1, ..area };
        let text = unicode::truncate_to_width(
            &format!(" Failed to load: {err}  (r to retry)"),
            area.width as usize,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                text,
                Style::default().fg(app.theme.background).bg(app.theme.red),
            )),
            banner,
        );
        area.y += 1;
        area.height = area.height.saturating_sub(1);
    }

    let loading = app.store.board_loading();
    let filter = app.filter();
    if !loading
        && let Some(empty) = board::empty_state(
            app.board(),
            !app.store.sources.items().is_empty(),
            &filter,
        )
    {
        let y = area.y + area.height / 2;
        let line = Rect {
            y,
            height: 1,
            ..area
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                empty.message(),
                Style::default().fg(app.theme.dim).bg(app.theme.background),
            ))
            .alignment(Alignment::Center),
            line,
        );
        return;
    }

    let re = app.search_regex();
    if app.narrow {
        render_narrow(frame, app, area, loading, re.as_ref());
    } else {
        render_wide(frame, app, area, loading, re.as_ref());
    }
}

fn render_wide(frame: &mut Frame, app: &App, area: Rect, loading: bool, re: Option<&Regex>) {
    let columns = &app.board().columns;
    if columns.is_empty() {
        return;
    }
    let constraints: Vec<Constraint> = columns
        .iter()
        .map(|_| Constraint::Ratio(1, columns.len() as u32))
        .collect();
    let rects = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (i, (column, rect)) in columns.iter().zip(rects.iter()).enumerate() {
        let focused = i == app.focused_column();
        render_column(frame, app, column, i, *rect, focused, loading, re);
    }
}

/// One column at a time; neighbors slide in while the swipe offset is non-zero
fn render_narrow(frame: &mut Frame, app: &App, area: Rect, loading: bool, re: Option<&Regex>) {
    let columns = &app.board().columns;
    if columns.is_empty() || area.height < 2 {
        return;
    }

    // Position dots + label + count
    let index = app.focused_column().min(columns.len() - 1);
    let bg = app.theme.background;
    let mut spans: Vec<Span> = vec![Span::styled(" ", Style::default().bg(bg))];
    for i in 0..columns.len() {
        let (dot, color) = if i == index {
            ("\u{25CF} ", app.theme.highlight)
        } else {
            ("\u{25CB} ", app.theme.dim)
        };
        spans.push(Span::styled(dot, Style::default().fg(color).bg(bg)));
    }
    let current = &columns[index];
    spans.push(Span::styled(
        format!(" {} ({})", current.kind.label(), current.items.len()),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ));
    let dots = Rect { height: 1, ..area };
    frame.render_widget(Paragraph::new(Line::from(spans)), dots);

    let body = Rect {
        y: area.y + 1,
        height: area.height - 1,
        ..area
    };
    let w = body.width as i32;
    let offset = (app.swipe.offset() / CELL_PX).round() as i32;
    for (i, column) in columns.iter().enumerate() {
        let x0 = (i as i32 - index as i32) * w + offset;
        let left = x0.max(0);
        let right = (x0 + w).min(w);
        if right <= left {
            continue;
        }
        let rect = Rect {
            x: body.x + left as u16,
            width: (right - left) as u16,
            ..body
        };
        render_column(frame, app, column, i, rect, i == index, loading, re);
    }
}

#[allow(clippy::too_many_arguments)]
fn render_column(
    frame: &mut Frame,
    app: &App,
    column: &Column,
    col_index: usize,
    area: Rect,
    focused: bool,
    loading: bool,
    re: Option<&Regex>,
) {
    let bg = app.theme.background;
    let title_style = if focused {
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(bg)
    };
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .title(Span::styled(
            format!(" {} {} ", column.kind.label(), column.items.len()),
            title_style,
        ))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let inner = Rect {
        y: inner.y + 1,
        height: inner.height.saturating_sub(1),
        ..inner
    };
    let width = inner.width as usize;

    if loading && column.items.is_empty() {
        let lines: Vec<Line> = (0..PLACEHOLDER_ROWS)
            .flat_map(|_| {
                [
                    Line::from(Span::styled(
                        "\u{2591}".repeat(width.saturating_sub(2)),
                        Style::default().fg(app.theme.dim).bg(bg),
                    )),
                    Line::from(""),
                ]
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
        return;
    }

    let cursor = app.card_cursor.get(col_index).copied().unwrap_or(0);
    let visible = (inner.height / CARD_H).max(1) as usize;
    let first = cursor.saturating_sub(visible - 1);

    let mut lines: Vec<Line> = Vec::new();
    for (i, item) in column.items.iter().enumerate().skip(first).take(visible) {
        let selected = focused && i == cursor;
        lines.extend(card_lines(app, item, width, selected, re));
        lines.push(Line::from(""));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Three rows: title, progress or the idea's description, then badges
fn card_lines(
    app: &App,
    item: &BoardItem,
    width: usize,
    selected: bool,
    re: Option<&Regex>,
) -> Vec<Line<'static>> {
    let bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let marker = if selected { "\u{258E}" } else { " " };
    let marker_style = Style::default().fg(app.theme.selection_border).bg(bg);
    let base = Style::default().fg(app.theme.text_bright).bg(bg);
    let hl = Style::default()
        .fg(app.theme.search_match_fg)
        .bg(app.theme.search_match_bg);
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let title = unicode::truncate_to_width(item.title(), width.saturating_sub(2));
    let mut first: Vec<Span<'static>> = vec![Span::styled(marker, marker_style)];
    push_highlighted_spans(&mut first, &title, base, hl, re);

    let mut second: Vec<Span<'static>> = vec![Span::styled(marker, marker_style)];
    let mut third: Vec<Span<'static>> = vec![Span::styled(marker, marker_style)];
    let badge_w = width.saturating_sub(2);
    match item {
        BoardItem::Change(change) => {
            match change.task_stats {
                Some(stats) if stats.total > 0 => {
                    let count = task_count(&stats);
                    let bar_w = width.saturating_sub(count.len() + 4).min(12);
                    second.push(Span::styled(
                        progress_bar(&stats, bar_w),
                        Style::default()
                            .fg(app.theme.status_color(change.status))
                            .bg(bg),
                    ));
                    second.push(Span::styled(format!(" {count}"), dim));
                }
                _ => second.push(Span::styled("no tasks", dim)),
            }
            if change.ready_for_review {
                second.push(Span::styled(
                    " review",
                    Style::default().fg(app.theme.green).bg(bg),
                ));
            }

            let source = unicode::truncate_to_width(&change.source_id, badge_w);
            let rest = badge_w.saturating_sub(unicode::display_width(&source));
            third.push(Span::styled(
                source,
                Style::default().fg(app.theme.highlight).bg(bg),
            ));
            let artifacts = change.artifacts();
            if !artifacts.is_empty() && rest > 1 {
                let text = format!(" {}", artifacts.join(" "));
                third.push(Span::styled(
                    unicode::truncate_to_width(&text, rest),
                    Style::default().fg(app.theme.text).bg(bg),
                ));
            }
        }
        BoardItem::Idea(idea) => {
            let desc = idea.description.lines().next().unwrap_or("");
            let desc = unicode::truncate_to_width(desc, badge_w);
            push_highlighted_spans(&mut second, &desc, dim, hl, re);
            if let Some(project) = &idea.project_id {
                third.push(Span::styled(
                    unicode::truncate_to_width(project, badge_w),
                    Style::default().fg(app.theme.highlight).bg(bg),
                ));
            }
        }
    }

    vec![Line::from(first), Line::from(second), Line::from(third)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::model::ChangeStatus;
    use crate::sync::{ResourceKind, SyncEvent};
    use crate::tui::render::test_helpers::*;

    fn draw(app: &App, w: u16) -> String {
        render_to_string(w, 20, |frame, area| render_board(frame, app, area))
    }

    #[test]
    fn wide_board_shows_every_column() {
        let app = app_with_board();
        let output = draw(&app, TERM_W);
        for label in ["Ideas", "Todo", "In Progress", "Done"] {
            assert!(output.contains(label), "missing {label}:\n{output}");
        }
        assert!(output.contains("Dark mode"));
        assert!(output.contains("fix-cache"));
        assert!(output.contains("1/4"));
        assert!(output.contains("proj-a proposal"));
        assert!(!output.contains("design"));
        assert!(!output.contains("Archived"));
    }

    #[test]
    fn card_badges_list_present_artifacts() {
        let mut app = app_with_board();
        let mut full = change("full-set", ChangeStatus::Todo);
        full.has_specs = true;
        full.has_design = true;
        let mut bare = change("bare", ChangeStatus::InProgress);
        bare.source_id = "proj-b".into();
        bare.has_proposal = false;
        let t = app.store.begin(ResourceKind::Changes);
        app.apply_sync(SyncEvent::Changes(t, Ok(vec![full, bare])));
        app.refresh_board();

        let output = render_to_string(160, 20, |frame, area| render_board(frame, &app, area));
        assert!(output.contains("proj-a proposal specs design"));
        assert!(output.contains("proj-b"));
        assert!(!output.contains("proj-b proposal"));
    }

    #[test]
    fn narrow_board_shows_one_column_with_dots() {
        let mut app = app_with_board();
        app.narrow = true;
        app.swipe.jump_to(2);
        let output = draw(&app, 40);
        assert!(output.contains("\u{25CB} \u{25CB} \u{25CF} \u{25CB}"));
        assert!(output.contains("In Progress (1)"));
        assert!(output.contains("fix-cache"));
        assert!(!output.contains("add-auth"));
    }

    #[test]
    fn first_load_shows_placeholders() {
        let mut app = empty_app();
        app.store.begin(ResourceKind::Changes);
        app.store.begin(ResourceKind::Ideas);
        app.refresh_board();
        let output = draw(&app, TERM_W);
        assert!(output.contains("\u{2591}\u{2591}\u{2591}"));
        assert!(!output.contains("No changes found"));
    }

    #[test]
    fn empty_state_when_nothing_matches() {
        let mut app = app_with_board();
        app.search = crate::tui::text::TextInput::with_text("zzz");
        app.refresh_board();
        let output = draw(&app, TERM_W);
        assert!(output.contains("No changes found matching your search"));
    }

    #[test]
    fn no_sources_message() {
        let mut app = empty_app();
        app.refresh_board();
        let output = draw(&app, TERM_W);
        assert!(output.contains("No OpenSpec sources configured"));
    }

    #[test]
    fn error_banner_keeps_last_good_board() {
        let mut app = app_with_board();
        let t = app.store.begin(ResourceKind::Changes);
        app.apply_sync(SyncEvent::Changes(
            t,
            Err(ApiError::Http {
                status: 502,
                body: "bad gateway".into(),
            }),
        ));
        app.refresh_board();
        let output = draw(&app, TERM_W);
        assert!(output.lines().next().unwrap_or_default().contains("Failed to load"));
        assert!(output.contains("add-auth"));
    }

    #[test]
    fn archived_column_when_enabled() {
        let mut app = app_with_board();
        app.toggle_archived();
        let t = app.store.begin(ResourceKind::Changes);
        app.apply_sync(SyncEvent::Changes(
            t,
            Ok(vec![change("old", ChangeStatus::Archived)]),
        ));
        app.refresh_board();
        let output = draw(&app, TERM_W);
        assert!(output.contains("Archived"));
        assert!(output.contains("old"));
    }
}
