use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::tui::keys::Action;

/// Actions listed in the help overlay, grouped
const SECTIONS: &[(&str, &[Action])] = &[
    (
        "Board",
        &[
            Action::PrevColumn,
            Action::NextColumn,
            Action::FocusLeft,
            Action::FocusRight,
            Action::FocusUp,
            Action::FocusDown,
            Action::Open,
        ],
    ),
    (
        "Filters",
        &[
            Action::Search,
            Action::Close,
            Action::CycleSort,
            Action::ToggleArchived,
            Action::CycleSource,
        ],
    ),
    (
        "Global",
        &[
            Action::ToggleView,
            Action::NewIdea,
            Action::Settings,
            Action::Refresh,
            Action::Help,
            Action::Quit,
        ],
    ),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(" Key Bindings", header_style)),
        Line::from(""),
    ];

    for (title, actions) in SECTIONS {
        lines.push(Line::from(Span::styled(format!(" {title}"), header_style)));
        for action in *actions {
            let combos = app.shortcuts.combos_for(*action);
            if combos.is_empty() {
                continue;
            }
            let keys = format!(" {}", combos.join("/"));
            add_binding(&mut lines, keys, action.description(), key_style, desc_style);
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(" Detail & forms", header_style)));
    add_binding(&mut lines, " e / d".into(), "Edit / delete idea", key_style, desc_style);
    add_binding(&mut lines, " tab".into(), "Next form field", key_style, desc_style);
    add_binding(&mut lines, " a / d".into(), "Add / remove source (settings)", key_style, desc_style);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .title(Span::styled(" Help ", header_style))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: String,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

/// Create a centered rectangle of the given percentage of the parent
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
