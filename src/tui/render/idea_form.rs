use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, FormField, IdeaForm};
use crate::tui::text::TextInput;
use crate::util::unicode;

use super::helpers::centered_rect_fixed;

const LABEL_W: usize = 13;

/// Idea capture / edit form
pub fn render_idea_form(frame: &mut Frame, app: &App, form: &IdeaForm, area: Rect) {
    let popup_w: u16 = 64.min(area.width.saturating_sub(2));
    let overlay_area = centered_rect_fixed(popup_w, 11, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let title = if form.editing.is_some() {
        " Edit idea "
    } else {
        " New idea "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let field_w = (inner.width as usize).saturating_sub(LABEL_W + 1);
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let mut lines: Vec<Line> = vec![Line::from("")];
    lines.push(text_row(app, "Title", &form.title, form.field == FormField::Title, field_w));
    lines.push(text_row(
        app,
        "Description",
        &form.description,
        form.field == FormField::Description,
        field_w,
    ));

    let project = form.project.as_deref().unwrap_or("None");
    let project_text = if form.editing.is_some() {
        project.to_string()
    } else {
        format!("\u{2039} {project} \u{203A}")
    };
    lines.push(Line::from(vec![
        label(app, "Project", form.field == FormField::Project),
        Span::styled(project_text, Style::default().fg(app.theme.text).bg(bg)),
    ]));
    lines.push(Line::from(""));

    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            format!(" {err}"),
            Style::default().fg(app.theme.red).bg(bg),
        )));
    } else if form.submitting {
        lines.push(Line::from(Span::styled(" Saving\u{2026}", dim)));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " tab next field  enter save  esc cancel",
        dim,
    )));

    frame.render_widget(Paragraph::new(lines), inner);

    // Terminal cursor in the focused text field
    let row = match form.field {
        FormField::Title => Some(1),
        FormField::Description => Some(2),
        FormField::Project => None,
    };
    let input = match form.field {
        FormField::Title => Some(&form.title),
        FormField::Description => Some(&form.description),
        FormField::Project => None,
    };
    if let (Some(row), Some(input)) = (row, input) {
        let col = visible_cursor(input, field_w);
        frame.set_cursor_position(Position::new(
            inner.x + (LABEL_W + 1 + col) as u16,
            inner.y + row,
        ));
    }
}

fn label(app: &App, text: &str, focused: bool) -> Span<'static> {
    let style = if focused {
        Style::default()
            .fg(app.theme.highlight)
            .bg(app.theme.background)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(app.theme.background)
    };
    Span::styled(format!(" {:<width$}", text, width = LABEL_W), style)
}

/// Single-line view of a field; newlines show as `⏎`
fn text_row(app: &App, name: &str, input: &TextInput, focused: bool, width: usize) -> Line<'static> {
    let bg = if focused {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let flat = input.text().replace('\n', "\u{23CE}");
    let skip = scroll_start(input, width);
    let shown: String = flat.chars().skip(skip).collect();
    Line::from(vec![
        label(app, name, focused),
        Span::styled(
            unicode::fit_to_width(&shown, width),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
    ])
}

/// Characters hidden on the left so the cursor stays in view
fn scroll_start(input: &TextInput, width: usize) -> usize {
    let before = input.text()[..input.cursor()].chars().count();
    before.saturating_sub(width.saturating_sub(1))
}

fn visible_cursor(input: &TextInput, width: usize) -> usize {
    let skip = scroll_start(input, width);
    let before: String = input.text()[..input.cursor()].chars().skip(skip).collect();
    unicode::display_width(&before.replace('\n', "\u{23CE}"))
}
