use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::helpers::{centered_rect_fixed, wrap_text};

/// Blocking error alert
pub fn render_alert(frame: &mut Frame, app: &App, message: &str, area: Rect) {
    render_box(frame, app, " Error ", message, "enter dismiss", true, area);
}

/// Yes/no confirmation
pub fn render_confirm(
    frame: &mut Frame,
    app: &App,
    title: &str,
    message: &str,
    hint: &str,
    area: Rect,
) {
    render_box(frame, app, &format!(" {title} "), message, hint, false, area);
}

fn render_box(
    frame: &mut Frame,
    app: &App,
    title: &str,
    message: &str,
    hint: &str,
    error: bool,
    area: Rect,
) {
    let popup_w: u16 = 52.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(4) as usize;

    let bg = app.theme.background;
    let accent = if error { app.theme.red } else { app.theme.highlight };
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);

    let mut lines: Vec<Line> = vec![Line::from("")];
    for l in wrap_text(message, inner_w) {
        lines.push(Line::from(Span::styled(format!(" {l}"), text_style)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" {hint}"),
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    // Content + borders
    let popup_h = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent).bg(bg))
        .title(Span::styled(
            title.to_string(),
            Style::default()
                .fg(accent)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));

    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn alert_wraps_long_messages() {
        let app = empty_app();
        let msg = "Failed to save sources: server returned 500 because the disk is full";
        let output = render_to_string(60, 12, |frame, area| {
            render_alert(frame, &app, msg, area);
        });
        assert!(output.contains("Error"));
        assert!(output.contains("Failed to save sources"));
        assert!(output.contains("disk is full"));
        assert!(output.contains("enter dismiss"));
    }

    #[test]
    fn confirm_shows_hint() {
        let app = empty_app();
        let output = render_to_string(60, 12, |frame, area| {
            render_confirm(frame, &app, "Delete idea", "Delete it?", "y delete  n cancel", area);
        });
        assert!(output.contains("Delete idea"));
        assert!(output.contains("y delete  n cancel"));
    }
}
