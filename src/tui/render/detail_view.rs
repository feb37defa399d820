use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::ChangeDetail;
use crate::tui::app::App;
use crate::util::time::relative_time;

use super::help_overlay::centered_rect;
use super::helpers::{progress_bar, task_count, wrap_text};

/// Change detail overlay: proposal, design, specs and tasks
pub fn render_change_detail(frame: &mut Frame, app: &App, scroll: u16, area: Rect) {
    let overlay_area = centered_rect(80, 90, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let detail = &app.store.change_detail;
    let title = match detail.item() {
        Some(d) => format!(" {} ", d.name),
        None => " Change ".to_string(),
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
        .title_bottom(Span::styled(
            " j/k scroll  esc close ",
            Style::default().fg(app.theme.dim).bg(bg),
        ))
        .style(Style::default().bg(bg));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let width = inner.width.saturating_sub(2) as usize;
    let lines: Vec<Line> = if let Some(err) = detail.error() {
        vec![Line::from(Span::styled(
            format!(" Failed to load change: {err}"),
            Style::default().fg(app.theme.red).bg(bg),
        ))]
    } else if let Some(d) = detail.item() {
        change_lines(app, d, width)
    } else {
        vec![Line::from(Span::styled(
            " Loading\u{2026}",
            Style::default().fg(app.theme.dim).bg(bg),
        ))]
    };

    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
}

fn change_lines(app: &App, d: &ChangeDetail, width: usize) -> Vec<Line<'static>> {
    let bg = app.theme.background;
    let header = Style::default()
        .fg(app.theme.purple)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text = Style::default().fg(app.theme.text).bg(bg);
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let mut lines = vec![Line::from(vec![
        Span::styled(" status ", dim),
        Span::styled(
            d.status.label(),
            Style::default().fg(app.theme.status_color(d.status)).bg(bg),
        ),
        Span::styled(format!("  source {}", d.source_id), dim),
    ])];

    let section = |lines: &mut Vec<Line<'static>>, name: String, body: &str| {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {name}"), header)));
        for l in wrap_text(body, width) {
            lines.push(Line::from(Span::styled(format!(" {l}"), text)));
        }
    };

    if let Some(tasks) = &d.tasks {
        let summary = format!(
            "{} {}",
            progress_bar(&tasks.stats, 16),
            task_count(&tasks.stats)
        );
        section(&mut lines, format!("Tasks  {summary}"), &tasks.raw);
    }
    if let Some(proposal) = &d.proposal {
        section(&mut lines, "Proposal".to_string(), proposal);
    }
    if let Some(design) = &d.design {
        section(&mut lines, "Design".to_string(), design);
    }
    for spec in &d.specs {
        section(&mut lines, format!("Spec: {}", spec.path), &spec.content);
    }
    lines
}

/// Idea detail overlay
pub fn render_idea_detail(frame: &mut Frame, app: &App, id: &str, area: Rect) {
    let overlay_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let text = Style::default().fg(app.theme.text).bg(bg);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .title(Span::styled(" Idea ", dim))
        .title_bottom(Span::styled(" e edit  d delete  esc close ", dim))
        .style(Style::default().bg(bg));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let Some(idea) = app.find_idea(id) else {
        frame.render_widget(
            Paragraph::new(Span::styled(" This idea no longer exists", dim)),
            inner,
        );
        return;
    };

    let mut lines = vec![Line::from(Span::styled(
        format!(" {}", idea.title),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ))];

    let project = idea.project_id.as_deref().unwrap_or("no project");
    let mut meta = vec![Span::styled(format!(" {project}"), dim)];
    if let Some(created) = idea.created() {
        meta.push(Span::styled(
            format!("  created {}", relative_time(&created, &Utc::now())),
            dim,
        ));
    }
    if let (Some(created), Some(updated)) = (idea.created(), idea.updated())
        && updated > created
    {
        meta.push(Span::styled(
            format!("  edited {}", relative_time(&updated, &Utc::now())),
            dim,
        ));
    }
    lines.push(Line::from(meta));
    lines.push(Line::from(""));

    if idea.description.is_empty() {
        lines.push(Line::from(Span::styled(" No description", dim)));
    } else {
        for l in wrap_text(&idea.description, inner.width.saturating_sub(2) as usize) {
            lines.push(Line::from(Span::styled(format!(" {l}"), text)));
        }
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
