use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::model::TaskStats;
use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Block progress bar `width` cells wide, e.g. `███░░░░░`
pub(super) fn progress_bar(stats: &TaskStats, width: usize) -> String {
    let filled = ((stats.progress() * width as f64).round() as usize).min(width);
    format!(
        "{}{}",
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(width - filled)
    )
}

/// `done/total` label for task stats
pub(super) fn task_count(stats: &TaskStats) -> String {
    format!("{}/{}", stats.done, stats.total)
}

/// Word-wrap `text` to `max_width` cells. Existing line breaks are kept.
pub(super) fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in text.lines() {
        let mut current = String::new();
        for word in raw.split_whitespace() {
            let cur_w = unicode::display_width(&current);
            let word_w = unicode::display_width(word);
            if cur_w > 0 && cur_w + 1 + word_w > max_width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}

pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
