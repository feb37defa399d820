use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::prefs::{MemoryStore, Settings};
use crate::model::{Change, ChangeStatus, ClientConfig, Idea, Source, TaskStats};
use crate::sync::{ResourceKind, SyncEvent};
use crate::tui::app::App;

pub const TERM_W: u16 = 100;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

pub fn empty_app() -> App {
    App::new(
        &ClientConfig::default(),
        Settings::load(Box::new(MemoryStore::new())),
    )
}

pub fn change(id: &str, status: ChangeStatus) -> Change {
    Change {
        id: format!("proj-a/{id}"),
        name: id.into(),
        source_id: "proj-a".into(),
        status,
        has_proposal: true,
        has_specs: false,
        has_tasks: true,
        has_design: false,
        task_stats: Some(TaskStats { total: 4, done: 1 }),
        ready_for_review: false,
    }
}

pub fn idea(id: &str, title: &str) -> Idea {
    Idea {
        id: id.into(),
        source_id: String::new(),
        project_id: None,
        title: title.into(),
        description: "Something worth doing".into(),
        created_at: "2025-05-14T10:00:00Z".into(),
        updated_at: "2025-05-14T10:00:00Z".into(),
    }
}

/// An app with one source, a change per status and one idea, all loaded.
pub fn app_with_board() -> App {
    let mut app = empty_app();
    let t = app.store.begin(ResourceKind::Sources);
    app.apply_sync(SyncEvent::Sources(
        t,
        Ok(vec![Source {
            id: "proj-a".into(),
            name: "Project A".into(),
            path: "/src/a".into(),
            valid: true,
        }]),
    ));
    let t = app.store.begin(ResourceKind::Changes);
    app.apply_sync(SyncEvent::Changes(
        t,
        Ok(vec![
            change("add-auth", ChangeStatus::Todo),
            change("fix-cache", ChangeStatus::InProgress),
            change("ship-v1", ChangeStatus::Done),
        ]),
    ));
    let t = app.store.begin(ResourceKind::Ideas);
    app.apply_sync(SyncEvent::Ideas(t, Ok(vec![idea("7", "Dark mode")])));
    app.refresh_board();
    app.take_requests();
    app
}
