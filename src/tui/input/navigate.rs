use std::time::Instant;

use crossterm::event::KeyEvent;

use crate::io::prefs::ViewKind;
use crate::sync::Request;
use crate::tui::app::{App, Mode, Overlay};
use crate::tui::keys::Action;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent, now: Instant) {
    let Some(action) = app.shortcuts.resolve(&key, app.typing()) else {
        return;
    };
    let kanban = app.view() == ViewKind::Kanban;

    match action {
        Action::Quit => app.should_quit = true,
        Action::Search => app.mode = Mode::Search,
        Action::Close => {
            if !app.search.is_empty() {
                app.search.clear();
            }
        }
        Action::ToggleView => app.set_view(app.view().toggle()),
        Action::CycleSort => app.cycle_sort(),
        Action::ToggleArchived => app.toggle_archived(),
        Action::CycleSource => app.cycle_source(),
        Action::NewIdea => app.open_capture(),
        Action::Settings => app.open_settings(),
        Action::Refresh => {
            app.request(Request::RefetchAll);
            app.request(Request::RefreshDetails);
            app.status = Some("Refreshing\u{2026}".to_string());
        }
        Action::Help => app.overlay = Some(Overlay::Help),
        Action::PrevColumn | Action::FocusLeft if kanban => step_column(app, -1, now),
        Action::NextColumn | Action::FocusRight if kanban => step_column(app, 1, now),
        Action::FocusUp => {
            if kanban {
                move_card(app, -1);
            } else {
                move_spec(app, -1);
            }
        }
        Action::FocusDown => {
            if kanban {
                move_card(app, 1);
            } else {
                move_spec(app, 1);
            }
        }
        Action::Open if kanban => app.open_selected(),
        _ => {}
    }
}

/// Narrow layout animates through the swipe machine; wide layout just moves
/// focus.
fn step_column(app: &mut App, delta: i32, now: Instant) {
    if app.narrow {
        if delta < 0 {
            app.swipe.prev(now);
        } else {
            app.swipe.next(now);
        }
    } else {
        let target = app.focused_column() as i32 + delta;
        if target >= 0 {
            app.swipe.jump_to(target as usize);
        }
    }
}

pub(super) fn move_card(app: &mut App, delta: i32) {
    let col = app.focused_column();
    let len = app
        .board()
        .columns
        .get(col)
        .map_or(0, |c| c.items.len());
    if len == 0 {
        return;
    }
    if let Some(cursor) = app.card_cursor.get_mut(col) {
        *cursor = (*cursor as i32 + delta).clamp(0, len as i32 - 1) as usize;
    }
}

fn move_spec(app: &mut App, delta: i32) {
    let len = app.visible_specs().len();
    if len == 0 {
        return;
    }
    let next = (app.spec_cursor as i32 + delta).clamp(0, len as i32 - 1) as usize;
    if next != app.spec_cursor || app.store.spec_detail.key().is_none() {
        app.select_spec(next);
    }
}
