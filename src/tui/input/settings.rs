use crossterm::event::{KeyCode, KeyEvent};

use crate::model::SourceConfig;
use crate::ops::validate;
use crate::sync::{Mutation, Request};
use crate::tui::app::{App, DraftField, Mode, Overlay, SourceDraft};
use crate::tui::text::TextInput;

use super::edit_text;

const NOT_LOADED: &str = "sources can't be edited until the config has loaded";

/// Settings panel in navigate mode: browse, add and remove sources
pub(super) fn handle_settings(app: &mut App, key: KeyEvent) {
    let sources = app.settings_sources();
    let editable = app.sources_editable();
    let Some(Overlay::Settings(panel)) = &mut app.overlay else {
        return;
    };

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char(',') => app.close_overlay(),
        KeyCode::Char('j') | KeyCode::Down => {
            if panel.cursor + 1 < sources.len() {
                panel.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => panel.cursor = panel.cursor.saturating_sub(1),
        KeyCode::Char('a') | KeyCode::Char('n') | KeyCode::Char('d') | KeyCode::Delete
            if !editable =>
        {
            panel.error = Some(NOT_LOADED.to_string());
        }
        KeyCode::Char('a') | KeyCode::Char('n') if panel.pending.is_none() => {
            panel.error = None;
            panel.draft = Some(SourceDraft {
                name: TextInput::new(),
                path: TextInput::new(),
                field: DraftField::Name,
            });
            app.mode = Mode::Form;
        }
        KeyCode::Char('d') | KeyCode::Delete if panel.pending.is_none() => {
            let Some(name) = sources.get(panel.cursor).map(|s| s.name.clone()) else {
                return;
            };
            match validate::remove_source(&sources, &name) {
                Ok(next) => {
                    panel.error = None;
                    panel.cursor = panel.cursor.min(next.len().saturating_sub(1));
                    save(app, next);
                }
                Err(e) => panel.error = Some(e.to_string()),
            }
        }
        _ => {}
    }
}

/// Typing a new source into the settings panel
pub(super) fn handle_source_draft(app: &mut App, key: KeyEvent) {
    let sources = app.settings_sources();
    let editable = app.sources_editable();
    let Some(Overlay::Settings(panel)) = &mut app.overlay else {
        return;
    };
    let Some(draft) = &mut panel.draft else {
        app.mode = Mode::Navigate;
        return;
    };

    match key.code {
        KeyCode::Esc => {
            panel.draft = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            draft.field = match draft.field {
                DraftField::Name => DraftField::Path,
                DraftField::Path => DraftField::Name,
            };
        }
        KeyCode::Enter if !editable => panel.error = Some(NOT_LOADED.to_string()),
        KeyCode::Enter => {
            match validate::add_source(&sources, draft.name.text(), draft.path.text()) {
                Ok(next) => {
                    panel.draft = None;
                    panel.error = None;
                    panel.cursor = next.len().saturating_sub(1);
                    app.mode = Mode::Navigate;
                    save(app, next);
                }
                Err(e) => panel.error = Some(e.to_string()),
            }
        }
        _ => {
            let input = match draft.field {
                DraftField::Name => &mut draft.name,
                DraftField::Path => &mut draft.path,
            };
            edit_text(input, key);
        }
    }
}

/// Show `next` right away and send it to the server
fn save(app: &mut App, next: Vec<SourceConfig>) {
    if let Some(Overlay::Settings(panel)) = &mut app.overlay {
        panel.pending = Some(next.clone());
    }
    app.request(Request::Mutate(Mutation::UpdateSources(next)));
}
