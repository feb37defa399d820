use crossterm::event::{KeyCode, KeyEvent};

use crate::sync::{Mutation, Request};
use crate::tui::app::{App, IdeaForm, Mode, Overlay};

use super::settings::handle_settings;

const PAGE: u16 = 10;

/// Keys while an overlay is open in navigate mode
pub(super) fn handle_overlay(app: &mut App, key: KeyEvent) {
    let Some(overlay) = &mut app.overlay else {
        return;
    };
    match overlay {
        Overlay::Help => {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                app.close_overlay();
            }
        }
        Overlay::ChangeDetail { scroll } => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => app.close_overlay(),
            KeyCode::Char('j') | KeyCode::Down => *scroll = scroll.saturating_add(1),
            KeyCode::Char('k') | KeyCode::Up => *scroll = scroll.saturating_sub(1),
            KeyCode::PageDown | KeyCode::Char(' ') => *scroll = scroll.saturating_add(PAGE),
            KeyCode::PageUp => *scroll = scroll.saturating_sub(PAGE),
            KeyCode::Home | KeyCode::Char('g') => *scroll = 0,
            _ => {}
        },
        Overlay::IdeaDetail { id } => {
            let id = id.clone();
            handle_idea_detail(app, &id, key);
        }
        Overlay::ConfirmDelete { id, .. } => {
            let id = id.clone();
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    app.request(Request::Mutate(Mutation::DeleteIdea(id.clone())));
                    app.status = Some("Deleting\u{2026}".to_string());
                    app.overlay = Some(Overlay::IdeaDetail { id });
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    app.overlay = Some(Overlay::IdeaDetail { id });
                }
                _ => {}
            }
        }
        Overlay::IdeaForm(_) => app.mode = Mode::Form,
        Overlay::Settings(_) => handle_settings(app, key),
    }
}

fn handle_idea_detail(app: &mut App, id: &str, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_overlay(),
        KeyCode::Char('e') => {
            if let Some(idea) = app.find_idea(id) {
                let form = IdeaForm::edit(idea);
                app.overlay = Some(Overlay::IdeaForm(form));
                app.mode = Mode::Form;
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(idea) = app.find_idea(id) {
                let title = idea.title.clone();
                app.overlay = Some(Overlay::ConfirmDelete {
                    id: id.to_string(),
                    title,
                });
            }
        }
        _ => {}
    }
}
