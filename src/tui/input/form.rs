use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::validate;
use crate::sync::{Mutation, Request};
use crate::tui::app::{App, FormField, Mode, Overlay};

use super::edit_text;

/// Keys for the idea capture / edit form
pub(super) fn handle_idea_form(app: &mut App, key: KeyEvent) {
    let projects: Vec<String> = app
        .store
        .sources
        .items()
        .iter()
        .map(|s| s.id.clone())
        .collect();
    let Some(Overlay::IdeaForm(form)) = &mut app.overlay else {
        return;
    };
    if form.submitting {
        // Only escape is honored while a save is in flight
        if key.code != KeyCode::Esc {
            return;
        }
    }

    match key.code {
        KeyCode::Esc => {
            let back = form.editing.clone();
            app.overlay = back.map(|id| Overlay::IdeaDetail { id });
            app.mode = Mode::Navigate;
        }
        KeyCode::Tab => form.field = form.field.next(),
        KeyCode::BackTab => form.field = form.field.prev(),
        KeyCode::Enter => submit(app),
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
            if form.field == FormField::Project =>
        {
            // The update body carries no project, so it is fixed once created
            if form.editing.is_none() {
                let forward = key.code != KeyCode::Left;
                form.project = cycle_project(&projects, form.project.as_deref(), forward);
            }
        }
        _ => {
            if let Some(input) = form.focused_input()
                && edit_text(input, key)
            {
                form.error = None;
            }
        }
    }
}

/// None, then each project in order, wrapping around
fn cycle_project(projects: &[String], current: Option<&str>, forward: bool) -> Option<String> {
    let mut options: Vec<Option<&str>> = vec![None];
    options.extend(projects.iter().map(|p| Some(p.as_str())));
    let pos = options.iter().position(|o| *o == current).unwrap_or(0);
    let len = options.len();
    let next = if forward {
        (pos + 1) % len
    } else {
        (pos + len - 1) % len
    };
    options[next].map(str::to_string)
}

fn submit(app: &mut App) {
    let Some(Overlay::IdeaForm(form)) = &mut app.overlay else {
        return;
    };
    let mutation = match &form.editing {
        Some(id) => validate::idea_update(form.title.text(), form.description.text()).map(|update| {
            Mutation::UpdateIdea {
                id: id.clone(),
                update,
            }
        }),
        None => validate::new_idea(
            form.title.text(),
            form.description.text(),
            form.project.as_deref(),
        )
        .map(Mutation::CreateIdea),
    };
    match mutation {
        Ok(mutation) => {
            form.error = None;
            form.submitting = true;
            app.request(Request::Mutate(mutation));
        }
        Err(e) => {
            form.error = Some(e.to_string());
            form.field = FormField::Title;
        }
    }
}
