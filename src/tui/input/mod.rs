mod form;
mod navigate;
mod overlay;
mod search;
mod settings;

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::app::{App, Mode, Overlay};
use super::swipe::CELL_PX;
use super::text::TextInput;
use crate::io::prefs::ViewKind;

use form::handle_idea_form;
use navigate::{handle_navigate, move_card};
use overlay::handle_overlay;
use search::handle_search;
use settings::handle_source_draft;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Alerts block everything until dismissed
    if app.alert.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.alert = None;
        }
        return;
    }
    app.status = None;

    match app.mode {
        Mode::Search => handle_search(app, key),
        Mode::Form => match &app.overlay {
            Some(Overlay::IdeaForm(_)) => handle_idea_form(app, key),
            Some(Overlay::Settings(_)) => handle_source_draft(app, key),
            _ => app.mode = Mode::Navigate,
        },
        Mode::Navigate => {
            if app.overlay.is_some() {
                handle_overlay(app, key);
            } else {
                handle_navigate(app, key, now);
            }
        }
    }

    // A key that opened an overlay or left the board ends any drag
    if !board_focused(app) {
        app.swipe.cancel();
    }
}

/// True when pointer input should reach the board
fn board_focused(app: &App) -> bool {
    app.mode == Mode::Navigate
        && app.overlay.is_none()
        && app.alert.is_none()
        && app.view() == ViewKind::Kanban
}

/// Mouse drags in the narrow board feed the swipe machine.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) {
    if !board_focused(app) {
        app.swipe.cancel();
        return;
    }
    let x = mouse.column as f32 * CELL_PX;
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if app.narrow => app.swipe.touch_start(x),
        MouseEventKind::Drag(MouseButton::Left) if app.narrow => app.swipe.touch_move(x),
        MouseEventKind::Up(MouseButton::Left) if app.narrow => app.swipe.touch_end(now),
        MouseEventKind::Up(MouseButton::Left) => app.swipe.cancel(),
        MouseEventKind::ScrollDown => move_card(app, 1),
        MouseEventKind::ScrollUp => move_card(app, -1),
        _ => {}
    }
}

/// Bracketed paste goes into whichever text field has focus.
pub fn handle_paste(app: &mut App, text: &str) {
    match app.mode {
        Mode::Navigate => {}
        Mode::Search => app.search.insert_str(&single_line(text)),
        Mode::Form => match &mut app.overlay {
            Some(Overlay::IdeaForm(form)) => {
                let multiline = form.field == super::app::FormField::Description;
                if let Some(input) = form.focused_input() {
                    if multiline {
                        input.insert_str(&text.replace('\r', ""));
                    } else {
                        input.insert_str(&single_line(text));
                    }
                }
            }
            Some(Overlay::Settings(panel)) => {
                if let Some(draft) = &mut panel.draft {
                    let input = match draft.field {
                        super::app::DraftField::Name => &mut draft.name,
                        super::app::DraftField::Path => &mut draft.path,
                    };
                    input.insert_str(&single_line(text));
                }
            }
            _ => {}
        },
    }
}

fn single_line(text: &str) -> String {
    text.replace('\n', " ").replace('\r', "")
}

/// Shared line-editing keys. Returns true if the key was consumed.
pub(super) fn edit_text(input: &mut TextInput, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('w') if ctrl => input.delete_word(),
        KeyCode::Char('u') if ctrl => input.clear(),
        KeyCode::Char('a') if ctrl => input.home(),
        KeyCode::Char('e') if ctrl => input.end(),
        KeyCode::Char(c) if !ctrl => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        _ => return false,
    }
    true
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crossterm::event::KeyEventState;

    fn mouse(kind: MouseEventKind, column: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row: 5,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn alert_swallows_keys_until_dismissed() {
        let mut app = app();
        app.alert = Some("boom".into());
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert!(app.alert.is_some());
        press(&mut app, KeyCode::Enter);
        assert!(app.alert.is_none());
    }

    #[test]
    fn modifier_only_keys_ignored() {
        let mut app = app();
        let event = KeyEvent {
            code: KeyCode::Modifier(crossterm::event::ModifierKeyCode::LeftShift),
            modifiers: KeyModifiers::SHIFT,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        };
        app.status = Some("keep".into());
        handle_key(&mut app, event, Instant::now());
        assert_eq!(app.status.as_deref(), Some("keep"));
    }

    #[test]
    fn mouse_drag_swipes_in_narrow_layout() {
        let mut app = app();
        app.narrow = true;
        let now = Instant::now();
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 60), now);
        handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 40), now);
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 40), now);
        assert!(app.swipe.is_animating());
        app.tick(now + crate::tui::swipe::SETTLE_DURATION);
        assert_eq!(app.focused_column(), 1);
    }

    #[test]
    fn mouse_ignored_in_wide_layout() {
        let mut app = app();
        app.narrow = false;
        let now = Instant::now();
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 60), now);
        handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 10), now);
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 10), now);
        assert!(!app.swipe.is_animating());
    }

    #[test]
    fn overlay_mid_drag_releases_the_swipe() {
        let mut app = app();
        app.narrow = true;
        let now = Instant::now();
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 60), now);
        press(&mut app, KeyCode::Char('?'));
        assert!(matches!(app.overlay, Some(Overlay::Help)));
        assert!(!app.swipe.is_dragging());
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 60), now);

        press(&mut app, KeyCode::Esc);
        assert!(app.overlay.is_none());
        handle_key(&mut app, key(KeyCode::Char(']')), now);
        app.tick(now + crate::tui::swipe::SETTLE_DURATION);
        assert_eq!(app.focused_column(), 1);
    }

    #[test]
    fn mouse_under_overlay_cancels_drag() {
        let mut app = app();
        app.narrow = true;
        let now = Instant::now();
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 60), now);
        // Overlay opened without a key, e.g. by a sync alert
        app.alert = Some("boom".into());
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 60), now);
        assert!(!app.swipe.is_dragging());
    }

    #[test]
    fn release_after_going_wide_cancels_drag() {
        let mut app = app();
        app.narrow = true;
        let now = Instant::now();
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 60), now);
        app.narrow = false;
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 60), now);
        assert!(!app.swipe.is_dragging());

        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.focused_column(), 2);
    }

    #[test]
    fn paste_into_search_flattens_newlines() {
        let mut app = app();
        app.mode = Mode::Search;
        handle_paste(&mut app, "dark\nmode");
        assert_eq!(app.search.text(), "dark mode");
    }

    #[test]
    fn line_editing_keys() {
        let mut input = TextInput::with_text("hello world");
        assert!(edit_text(&mut input, ctrl('w')));
        assert_eq!(input.text(), "hello ");
        assert!(edit_text(&mut input, key(KeyCode::Char('x'))));
        assert_eq!(input.text(), "hello x");
        assert!(!edit_text(&mut input, key(KeyCode::Tab)));
    }
}
