use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};

use super::edit_text;

/// Typing into the search box. The board filters live as the query changes.
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.search.clear();
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter | KeyCode::Down | KeyCode::Tab => app.mode = Mode::Navigate,
        _ => {
            edit_text(&mut app.search, key);
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::super::test_support::*;
    use crate::tui::app::Mode;

    #[test]
    fn typing_filters_without_shortcuts() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        // 'q' and 'v' are shortcuts in navigate mode but plain text here
        type_str(&mut app, "qv");
        assert_eq!(app.search.text(), "qv");
        assert!(!app.should_quit);
        assert_eq!(app.filter().search, "qv");
    }

    #[test]
    fn escape_discards_query() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "auth");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.search.is_empty());
    }

    #[test]
    fn enter_keeps_query() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "auth");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.search.text(), "aut");
    }
}
