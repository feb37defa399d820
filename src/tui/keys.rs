use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Global actions reachable from a single key combo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    Search,
    Close,
    ToggleView,
    CycleSort,
    ToggleArchived,
    CycleSource,
    NewIdea,
    Settings,
    Refresh,
    Help,
    PrevColumn,
    NextColumn,
    FocusLeft,
    FocusRight,
    FocusUp,
    FocusDown,
    Open,
}

impl Action {
    pub fn description(self) -> &'static str {
        match self {
            Action::Quit => "Quit",
            Action::Search => "Search",
            Action::Close => "Close / clear search",
            Action::ToggleView => "Toggle board / specs",
            Action::CycleSort => "Cycle sort order",
            Action::ToggleArchived => "Show / hide archived",
            Action::CycleSource => "Cycle project filter",
            Action::NewIdea => "Capture an idea",
            Action::Settings => "Settings",
            Action::Refresh => "Refresh everything",
            Action::Help => "Toggle this help",
            Action::PrevColumn => "Previous column",
            Action::NextColumn => "Next column",
            Action::FocusLeft => "Focus left",
            Action::FocusRight => "Focus right",
            Action::FocusUp => "Move up",
            Action::FocusDown => "Move down",
            Action::Open => "Open",
        }
    }
}

/// Resolve a key event to its combo string, e.g. `ctrl+k`, `?`, `escape`.
pub fn combo_for(key: &KeyEvent) -> Option<String> {
    let name = match key.code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_lowercase().collect(),
        KeyCode::Esc => "escape".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "shift+tab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::F(n) => format!("f{n}"),
        _ => return None,
    };

    let mut combo = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        combo.push_str("ctrl+");
    }
    if key.modifiers.contains(KeyModifiers::SUPER) {
        combo.push_str("cmd+");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        combo.push_str("alt+");
    }
    combo.push_str(&name);
    Some(combo)
}

/// Combo string -> action table
#[derive(Debug, Clone)]
pub struct ShortcutMap {
    bindings: HashMap<String, Action>,
}

impl Default for ShortcutMap {
    fn default() -> Self {
        let mut map = ShortcutMap {
            bindings: HashMap::new(),
        };
        for (combo, action) in DEFAULT_BINDINGS {
            map.bind(combo, *action);
        }
        map
    }
}

const DEFAULT_BINDINGS: &[(&str, Action)] = &[
    ("q", Action::Quit),
    ("ctrl+c", Action::Quit),
    ("/", Action::Search),
    ("escape", Action::Close),
    ("v", Action::ToggleView),
    ("s", Action::CycleSort),
    ("a", Action::ToggleArchived),
    ("p", Action::CycleSource),
    ("n", Action::NewIdea),
    (",", Action::Settings),
    ("r", Action::Refresh),
    ("?", Action::Help),
    ("[", Action::PrevColumn),
    ("]", Action::NextColumn),
    ("h", Action::FocusLeft),
    ("left", Action::FocusLeft),
    ("l", Action::FocusRight),
    ("right", Action::FocusRight),
    ("k", Action::FocusUp),
    ("up", Action::FocusUp),
    ("j", Action::FocusDown),
    ("down", Action::FocusDown),
    ("enter", Action::Open),
];

impl ShortcutMap {
    pub fn bind(&mut self, combo: &str, action: Action) {
        self.bindings.insert(combo.to_lowercase(), action);
    }

    /// Action for `key`, or None when unbound or while text input has focus.
    pub fn resolve(&self, key: &KeyEvent, typing: bool) -> Option<Action> {
        if typing {
            return None;
        }
        let combo = combo_for(key)?;
        self.bindings.get(&combo).copied()
    }

    /// Every combo bound to `action`, in table order
    pub fn combos_for(&self, action: Action) -> Vec<&str> {
        DEFAULT_BINDINGS
            .iter()
            .filter(|(combo, _)| self.bindings.get(*combo) == Some(&action))
            .map(|(combo, _)| *combo)
            .collect()
    }
}
