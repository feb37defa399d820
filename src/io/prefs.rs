use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

pub const VIEW_KEY: &str = "openspec-view";
pub const ARCHIVED_KEY: &str = "openspec-show-archived";
pub const SOURCE_KEY: &str = "openspec-selected-source";

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("could not write preferences to {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Which top-level view is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewKind {
    #[default]
    Kanban,
    Specs,
}

impl ViewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewKind::Kanban => "kanban",
            ViewKind::Specs => "specs",
        }
    }

    pub fn parse(s: &str) -> Option<ViewKind> {
        match s {
            "kanban" => Some(ViewKind::Kanban),
            "specs" => Some(ViewKind::Specs),
            _ => None,
        }
    }

    pub fn toggle(self) -> ViewKind {
        match self {
            ViewKind::Kanban => ViewKind::Specs,
            ViewKind::Specs => ViewKind::Kanban,
        }
    }
}

/// Durable string key-value storage for UI preferences
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError>;
    fn remove(&mut self, key: &str) -> Result<(), PrefsError>;
}

/// In-memory store; counts writes so tests can check write-on-change.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(values: &[(&str, &str)]) -> Self {
        MemoryStore {
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            writes: 0,
        }
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.writes += 1;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
        self.writes += 1;
        self.values.remove(key);
        Ok(())
    }
}

/// JSON object file, rewritten atomically on every change
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed preferences");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        FileStore { path, values }
    }

    /// `<state dir>/openspec-board/prefs.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .map(|d| d.join("openspec-board").join("prefs.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), PrefsError> {
        let content = serde_json::to_string_pretty(&self.values)?;
        atomic_write(&self.path, content.as_bytes()).map_err(|source| PrefsError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
        self.values.remove(key);
        self.flush()
    }
}

/// Write `content` to `path` through a temp file + rename.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// UI preferences, read once from the store and written back on change.
pub struct Settings {
    store: Box<dyn PreferenceStore>,
    view: ViewKind,
    show_archived: bool,
    selected_source: Option<String>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("view", &self.view)
            .field("show_archived", &self.show_archived)
            .field("selected_source", &self.selected_source)
            .finish()
    }
}

impl Settings {
    pub fn load(store: Box<dyn PreferenceStore>) -> Self {
        let view = store
            .get(VIEW_KEY)
            .and_then(|v| ViewKind::parse(&v))
            .unwrap_or_default();
        let show_archived = store.get(ARCHIVED_KEY).as_deref() == Some("true");
        let selected_source = store.get(SOURCE_KEY).filter(|s| !s.is_empty());
        Settings {
            store,
            view,
            show_archived,
            selected_source,
        }
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn show_archived(&self) -> bool {
        self.show_archived
    }

    pub fn selected_source(&self) -> Option<&str> {
        self.selected_source.as_deref()
    }

    pub fn set_view(&mut self, view: ViewKind) -> Result<(), PrefsError> {
        if self.view == view {
            return Ok(());
        }
        self.view = view;
        self.store.set(VIEW_KEY, view.as_str())
    }

    pub fn set_show_archived(&mut self, show: bool) -> Result<(), PrefsError> {
        if self.show_archived == show {
            return Ok(());
        }
        self.show_archived = show;
        self.store
            .set(ARCHIVED_KEY, if show { "true" } else { "false" })
    }

    /// Select a source; None clears the key.
    pub fn set_selected_source(&mut self, source: Option<&str>) -> Result<(), PrefsError> {
        if self.selected_source.as_deref() == source {
            return Ok(());
        }
        self.selected_source = source.map(str::to_string);
        match source {
            Some(s) => self.store.set(SOURCE_KEY, s),
            None => self.store.remove(SOURCE_KEY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Shares a MemoryStore with the test so writes can be inspected
    struct Shared(Rc<RefCell<MemoryStore>>);

    impl PreferenceStore for Shared {
        fn get(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key)
        }
        fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
            self.0.borrow_mut().set(key, value)
        }
        fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
            self.0.borrow_mut().remove(key)
        }
    }

    #[test]
    fn defaults_when_empty() {
        let settings = Settings::load(Box::new(MemoryStore::new()));
        assert_eq!(settings.view(), ViewKind::Kanban);
        assert!(!settings.show_archived());
        assert!(settings.selected_source().is_none());
    }

    #[test]
    fn reads_stored_values_and_ignores_garbage() {
        let store = MemoryStore::with(&[
            (VIEW_KEY, "specs"),
            (ARCHIVED_KEY, "true"),
            (SOURCE_KEY, "proj-a"),
        ]);
        let settings = Settings::load(Box::new(store));
        assert_eq!(settings.view(), ViewKind::Specs);
        assert!(settings.show_archived());
        assert_eq!(settings.selected_source(), Some("proj-a"));

        let garbage = MemoryStore::with(&[(VIEW_KEY, "grid"), (ARCHIVED_KEY, "yes")]);
        let settings = Settings::load(Box::new(garbage));
        assert_eq!(settings.view(), ViewKind::Kanban);
        assert!(!settings.show_archived());
    }

    #[test]
    fn writes_only_on_change() {
        let shared = Rc::new(RefCell::new(MemoryStore::new()));
        let mut settings = Settings::load(Box::new(Shared(shared.clone())));

        settings.set_view(ViewKind::Kanban).unwrap();
        settings.set_show_archived(false).unwrap();
        settings.set_selected_source(None).unwrap();
        assert_eq!(shared.borrow().writes(), 0);

        settings.set_view(ViewKind::Specs).unwrap();
        settings.set_view(ViewKind::Specs).unwrap();
        assert_eq!(shared.borrow().writes(), 1);
        assert_eq!(shared.borrow().get(VIEW_KEY).as_deref(), Some("specs"));
    }

    #[test]
    fn clearing_source_removes_key() {
        let shared = Rc::new(RefCell::new(MemoryStore::with(&[(SOURCE_KEY, "a")])));
        let mut settings = Settings::load(Box::new(Shared(shared.clone())));
        settings.set_selected_source(None).unwrap();
        assert!(shared.borrow().get(SOURCE_KEY).is_none());
    }

    #[test]
    fn file_store_persists_across_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut settings = Settings::load(Box::new(FileStore::open(&path)));
        settings.set_show_archived(true).unwrap();
        settings.set_selected_source(Some("proj-b")).unwrap();

        let reopened = Settings::load(Box::new(FileStore::open(&path)));
        assert!(reopened.show_archived());
        assert_eq!(reopened.selected_source(), Some("proj-b"));
    }

    #[test]
    fn file_store_tolerates_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{not json").unwrap();
        let store = FileStore::open(&path);
        assert!(store.get(VIEW_KEY).is_none());
    }
}
