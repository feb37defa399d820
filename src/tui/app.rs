use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;
use tokio::sync::mpsc;

use crate::api::{ApiClient, ApiError};
use crate::io::prefs::{FileStore, MemoryStore, PreferenceStore, PrefsError, Settings, ViewKind};
use crate::model::{ClientConfig, Idea, SourceConfig, Spec};
use crate::ops::board::{self, Board, BoardFilter, BoardItem, BoardMemo, ColumnKind, SortOrder};
use crate::ops::specs;
use crate::sync::{
    Applied, Dispatcher, LiveChannel, Mutation, MutationOutput, Request, Store, SyncEvent,
};

use super::input;
use super::keys::ShortcutMap;
use super::render;
use super::swipe::SwipeController;
use super::text::TextInput;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing into the search box
    Search,
    /// Typing into a form field
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Project,
}

impl FormField {
    pub fn next(self) -> FormField {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Project,
            FormField::Project => FormField::Title,
        }
    }

    pub fn prev(self) -> FormField {
        match self {
            FormField::Title => FormField::Project,
            FormField::Description => FormField::Title,
            FormField::Project => FormField::Description,
        }
    }
}

/// Idea capture / edit form
#[derive(Debug, Clone)]
pub struct IdeaForm {
    /// Id of the idea being edited; None captures a new one
    pub editing: Option<String>,
    pub title: TextInput,
    pub description: TextInput,
    pub project: Option<String>,
    pub field: FormField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl IdeaForm {
    pub fn capture(project: Option<&str>) -> Self {
        IdeaForm {
            editing: None,
            title: TextInput::new(),
            description: TextInput::new(),
            project: project.map(str::to_string),
            field: FormField::Title,
            error: None,
            submitting: false,
        }
    }

    pub fn edit(idea: &Idea) -> Self {
        IdeaForm {
            editing: Some(idea.id.clone()),
            title: TextInput::with_text(&idea.title),
            description: TextInput::with_text(&idea.description),
            project: idea.project_id.clone(),
            field: FormField::Title,
            error: None,
            submitting: false,
        }
    }

    /// The text field that has focus, if it is a text field
    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Project => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Path,
}

/// New source being typed in the settings panel
#[derive(Debug, Clone)]
pub struct SourceDraft {
    pub name: TextInput,
    pub path: TextInput,
    pub field: DraftField,
}

/// Settings overlay state
#[derive(Debug, Clone, Default)]
pub struct SettingsPanel {
    pub cursor: usize,
    /// Optimistic source list while a save is in flight
    pub pending: Option<Vec<SourceConfig>>,
    pub draft: Option<SourceDraft>,
    pub error: Option<String>,
}

impl SettingsPanel {
    /// A source save is in flight
    pub fn saving(&self) -> bool {
        self.pending.is_some()
    }
}

/// Overlays drawn on top of the current view
#[derive(Debug, Clone)]
pub enum Overlay {
    Help,
    ChangeDetail { scroll: u16 },
    IdeaDetail { id: String },
    ConfirmDelete { id: String, title: String },
    IdeaForm(IdeaForm),
    Settings(SettingsPanel),
}

/// Main application state
pub struct App {
    pub store: Store,
    pub settings: Settings,
    pub mode: Mode,
    pub overlay: Option<Overlay>,
    /// Blocking message; intercepts all input until dismissed
    pub alert: Option<String>,
    /// Transient message for the status row
    pub status: Option<String>,
    pub search: TextInput,
    pub sort: SortOrder,
    pub memo: BoardMemo,
    pub swipe: SwipeController,
    /// Card cursor per visible column
    pub card_cursor: Vec<usize>,
    pub spec_cursor: usize,
    pub theme: Theme,
    pub shortcuts: ShortcutMap,
    pub narrow_width: u16,
    /// Set by the renderer from the last frame's width
    pub narrow: bool,
    pub should_quit: bool,
    requests: Vec<Request>,
}

impl App {
    pub fn new(config: &ClientConfig, settings: Settings) -> Self {
        let columns = board::columns(settings.show_archived()).len();
        App {
            store: Store::new(),
            settings,
            mode: Mode::Navigate,
            overlay: None,
            alert: None,
            status: None,
            search: TextInput::new(),
            sort: SortOrder::default(),
            memo: BoardMemo::new(),
            swipe: SwipeController::new(columns),
            card_cursor: vec![0; columns],
            spec_cursor: 0,
            theme: Theme::from_config(&config.ui),
            shortcuts: ShortcutMap::default(),
            narrow_width: config.ui.narrow_width,
            narrow: false,
            should_quit: false,
            requests: Vec::new(),
        }
    }

    /// Queue the initial load
    pub fn start(&mut self) {
        self.request(Request::RefetchAll);
    }

    pub fn request(&mut self, request: Request) {
        self.requests.push(request);
    }

    /// Drain queued requests for the dispatcher
    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.requests)
    }

    // -----------------------------------------------------------------------
    // Derived state
    // -----------------------------------------------------------------------

    pub fn view(&self) -> ViewKind {
        self.settings.view()
    }

    pub fn filter(&self) -> BoardFilter {
        BoardFilter {
            source: self.settings.selected_source().map(str::to_string),
            show_archived: self.settings.show_archived(),
            search: self.search.text().to_string(),
            sort: self.sort,
        }
    }

    /// Recompute the board if any of its inputs changed
    pub fn refresh_board(&mut self) {
        let filter = self.filter();
        self.memo
            .board(&self.store.changes, &self.store.ideas, &filter);
        self.clamp_cursors();
    }

    /// Board as of the last `refresh_board`
    pub fn board(&self) -> &Board {
        self.memo.current()
    }

    pub fn columns(&self) -> Vec<ColumnKind> {
        board::columns(self.settings.show_archived())
    }

    pub fn focused_column(&self) -> usize {
        self.swipe.index()
    }

    pub fn selected_item(&self) -> Option<&BoardItem> {
        let col = self.focused_column();
        let column = self.board().columns.get(col)?;
        let cursor = self.card_cursor.get(col).copied().unwrap_or(0);
        column.items.get(cursor)
    }

    pub fn search_regex(&self) -> Option<Regex> {
        board::search_regex(self.search.text())
    }

    pub fn find_idea(&self, id: &str) -> Option<&Idea> {
        self.store.ideas.items().iter().find(|i| i.id == id)
    }

    /// Specs in sidebar order (grouped by source)
    pub fn visible_specs(&self) -> Vec<&Spec> {
        specs::group_specs(self.store.specs.items(), self.settings.selected_source())
            .into_values()
            .flatten()
            .collect()
    }

    /// Source list shown in settings: the optimistic copy while saving
    pub fn settings_sources(&self) -> Vec<SourceConfig> {
        if let Some(Overlay::Settings(panel)) = &self.overlay
            && let Some(pending) = &panel.pending
        {
            return pending.clone();
        }
        self.store
            .config
            .item()
            .map(|c| c.sources.clone())
            .unwrap_or_default()
    }

    /// Source edits replace the server's whole list, so they wait until that
    /// list has loaded cleanly.
    pub fn sources_editable(&self) -> bool {
        let config = &self.store.config;
        config.item().is_some() && !config.loading() && config.error().is_none()
    }

    pub fn typing(&self) -> bool {
        self.mode != Mode::Navigate
    }

    fn clamp_cursors(&mut self) {
        let lens: Vec<usize> = self
            .board()
            .columns
            .iter()
            .map(|c| c.items.len())
            .collect();
        self.card_cursor.resize(lens.len(), 0);
        for (cursor, len) in self.card_cursor.iter_mut().zip(lens) {
            *cursor = (*cursor).min(len.saturating_sub(1));
        }
        let specs = self.visible_specs().len();
        self.spec_cursor = self.spec_cursor.min(specs.saturating_sub(1));
    }

    // -----------------------------------------------------------------------
    // Preferences
    // -----------------------------------------------------------------------

    fn note_prefs(&mut self, result: Result<(), PrefsError>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to save preferences");
            self.status = Some(format!("could not save preferences: {e}"));
        }
    }

    pub fn set_view(&mut self, view: ViewKind) {
        let result = self.settings.set_view(view);
        self.note_prefs(result);
        if view == ViewKind::Specs {
            self.select_spec(self.spec_cursor);
        }
    }

    pub fn toggle_archived(&mut self) {
        let show = !self.settings.show_archived();
        let result = self.settings.set_show_archived(show);
        self.note_prefs(result);
        self.swipe.set_column_count(self.columns().len());
    }

    /// All projects, then each source in turn
    pub fn cycle_source(&mut self) {
        let ids: Vec<String> = self
            .store
            .sources
            .items()
            .iter()
            .map(|s| s.id.clone())
            .collect();
        let next = match self.settings.selected_source() {
            None => ids.first().cloned(),
            Some(current) => ids
                .iter()
                .position(|id| id == current)
                .and_then(|i| ids.get(i + 1))
                .cloned(),
        };
        let result = self.settings.set_selected_source(next.as_deref());
        self.note_prefs(result);
        self.spec_cursor = 0;
        if self.view() == ViewKind::Specs {
            self.select_spec(0);
        }
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        self.status = Some(format!("Sort: {}", self.sort.label()));
    }

    // -----------------------------------------------------------------------
    // Overlays
    // -----------------------------------------------------------------------

    pub fn open_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        match item {
            BoardItem::Change(change) => {
                let id = change.id.clone();
                self.overlay = Some(Overlay::ChangeDetail { scroll: 0 });
                self.request(Request::SelectChange(Some(id)));
            }
            BoardItem::Idea(idea) => {
                self.overlay = Some(Overlay::IdeaDetail {
                    id: idea.id.clone(),
                });
            }
        }
    }

    pub fn open_settings(&mut self) {
        self.overlay = Some(Overlay::Settings(SettingsPanel::default()));
        self.request(Request::LoadConfig);
    }

    pub fn open_capture(&mut self) {
        let form = IdeaForm::capture(self.settings.selected_source());
        self.overlay = Some(Overlay::IdeaForm(form));
        self.mode = Mode::Form;
    }

    pub fn close_overlay(&mut self) {
        if let Some(Overlay::ChangeDetail { .. }) = self.overlay {
            self.request(Request::SelectChange(None));
        }
        self.overlay = None;
        self.mode = Mode::Navigate;
    }

    pub fn select_spec(&mut self, index: usize) {
        let id = self.visible_specs().get(index).map(|s| s.id.clone());
        if id.is_some() {
            self.spec_cursor = index;
        }
        self.request(Request::SelectSpec(id));
    }

    // -----------------------------------------------------------------------
    // Sync events
    // -----------------------------------------------------------------------

    pub fn apply_sync(&mut self, event: SyncEvent) {
        let specs_before = self.store.specs.revision();
        match self.store.apply(event) {
            Applied::Nothing => {}
            Applied::RefetchAll => {
                self.request(Request::RefetchAll);
                self.request(Request::RefreshDetails);
            }
            Applied::Mutated(mutation, result) => self.on_mutated(mutation, result),
        }
        if self.view() == ViewKind::Specs
            && self.store.specs.revision() != specs_before
            && self.store.spec_detail.key().is_none()
        {
            self.select_spec(self.spec_cursor);
        }
    }

    fn on_mutated(&mut self, mutation: Mutation, result: Result<MutationOutput, ApiError>) {
        match result {
            Ok(output) => {
                tracing::info!(action = mutation.describe(), "done");
                for kind in mutation.affects() {
                    self.request(Request::Refetch(*kind));
                }
                match mutation {
                    Mutation::CreateIdea(_) | Mutation::UpdateIdea { .. } => {
                        if matches!(self.overlay, Some(Overlay::IdeaForm(_))) {
                            self.overlay = match output {
                                MutationOutput::Idea(idea) => Some(Overlay::IdeaDetail { id: idea.id }),
                                _ => None,
                            };
                            self.mode = Mode::Navigate;
                        }
                        self.status = Some("Idea saved".to_string());
                    }
                    Mutation::DeleteIdea(_) => {
                        if matches!(
                            self.overlay,
                            Some(Overlay::ConfirmDelete { .. } | Overlay::IdeaDetail { .. })
                        ) {
                            self.overlay = None;
                        }
                        self.status = Some("Idea deleted".to_string());
                    }
                    Mutation::UpdateSources(_) => {
                        if let Some(Overlay::Settings(panel)) = &mut self.overlay {
                            panel.pending = None;
                        }
                        self.request(Request::LoadConfig);
                        self.status = Some("Sources saved".to_string());
                    }
                }
            }
            Err(e) => {
                tracing::warn!(action = mutation.describe(), error = %e, "mutation failed");
                let sources = matches!(mutation, Mutation::UpdateSources(_));
                match &mut self.overlay {
                    Some(Overlay::Settings(panel)) if sources => panel.pending = None,
                    Some(Overlay::IdeaForm(form)) if !sources => form.submitting = false,
                    _ => {}
                }
                if sources {
                    // Drop the optimistic copy and show what the server has
                    self.request(Request::LoadConfig);
                }
                self.alert = Some(format!("Failed to {}: {}", mutation.describe(), e));
            }
        }
    }

    /// Advance animations. Returns true when something changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.swipe.tick(now)
    }
}

/// Preference storage for the session: the state-dir file, or memory when
/// no state dir exists.
fn preference_store() -> Box<dyn PreferenceStore> {
    match FileStore::default_path() {
        Some(path) => Box::new(FileStore::open(path)),
        None => Box::new(MemoryStore::new()),
    }
}

/// Run the TUI application
pub fn run(config: &ClientConfig, api: ApiClient) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(api.clone(), runtime.handle().clone(), tx.clone());
    let live = LiveChannel::spawn(
        runtime.handle(),
        api,
        Duration::from_millis(config.live.retry_ms),
        tx,
    );

    let mut app = App::new(config, Settings::load(preference_store()));
    app.start();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, &dispatcher, &mut rx);

    // Stop the live channel before the runtime goes away
    drop(live);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    runtime.shutdown_timeout(Duration::from_millis(250));
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    dispatcher: &Dispatcher,
    rx: &mut mpsc::UnboundedReceiver<SyncEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        for request in app.take_requests() {
            dispatcher.dispatch(&mut app.store, request);
        }

        terminal.draw(|frame| render::render(frame, app))?;

        let timeout = if app.swipe.is_animating() {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(100)
        };
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key, Instant::now());
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse, Instant::now()),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        // Drain network results
        while let Ok(event) = rx.try_recv() {
            app.apply_sync(event);
        }
        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Change, ChangeStatus, IdeaUpdate, Source};
    use crate::sync::{LiveEvent, ResourceKind, Ticket};

    fn app() -> App {
        App::new(&ClientConfig::default(), Settings::load(Box::new(MemoryStore::new())))
    }

    fn change(id: &str, status: ChangeStatus) -> Change {
        Change {
            id: id.into(),
            name: id.into(),
            source_id: "s".into(),
            status,
            has_proposal: true,
            has_specs: false,
            has_tasks: false,
            has_design: false,
            task_stats: None,
            ready_for_review: false,
        }
    }

    fn load_changes(app: &mut App, changes: Vec<Change>) {
        let t: Ticket = app.store.begin(ResourceKind::Changes);
        app.apply_sync(SyncEvent::Changes(t, Ok(changes)));
        app.refresh_board();
    }

    #[test]
    fn start_queues_full_refetch() {
        let mut app = app();
        app.start();
        assert_eq!(app.take_requests(), vec![Request::RefetchAll]);
        assert!(app.take_requests().is_empty());
    }

    #[test]
    fn live_update_refetches_everything() {
        let mut app = app();
        app.apply_sync(SyncEvent::Live(LiveEvent::Update));
        assert_eq!(
            app.take_requests(),
            vec![Request::RefetchAll, Request::RefreshDetails]
        );
    }

    #[test]
    fn toggling_archived_changes_column_count() {
        let mut app = app();
        assert_eq!(app.swipe.column_count(), 4);
        app.toggle_archived();
        assert_eq!(app.swipe.column_count(), 5);
        app.swipe.jump_to(4);
        app.toggle_archived();
        assert_eq!(app.focused_column(), 3);
    }

    #[test]
    fn open_change_selects_detail() {
        let mut app = app();
        load_changes(&mut app, vec![change("s/a", ChangeStatus::Todo)]);
        app.swipe.jump_to(1);
        app.open_selected();
        assert!(matches!(app.overlay, Some(Overlay::ChangeDetail { .. })));
        assert_eq!(
            app.take_requests(),
            vec![Request::SelectChange(Some("s/a".into()))]
        );
        app.close_overlay();
        assert_eq!(app.take_requests(), vec![Request::SelectChange(None)]);
    }

    #[test]
    fn cycle_source_wraps_to_all() {
        let mut app = app();
        let t = app.store.begin(ResourceKind::Sources);
        let source = |id: &str| Source {
            id: id.into(),
            name: id.into(),
            path: format!("/{id}"),
            valid: true,
        };
        app.apply_sync(SyncEvent::Sources(t, Ok(vec![source("a"), source("b")])));
        app.cycle_source();
        assert_eq!(app.settings.selected_source(), Some("a"));
        app.cycle_source();
        assert_eq!(app.settings.selected_source(), Some("b"));
        app.cycle_source();
        assert_eq!(app.settings.selected_source(), None);
    }

    #[test]
    fn failed_mutation_raises_alert_and_keeps_form() {
        let mut app = app();
        app.open_capture();
        if let Some(Overlay::IdeaForm(form)) = &mut app.overlay {
            form.submitting = true;
        }
        let mutation = Mutation::UpdateIdea {
            id: "1".into(),
            update: IdeaUpdate {
                title: "t".into(),
                description: String::new(),
            },
        };
        app.apply_sync(SyncEvent::Mutated(
            mutation,
            Err(ApiError::Server {
                status: 400,
                message: "Title is required".into(),
            }),
        ));
        assert_eq!(
            app.alert.as_deref(),
            Some("Failed to update idea: Title is required")
        );
        match &app.overlay {
            Some(Overlay::IdeaForm(form)) => assert!(!form.submitting),
            other => panic!("form closed: {other:?}"),
        }
    }

    #[test]
    fn failed_source_save_reloads_config() {
        let mut app = app();
        app.open_settings();
        app.take_requests();
        if let Some(Overlay::Settings(panel)) = &mut app.overlay {
            panel.pending = Some(vec![]);
        }
        app.apply_sync(SyncEvent::Mutated(
            Mutation::UpdateSources(vec![]),
            Err(ApiError::Http {
                status: 500,
                body: "disk full".into(),
            }),
        ));
        assert_eq!(app.take_requests(), vec![Request::LoadConfig]);
        assert!(app.alert.is_some());
        match &app.overlay {
            Some(Overlay::Settings(panel)) => assert!(panel.pending.is_none()),
            other => panic!("settings closed: {other:?}"),
        }
    }

    #[test]
    fn delete_refetches_ideas_and_closes_detail() {
        let mut app = app();
        app.overlay = Some(Overlay::ConfirmDelete {
            id: "1".into(),
            title: "t".into(),
        });
        app.apply_sync(SyncEvent::Mutated(
            Mutation::DeleteIdea("1".into()),
            Ok(MutationOutput::Deleted),
        ));
        assert!(app.overlay.is_none());
        assert_eq!(
            app.take_requests(),
            vec![Request::Refetch(ResourceKind::Ideas)]
        );
    }
}
