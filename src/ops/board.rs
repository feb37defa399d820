use std::cmp::Ordering;
use std::ops::Range;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{Change, ChangeStatus, Idea};
use crate::sync::ListResource;

/// Ordering applied to change cards
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    NameAsc,
    NameDesc,
    ProgressAsc,
    ProgressDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::NameAsc,
        SortOrder::NameDesc,
        SortOrder::ProgressAsc,
        SortOrder::ProgressDesc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::NameAsc => "name-asc",
            SortOrder::NameDesc => "name-desc",
            SortOrder::ProgressAsc => "progress-asc",
            SortOrder::ProgressDesc => "progress-desc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::NameAsc => "Name (A-Z)",
            SortOrder::NameDesc => "Name (Z-A)",
            SortOrder::ProgressAsc => "Progress (low-high)",
            SortOrder::ProgressDesc => "Progress (high-low)",
        }
    }

    /// Next order in the cycle
    pub fn next(self) -> SortOrder {
        let idx = SortOrder::ALL.iter().position(|s| *s == self).unwrap_or(0);
        SortOrder::ALL[(idx + 1) % SortOrder::ALL.len()]
    }

    fn compare(self, a: &Change, b: &Change) -> Ordering {
        match self {
            SortOrder::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortOrder::NameDesc => b.name.to_lowercase().cmp(&a.name.to_lowercase()),
            SortOrder::ProgressAsc => a.progress().total_cmp(&b.progress()),
            SortOrder::ProgressDesc => b.progress().total_cmp(&a.progress()),
        }
    }
}

/// Local filters applied on top of the raw collections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardFilter {
    /// Selected source id; None shows every source
    pub source: Option<String>,
    pub show_archived: bool,
    pub search: String,
    pub sort: SortOrder,
}

impl BoardFilter {
    pub fn search_active(&self) -> bool {
        !self.search.is_empty()
    }

    fn source_matches(&self, source_id: &str) -> bool {
        self.source.as_deref().is_none_or(|s| s == source_id)
    }
}

/// Fixed kanban buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Ideas,
    Todo,
    InProgress,
    Done,
    Archived,
}

impl ColumnKind {
    pub fn label(self) -> &'static str {
        match self {
            ColumnKind::Ideas => "Ideas",
            ColumnKind::Todo => "Todo",
            ColumnKind::InProgress => "In Progress",
            ColumnKind::Done => "Done",
            ColumnKind::Archived => "Archived",
        }
    }

    /// Column a change with `status` lands in. Drafts have none.
    pub fn for_status(status: ChangeStatus) -> Option<ColumnKind> {
        match status {
            ChangeStatus::Draft => None,
            ChangeStatus::Todo => Some(ColumnKind::Todo),
            ChangeStatus::InProgress => Some(ColumnKind::InProgress),
            ChangeStatus::Done => Some(ColumnKind::Done),
            ChangeStatus::Archived => Some(ColumnKind::Archived),
        }
    }
}

/// Visible columns, Ideas first
pub fn columns(show_archived: bool) -> Vec<ColumnKind> {
    let mut cols = vec![
        ColumnKind::Ideas,
        ColumnKind::Todo,
        ColumnKind::InProgress,
        ColumnKind::Done,
    ];
    if show_archived {
        cols.push(ColumnKind::Archived);
    }
    cols
}

/// A card on the board
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoardItem {
    Change(Change),
    Idea(Idea),
}

impl BoardItem {
    pub fn id(&self) -> &str {
        match self {
            BoardItem::Change(c) => &c.id,
            BoardItem::Idea(i) => &i.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            BoardItem::Change(c) => &c.name,
            BoardItem::Idea(i) => &i.title,
        }
    }

    pub fn source_id(&self) -> &str {
        match self {
            BoardItem::Change(c) => &c.source_id,
            BoardItem::Idea(i) => &i.source_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub kind: ColumnKind,
    pub items: Vec<BoardItem>,
}

/// Derived board: the partitioned, filtered, sorted view of changes and ideas
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Board {
    pub columns: Vec<Column>,
    pub change_count: usize,
    pub idea_count: usize,
}

impl Board {
    /// True when no card at all would be shown
    pub fn is_empty(&self) -> bool {
        self.change_count == 0 && self.idea_count == 0
    }

    pub fn column(&self, kind: ColumnKind) -> Option<&Column> {
        self.columns.iter().find(|c| c.kind == kind)
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Source, archived and search filters. Drafts are kept.
pub fn filter_changes<'a>(changes: &'a [Change], filter: &BoardFilter) -> Vec<&'a Change> {
    let query = filter.search.to_lowercase();
    changes
        .iter()
        .filter(|c| filter.source_matches(&c.source_id))
        .filter(|c| filter.show_archived || c.status != ChangeStatus::Archived)
        .filter(|c| {
            query.is_empty() || contains_ci(&c.name, &query) || contains_ci(&c.source_id, &query)
        })
        .collect()
}

/// Source and search filters for ideas
pub fn filter_ideas<'a>(ideas: &'a [Idea], filter: &BoardFilter) -> Vec<&'a Idea> {
    let query = filter.search.to_lowercase();
    ideas
        .iter()
        .filter(|i| filter.source_matches(&i.source_id))
        .filter(|i| {
            query.is_empty()
                || contains_ci(&i.title, &query)
                || contains_ci(&i.description, &query)
                || contains_ci(&i.source_id, &query)
        })
        .collect()
}

/// Stable sort; equal keys keep their incoming order.
pub fn sort_changes(changes: &mut [&Change], order: SortOrder) {
    changes.sort_by(|a, b| order.compare(a, b));
}

/// Run the full pipeline and partition into columns.
pub fn derive_board(changes: &[Change], ideas: &[Idea], filter: &BoardFilter) -> Board {
    let mut visible: Vec<&Change> = filter_changes(changes, filter)
        .into_iter()
        .filter(|c| c.status != ChangeStatus::Draft)
        .collect();
    sort_changes(&mut visible, filter.sort);
    let ideas = filter_ideas(ideas, filter);

    let mut columns: Vec<Column> = columns(filter.show_archived)
        .into_iter()
        .map(|kind| Column {
            kind,
            items: Vec::new(),
        })
        .collect();

    if let Some(col) = columns.iter_mut().find(|c| c.kind == ColumnKind::Ideas) {
        col.items = ideas.iter().map(|i| BoardItem::Idea((*i).clone())).collect();
    }
    for change in &visible {
        let Some(kind) = ColumnKind::for_status(change.status) else {
            continue;
        };
        if let Some(col) = columns.iter_mut().find(|c| c.kind == kind) {
            col.items.push(BoardItem::Change((*change).clone()));
        }
    }

    Board {
        columns,
        change_count: visible.len(),
        idea_count: ideas.len(),
    }
}

// ---------------------------------------------------------------------------
// Empty state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoSources,
    NoProjectChanges,
    NoSearchResults,
    NoChanges,
}

impl EmptyState {
    pub fn message(self) -> &'static str {
        match self {
            EmptyState::NoSources => "No OpenSpec sources configured",
            EmptyState::NoProjectChanges => "No changes found for this project",
            EmptyState::NoSearchResults => "No changes found matching your search",
            EmptyState::NoChanges => "No changes found",
        }
    }
}

/// The single message to show when the board has nothing on it.
pub fn empty_state(board: &Board, has_sources: bool, filter: &BoardFilter) -> Option<EmptyState> {
    if !board.is_empty() {
        return None;
    }
    Some(if !has_sources {
        EmptyState::NoSources
    } else if filter.source.is_some() {
        EmptyState::NoProjectChanges
    } else if filter.search_active() {
        EmptyState::NoSearchResults
    } else {
        EmptyState::NoChanges
    })
}

// ---------------------------------------------------------------------------
// Memo
// ---------------------------------------------------------------------------

/// Caches the derived board until the changes, the ideas or the filter change.
#[derive(Debug, Default)]
pub struct BoardMemo {
    key: Option<(u64, u64, BoardFilter)>,
    board: Board,
    computations: u64,
}

impl BoardMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(
        &mut self,
        changes: &ListResource<Change>,
        ideas: &ListResource<Idea>,
        filter: &BoardFilter,
    ) -> &Board {
        let fresh = match &self.key {
            Some((c, i, f)) => {
                *c == changes.revision() && *i == ideas.revision() && f == filter
            }
            None => false,
        };
        if !fresh {
            self.board = derive_board(changes.items(), ideas.items(), filter);
            self.key = Some((changes.revision(), ideas.revision(), filter.clone()));
            self.computations += 1;
        }
        &self.board
    }

    /// Last computed board, without checking freshness
    pub fn current(&self) -> &Board {
        &self.board
    }

    /// Number of times the board was actually recomputed
    pub fn computations(&self) -> u64 {
        self.computations
    }
}

// ---------------------------------------------------------------------------
// Search highlighting
// ---------------------------------------------------------------------------

/// Case-insensitive literal matcher for the search text, None when empty.
pub fn search_regex(query: &str) -> Option<Regex> {
    if query.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", regex::escape(query))).ok()
}

/// Byte ranges of every match of `re` in `text`
pub fn match_spans(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}
