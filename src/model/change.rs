use serde::{Deserialize, Serialize};

/// Lifecycle status of a change, as reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    Draft,
    Todo,
    InProgress,
    Done,
    Archived,
}

impl ChangeStatus {
    /// Human-readable column label
    pub fn label(self) -> &'static str {
        match self {
            ChangeStatus::Draft => "Draft",
            ChangeStatus::Todo => "Todo",
            ChangeStatus::InProgress => "In Progress",
            ChangeStatus::Done => "Done",
            ChangeStatus::Archived => "Archived",
        }
    }

    /// Wire name (`in_progress` etc.)
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeStatus::Draft => "draft",
            ChangeStatus::Todo => "todo",
            ChangeStatus::InProgress => "in_progress",
            ChangeStatus::Done => "done",
            ChangeStatus::Archived => "archived",
        }
    }
}

impl std::fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checkbox counts parsed from a change's tasks.md
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: u32,
    pub done: u32,
}

impl TaskStats {
    /// Fraction of tasks done, in `[0, 1]`. Zero when there are no tasks.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.done as f64 / self.total as f64).clamp(0.0, 1.0)
    }

    /// `done` never exceeds `total` for stats produced by a sane server
    pub fn is_consistent(&self) -> bool {
        self.done <= self.total
    }
}

/// A change as listed on the board (read-only projection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub id: String,
    pub name: String,
    pub source_id: String,
    pub status: ChangeStatus,
    #[serde(default)]
    pub has_proposal: bool,
    #[serde(default)]
    pub has_specs: bool,
    #[serde(default)]
    pub has_tasks: bool,
    #[serde(default)]
    pub has_design: bool,
    #[serde(default)]
    pub task_stats: Option<TaskStats>,
    #[serde(default)]
    pub ready_for_review: bool,
}

impl Change {
    /// Progress used for sorting; changes without tasks count as 0
    pub fn progress(&self) -> f64 {
        self.task_stats.map_or(0.0, |s| s.progress())
    }

    /// Artifacts present in the change folder, in display order
    pub fn artifacts(&self) -> Vec<&'static str> {
        [
            (self.has_proposal, "proposal"),
            (self.has_specs, "specs"),
            (self.has_design, "design"),
        ]
        .into_iter()
        .filter_map(|(present, name)| present.then_some(name))
        .collect()
    }
}

/// A spec file bundled inside a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecContent {
    pub path: String,
    pub content: String,
}

/// Raw tasks.md plus its checkbox counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksContent {
    pub raw: String,
    pub stats: TaskStats,
}

/// Full document expansion of a change, fetched when the change is opened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDetail {
    pub id: String,
    pub name: String,
    pub source_id: String,
    pub status: ChangeStatus,
    #[serde(default)]
    pub proposal: Option<String>,
    #[serde(default)]
    pub design: Option<String>,
    #[serde(default)]
    pub specs: Vec<SpecContent>,
    #[serde(default)]
    pub tasks: Option<TasksContent>,
}
