use serde::Serialize;

use crate::model::{Change, ChangeDetail, Idea, ServerConfig, Source, Spec, SpecDetail};
use crate::ops::board::{Board, BoardItem};
use crate::ops::specs;
use crate::sync::LiveEvent;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

/// One line of `watch --json`
#[derive(Serialize)]
pub struct LiveEventJson {
    pub event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

pub fn live_event_to_json(event: &LiveEvent) -> LiveEventJson {
    let (name, reason) = match event {
        LiveEvent::Opened => ("connected", None),
        LiveEvent::Update => ("update", None),
        LiveEvent::Failed(reason) => ("disconnected", Some(reason.clone())),
        LiveEvent::Reconnecting => ("reconnecting", None),
    };
    LiveEventJson {
        event: name,
        reason,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

pub fn format_source_line(source: &Source) -> String {
    let marker = if source.valid { "" } else { "  (not found)" };
    format!("{}  {}  {}{}", source.id, source.name, source.path, marker)
}

/// `[in_progress] proj-a/add-auth  3/5  proposal specs  review`
pub fn format_change_line(change: &Change) -> String {
    let mut line = format!("[{}] {}", change.status, change.id);
    if let Some(stats) = change.task_stats
        && stats.total > 0
    {
        line.push_str(&format!("  {}/{}", stats.done, stats.total));
    }
    let artifacts = change.artifacts();
    if !artifacts.is_empty() {
        line.push_str("  ");
        line.push_str(&artifacts.join(" "));
    }
    if change.ready_for_review {
        line.push_str("  review");
    }
    line
}

pub fn format_idea_line(idea: &Idea) -> String {
    match &idea.project_id {
        Some(project) => format!("{}  {}  ({})", idea.id, idea.title, project),
        None => format!("{}  {}", idea.id, idea.title),
    }
}

/// Board as one block per column
pub fn format_board(board: &Board) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, column) in board.columns.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("{} ({})", column.kind.label(), column.items.len()));
        for item in &column.items {
            lines.push(match item {
                BoardItem::Change(change) => format!("  {}", format_change_line(change)),
                BoardItem::Idea(idea) => format!("  {}", format_idea_line(idea)),
            });
        }
    }
    lines
}

pub fn format_change_detail(detail: &ChangeDetail) -> Vec<String> {
    let mut lines = vec![
        detail.name.clone(),
        format!("id: {}", detail.id),
        format!("source: {}", detail.source_id),
        format!("status: {}", detail.status),
    ];
    if let Some(tasks) = &detail.tasks {
        lines.push(format!("tasks: {}/{}", tasks.stats.done, tasks.stats.total));
    }

    let mut section = |title: &str, body: &str| {
        lines.push(String::new());
        lines.push(format!("## {title}"));
        lines.extend(body.trim_end().lines().map(str::to_string));
    };
    if let Some(proposal) = &detail.proposal {
        section("Proposal", proposal);
    }
    if let Some(design) = &detail.design {
        section("Design", design);
    }
    for spec in &detail.specs {
        section(&format!("Spec: {}", spec.path), &spec.content);
    }
    if let Some(tasks) = &detail.tasks {
        section("Tasks", &tasks.raw);
    }
    lines
}

/// Specs grouped under their source id
pub fn format_spec_groups(list: &[Spec], source: Option<&str>) -> Vec<String> {
    let groups = specs::group_specs(list, source);
    if groups.is_empty() {
        return vec![specs::empty_message(source).to_string()];
    }
    let mut lines = Vec::new();
    for (source_id, group) in groups {
        lines.push(source_id.to_string());
        for spec in group {
            lines.push(format!("  {}  {}", spec.id, specs::spec_title(spec)));
        }
    }
    lines
}

pub fn format_spec_detail(spec: &SpecDetail) -> Vec<String> {
    let mut lines = vec![format!("# {}", spec.path), String::new()];
    lines.extend(spec.content.trim_end().lines().map(str::to_string));
    lines
}

pub fn format_config(config: &ServerConfig) -> Vec<String> {
    let mut lines = vec![format!("port: {}", config.port)];
    if config.sources.is_empty() {
        lines.push("sources: (none)".to_string());
    } else {
        lines.push("sources:".to_string());
        for s in &config.sources {
            lines.push(format!("  {}  {}", s.name, s.path));
        }
    }
    lines
}

pub fn format_live_event(event: &LiveEvent) -> String {
    match event {
        LiveEvent::Opened => "connected".to_string(),
        LiveEvent::Update => "update".to_string(),
        LiveEvent::Failed(reason) => format!("disconnected: {reason}"),
        LiveEvent::Reconnecting => "reconnecting".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChangeStatus, TaskStats};
    use crate::ops::board::{BoardFilter, derive_board};
    use insta::assert_snapshot;

    fn change(id: &str, status: ChangeStatus, stats: Option<TaskStats>) -> Change {
        Change {
            id: format!("a/{id}"),
            name: id.into(),
            source_id: "a".into(),
            status,
            has_proposal: true,
            has_specs: false,
            has_tasks: stats.is_some(),
            has_design: false,
            task_stats: stats,
            ready_for_review: false,
        }
    }

    #[test]
    fn change_line() {
        let mut c = change(
            "add-auth",
            ChangeStatus::InProgress,
            Some(TaskStats { total: 5, done: 3 }),
        );
        c.ready_for_review = true;
        c.has_design = true;
        assert_eq!(
            format_change_line(&c),
            "[in_progress] a/add-auth  3/5  proposal design  review"
        );
        let mut c = change("draft-x", ChangeStatus::Draft, None);
        c.has_proposal = false;
        assert_eq!(format_change_line(&c), "[draft] a/draft-x");
    }

    #[test]
    fn board_text() {
        let changes = vec![
            change("b-change", ChangeStatus::Todo, None),
            change("a-change", ChangeStatus::Todo, Some(TaskStats { total: 2, done: 0 })),
            change("shipped", ChangeStatus::Done, Some(TaskStats { total: 1, done: 1 })),
        ];
        let board = derive_board(&changes, &[], &BoardFilter::default());
        assert_snapshot!(format_board(&board).join("\n"), @r"
        Ideas (0)

        Todo (2)
          [todo] a/a-change  0/2  proposal
          [todo] a/b-change  proposal

        In Progress (0)

        Done (1)
          [done] a/shipped  1/1  proposal
        ");
    }

    #[test]
    fn live_event_json() {
        let json = serde_json::to_string(&live_event_to_json(&LiveEvent::Failed("reset".into())))
            .unwrap();
        assert_eq!(json, r#"{"event":"disconnected","reason":"reset"}"#);
        let json = serde_json::to_string(&live_event_to_json(&LiveEvent::Update)).unwrap();
        assert_eq!(json, r#"{"event":"update"}"#);
    }

    #[test]
    fn spec_groups_or_empty_message() {
        assert_eq!(format_spec_groups(&[], Some("x")), vec!["No specs found for selected project"]);
        let list = vec![Spec {
            id: "a/auth".into(),
            source_id: "a".into(),
            path: "auth/spec.md".into(),
        }];
        assert_eq!(format_spec_groups(&list, None), vec!["a", "  a/auth  auth"]);
    }
}
