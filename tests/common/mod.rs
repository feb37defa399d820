//! In-process fake of the dashboard server for integration tests.
//!
//! Holds everything in memory behind a mutex. Every write broadcasts an
//! `update` signal to connected event-stream clients.

#![allow(dead_code)]

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::routing::{get, put};
use axum::{Json, Router};
use futures_util::Stream;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::broadcast;

use openspec_board::model::{
    Change, ChangeDetail, ChangeStatus, Idea, IdeaUpdate, NewIdea, ServerConfig, Source,
    SourceConfig, Spec, SpecDetail, TaskStats, TasksContent,
};

pub struct FakeState {
    pub sources: Vec<Source>,
    pub changes: Vec<Change>,
    pub details: HashMap<String, ChangeDetail>,
    pub specs: Vec<Spec>,
    pub spec_details: HashMap<String, SpecDetail>,
    pub ideas: Vec<Idea>,
    pub config: ServerConfig,
    next_idea: u64,
}

type Shared = Arc<Mutex<FakeState>>;

#[derive(Clone)]
struct AppState {
    data: Shared,
    updates: broadcast::Sender<()>,
}

pub struct FakeServer {
    /// API base, e.g. `http://127.0.0.1:4312/api/`
    pub api: String,
    /// Server root without the API path
    pub root: String,
    pub state: Shared,
    updates: broadcast::Sender<()>,
}

impl FakeServer {
    /// Signal connected event-stream clients that data changed.
    pub fn push_update(&self) {
        let _ = self.updates.send(());
    }
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;

fn fail(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}

pub fn change(id: &str, status: ChangeStatus, done: u32, total: u32) -> Change {
    Change {
        id: format!("proj-a/{id}"),
        name: id.to_string(),
        source_id: "proj-a".to_string(),
        status,
        has_proposal: true,
        has_specs: false,
        has_tasks: total > 0,
        has_design: false,
        task_stats: (total > 0).then_some(TaskStats { total, done }),
        ready_for_review: false,
    }
}

fn seed() -> FakeState {
    let changes = vec![
        change("fix-cache", ChangeStatus::InProgress, 2, 4),
        change("add-auth", ChangeStatus::Todo, 0, 3),
        change("ship-v1", ChangeStatus::Done, 4, 4),
        change("old-thing", ChangeStatus::Archived, 1, 1),
        change("draft-x", ChangeStatus::Draft, 0, 0),
    ];
    let mut details = HashMap::new();
    details.insert(
        "proj-a/fix-cache".to_string(),
        ChangeDetail {
            id: "proj-a/fix-cache".into(),
            name: "fix-cache".into(),
            source_id: "proj-a".into(),
            status: ChangeStatus::InProgress,
            proposal: Some("# Fix cache\n\nStale entries survive restarts.".into()),
            design: None,
            specs: vec![],
            tasks: Some(TasksContent {
                raw: "- [x] reproduce\n- [x] write test\n- [ ] fix\n- [ ] release".into(),
                stats: TaskStats { total: 4, done: 2 },
            }),
        },
    );
    let specs = vec![Spec {
        id: "proj-a/auth".into(),
        source_id: "proj-a".into(),
        path: "auth/spec.md".into(),
    }];
    let mut spec_details = HashMap::new();
    spec_details.insert(
        "proj-a/auth".to_string(),
        SpecDetail {
            id: "proj-a/auth".into(),
            source_id: "proj-a".into(),
            path: "auth/spec.md".into(),
            content: "# Auth\n\nUsers sign in with a token.".into(),
        },
    );
    FakeState {
        sources: vec![Source {
            id: "proj-a".into(),
            name: "Project A".into(),
            path: "/work/a".into(),
            valid: true,
        }],
        changes,
        details,
        specs,
        spec_details,
        ideas: vec![],
        config: ServerConfig {
            sources: vec![SourceConfig {
                name: "Project A".into(),
                path: "/work/a".into(),
            }],
            port: 3000,
        },
        next_idea: 1,
    }
}

/// Bind on an ephemeral port and serve until the test runtime shuts down.
pub async fn spawn_server() -> FakeServer {
    let state: Shared = Arc::new(Mutex::new(seed()));
    let (updates, _) = broadcast::channel(16);
    let app_state = AppState {
        data: state.clone(),
        updates: updates.clone(),
    };

    let api = Router::new()
        .route("/sources", get(list_sources))
        .route("/changes", get(list_changes))
        .route("/changes/{id}", get(get_change))
        .route("/specs", get(list_specs))
        .route("/specs/{id}", get(get_spec))
        .route("/ideas", get(list_ideas).post(create_idea))
        .route("/ideas/{id}", put(update_idea).delete(delete_idea))
        .route("/config", get(get_config))
        .route("/config/sources", put(update_sources))
        .route("/events", get(events))
        .with_state(app_state);
    let app = Router::new().nest("/api", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let root = format!("http://{}", addr);
    FakeServer {
        api: format!("{}/api/", root),
        root,
        state,
        updates,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn list_sources(State(s): State<AppState>) -> Json<Value> {
    Json(json!({ "sources": s.data.lock().unwrap().sources }))
}

async fn list_changes(State(s): State<AppState>) -> Json<Value> {
    Json(json!({ "changes": s.data.lock().unwrap().changes }))
}

async fn get_change(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<ChangeDetail> {
    s.data
        .lock()
        .unwrap()
        .details
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Change not found"))
}

async fn list_specs(State(s): State<AppState>) -> Json<Value> {
    Json(json!({ "specs": s.data.lock().unwrap().specs }))
}

async fn get_spec(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<SpecDetail> {
    s.data
        .lock()
        .unwrap()
        .spec_details
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Spec not found"))
}

async fn list_ideas(State(s): State<AppState>) -> Json<Value> {
    Json(json!({ "ideas": s.data.lock().unwrap().ideas }))
}

async fn create_idea(State(s): State<AppState>, Json(body): Json<NewIdea>) -> ApiResult<Idea> {
    if body.title.trim().is_empty() {
        return Err(fail(StatusCode::BAD_REQUEST, "Title is required"));
    }
    let idea = {
        let mut data = s.data.lock().unwrap();
        let id = data.next_idea.to_string();
        data.next_idea += 1;
        let idea = Idea {
            id,
            source_id: body.project_id.clone().unwrap_or_default(),
            project_id: body.project_id,
            title: body.title,
            description: body.description,
            created_at: "2025-05-14T09:30:00Z".into(),
            updated_at: "2025-05-14T09:30:00Z".into(),
        };
        data.ideas.push(idea.clone());
        idea
    };
    let _ = s.updates.send(());
    Ok(Json(idea))
}

async fn update_idea(
    State(s): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<IdeaUpdate>,
) -> ApiResult<Idea> {
    let idea = {
        let mut data = s.data.lock().unwrap();
        let Some(idea) = data.ideas.iter_mut().find(|i| i.id == id) else {
            return Err(fail(StatusCode::NOT_FOUND, "Idea not found"));
        };
        idea.title = body.title;
        idea.description = body.description;
        idea.updated_at = "2025-05-15T10:00:00Z".into();
        idea.clone()
    };
    let _ = s.updates.send(());
    Ok(Json(idea))
}

async fn delete_idea(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    {
        let mut data = s.data.lock().unwrap();
        let before = data.ideas.len();
        data.ideas.retain(|i| i.id != id);
        if data.ideas.len() == before {
            return Err(fail(StatusCode::NOT_FOUND, "Idea not found"));
        }
    }
    let _ = s.updates.send(());
    Ok(Json(json!({ "success": true })))
}

async fn get_config(State(s): State<AppState>) -> Json<ServerConfig> {
    Json(s.data.lock().unwrap().config.clone())
}

#[derive(Deserialize)]
struct SourcesBody {
    sources: Vec<SourceConfig>,
}

async fn update_sources(
    State(s): State<AppState>,
    Json(body): Json<SourcesBody>,
) -> ApiResult<ServerConfig> {
    if body.sources.iter().any(|c| c.path.starts_with("/missing")) {
        return Err(fail(StatusCode::BAD_REQUEST, "Source path does not exist"));
    }
    let config = {
        let mut data = s.data.lock().unwrap();
        data.sources = body
            .sources
            .iter()
            .map(|c| Source {
                id: c.name.to_lowercase().replace(' ', "-"),
                name: c.name.clone(),
                path: c.path.clone(),
                valid: true,
            })
            .collect();
        data.config.sources = body.sources;
        data.config.clone()
    };
    let _ = s.updates.send(());
    Ok(Json(config))
}

async fn events(State(s): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = s.updates.subscribe();
    let stream = futures_util::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(()) => {
                    let event = Event::default().event("update").data("update");
                    return Some((Ok(event), rx));
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });
    Sse::new(stream)
}
