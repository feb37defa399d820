//! Client, dispatcher and live channel against the in-process fake server.

mod common;

use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::timeout;

use openspec_board::api::{ApiClient, ApiError};
use openspec_board::model::{ChangeStatus, IdeaUpdate, SourceConfig};
use openspec_board::ops::validate;
use openspec_board::sync::{
    Applied, ConnectionStatus, Dispatcher, LiveChannel, LiveEvent, Mutation, Request, Store,
    SyncEvent,
};

use common::spawn_server;

const WAIT: Duration = Duration::from_secs(5);

async fn next_event(rx: &mut mpsc::UnboundedReceiver<SyncEvent>) -> SyncEvent {
    timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for sync event")
        .expect("channel closed")
}

async fn next_live(rx: &mut mpsc::UnboundedReceiver<SyncEvent>) -> LiveEvent {
    loop {
        if let SyncEvent::Live(event) = next_event(rx).await {
            return event;
        }
    }
}

#[tokio::test]
async fn reads_every_collection() {
    let server = spawn_server().await;
    let api = ApiClient::new(&server.api).unwrap();

    let sources = api.list_sources().await.unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].name, "Project A");

    let changes = api.list_changes().await.unwrap();
    assert_eq!(changes.len(), 5);
    assert!(changes.iter().any(|c| c.status == ChangeStatus::Draft));

    let specs = api.list_specs().await.unwrap();
    assert_eq!(specs[0].id, "proj-a/auth");
    assert!(api.list_ideas().await.unwrap().is_empty());
    assert_eq!(api.config().await.unwrap().port, 3000);
}

#[tokio::test]
async fn ids_with_slashes_reach_the_server_intact() {
    let server = spawn_server().await;
    let api = ApiClient::new(&server.api).unwrap();

    let detail = api.change("proj-a/fix-cache").await.unwrap();
    assert_eq!(detail.name, "fix-cache");
    assert_eq!(detail.tasks.unwrap().stats.done, 2);

    let spec = api.spec("proj-a/auth").await.unwrap();
    assert!(spec.content.starts_with("# Auth"));
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let server = spawn_server().await;
    let api = ApiClient::new(&server.api).unwrap();

    let err = api.change("proj-a/nope").await.unwrap_err();
    assert!(matches!(err, ApiError::Server { status: 404, .. }));
    assert_eq!(err.to_string(), "Change not found");

    let bad = vec![SourceConfig {
        name: "gone".into(),
        path: "/missing/repo".into(),
    }];
    let err = api.update_sources(&bad).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Source path does not exist");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let api = ApiClient::new("http://127.0.0.1:1/api/").unwrap();
    let err = api.list_changes().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn idea_lifecycle() {
    let server = spawn_server().await;
    let api = ApiClient::new(&server.api).unwrap();

    let body = validate::new_idea("Dark mode", "  keep the spaces ", Some("proj-a")).unwrap();
    let created = api.create_idea(&body).await.unwrap();
    assert_eq!(created.description, "  keep the spaces ");
    assert_eq!(created.project_id.as_deref(), Some("proj-a"));

    let ideas = api.list_ideas().await.unwrap();
    assert_eq!(ideas, vec![created.clone()]);

    let update = IdeaUpdate {
        title: "Dark theme".into(),
        description: String::new(),
    };
    let updated = api.update_idea(&created.id, &update).await.unwrap();
    assert_eq!(updated.title, "Dark theme");

    api.delete_idea(&created.id).await.unwrap();
    assert!(api.list_ideas().await.unwrap().is_empty());
    assert_eq!(api.delete_idea(&created.id).await.unwrap_err().status(), Some(404));
}

#[tokio::test]
async fn dispatcher_fills_the_store() {
    let server = spawn_server().await;
    let api = ApiClient::new(&server.api).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(api, Handle::current(), tx);
    let mut store = Store::new();

    dispatcher.dispatch(&mut store, Request::RefetchAll);
    assert!(store.board_loading());
    for _ in 0..4 {
        store.apply(next_event(&mut rx).await);
    }
    assert!(!store.board_loading());
    assert_eq!(store.changes.items().len(), 5);
    assert_eq!(store.sources.items().len(), 1);
    assert_eq!(store.specs.items().len(), 1);

    dispatcher.dispatch(&mut store, Request::SelectChange(Some("proj-a/fix-cache".into())));
    assert!(store.change_detail.loading());
    store.apply(next_event(&mut rx).await);
    assert_eq!(
        store.change_detail.item().map(|d| d.name.as_str()),
        Some("fix-cache")
    );
}

#[tokio::test]
async fn created_idea_appears_after_refetch() {
    let server = spawn_server().await;
    let api = ApiClient::new(&server.api).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(api, Handle::current(), tx);
    let mut store = Store::new();

    let body = validate::new_idea("Offline mode", "", None).unwrap();
    dispatcher.dispatch(&mut store, Request::Mutate(Mutation::CreateIdea(body)));
    let Applied::Mutated(mutation, result) = store.apply(next_event(&mut rx).await) else {
        panic!("expected a mutation result");
    };
    assert!(result.is_ok());
    // The store never patches locally: the follow-up fetch is authoritative
    assert!(store.ideas.items().is_empty());

    for kind in mutation.affects() {
        dispatcher.dispatch(&mut store, Request::Refetch(*kind));
    }
    store.apply(next_event(&mut rx).await);
    assert_eq!(store.ideas.items().len(), 1);
    assert_eq!(store.ideas.items()[0].title, "Offline mode");
}

#[tokio::test]
async fn live_channel_reports_updates() {
    let server = spawn_server().await;
    let api = ApiClient::new(&server.api).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _live = LiveChannel::spawn(&Handle::current(), api, Duration::from_millis(50), tx);
    let mut store = Store::new();

    let opened = next_live(&mut rx).await;
    assert_eq!(opened, LiveEvent::Opened);
    store.apply(SyncEvent::Live(opened));
    assert_eq!(store.live.status(), ConnectionStatus::Connected);

    server.push_update();
    let update = next_live(&mut rx).await;
    assert_eq!(update, LiveEvent::Update);
    assert!(matches!(store.apply(SyncEvent::Live(update)), Applied::RefetchAll));
}

#[tokio::test]
async fn live_channel_retries_when_server_is_down() {
    let api = ApiClient::new("http://127.0.0.1:1/api/").unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _live = LiveChannel::spawn(&Handle::current(), api, Duration::from_millis(10), tx);
    let mut store = Store::new();

    let failed = next_live(&mut rx).await;
    assert!(matches!(failed, LiveEvent::Failed(_)));
    store.apply(SyncEvent::Live(failed));
    assert_eq!(store.live.status(), ConnectionStatus::Disconnected);

    assert_eq!(next_live(&mut rx).await, LiveEvent::Reconnecting);
}
