use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

use crate::api::{ApiClient, ApiError};
use crate::model::{Idea, IdeaUpdate, NewIdea, ServerConfig, SourceConfig};

use super::store::Store;
use super::{ResourceKind, SyncEvent};

/// A server-side write requested by the UI
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreateIdea(NewIdea),
    UpdateIdea { id: String, update: IdeaUpdate },
    DeleteIdea(String),
    UpdateSources(Vec<SourceConfig>),
}

impl Mutation {
    /// Short verb phrase for status messages
    pub fn describe(&self) -> &'static str {
        match self {
            Mutation::CreateIdea(_) => "create idea",
            Mutation::UpdateIdea { .. } => "update idea",
            Mutation::DeleteIdea(_) => "delete idea",
            Mutation::UpdateSources(_) => "save sources",
        }
    }

    /// Resources the server may have changed as a result
    pub fn affects(&self) -> &'static [ResourceKind] {
        match self {
            Mutation::CreateIdea(_) | Mutation::UpdateIdea { .. } | Mutation::DeleteIdea(_) => {
                &[ResourceKind::Ideas]
            }
            Mutation::UpdateSources(_) => &ResourceKind::ALL,
        }
    }

    async fn run(&self, api: &ApiClient) -> Result<MutationOutput, ApiError> {
        match self {
            Mutation::CreateIdea(idea) => api.create_idea(idea).await.map(MutationOutput::Idea),
            Mutation::UpdateIdea { id, update } => {
                api.update_idea(id, update).await.map(MutationOutput::Idea)
            }
            Mutation::DeleteIdea(id) => api.delete_idea(id).await.map(|()| MutationOutput::Deleted),
            Mutation::UpdateSources(sources) => {
                api.update_sources(sources).await.map(MutationOutput::Config)
            }
        }
    }
}

/// Authoritative server payload returned by a mutation
#[derive(Debug, Clone)]
pub enum MutationOutput {
    Idea(Idea),
    Deleted,
    Config(ServerConfig),
}

/// Work the UI asks the sync layer to perform
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    RefetchAll,
    Refetch(ResourceKind),
    SelectChange(Option<String>),
    SelectSpec(Option<String>),
    /// Re-issue the fetch for whichever details are open
    RefreshDetails,
    LoadConfig,
    Mutate(Mutation),
}

/// Turns [`Request`]s into network tasks on the runtime. Ticket bookkeeping
/// happens synchronously against the store before the task is spawned.
#[derive(Clone)]
pub struct Dispatcher {
    api: ApiClient,
    runtime: Handle,
    tx: UnboundedSender<SyncEvent>,
}

impl Dispatcher {
    pub fn new(api: ApiClient, runtime: Handle, tx: UnboundedSender<SyncEvent>) -> Self {
        Dispatcher { api, runtime, tx }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn dispatch(&self, store: &mut Store, request: Request) {
        match request {
            Request::RefetchAll => {
                for kind in ResourceKind::ALL {
                    self.refetch(store, kind);
                }
            }
            Request::Refetch(kind) => self.refetch(store, kind),
            Request::SelectChange(id) => {
                if let Some(ticket) = store.change_detail.select(id.as_deref())
                    && let Some(id) = id
                {
                    self.fetch_change(id, ticket);
                }
            }
            Request::SelectSpec(id) => {
                if let Some(ticket) = store.spec_detail.select(id.as_deref())
                    && let Some(id) = id
                {
                    self.fetch_spec(id, ticket);
                }
            }
            Request::RefreshDetails => {
                if let Some((id, ticket)) = store.change_detail.refresh() {
                    self.fetch_change(id, ticket);
                }
                if let Some((id, ticket)) = store.spec_detail.refresh() {
                    self.fetch_spec(id, ticket);
                }
            }
            Request::LoadConfig => {
                if let Some(ticket) = store.begin_config() {
                    let api = self.api.clone();
                    self.spawn(async move { SyncEvent::Config(ticket, api.config().await) });
                }
            }
            Request::Mutate(mutation) => {
                tracing::info!(action = mutation.describe(), "submitting");
                let api = self.api.clone();
                self.spawn(async move {
                    let result = mutation.run(&api).await;
                    SyncEvent::Mutated(mutation, result)
                });
            }
        }
    }

    fn refetch(&self, store: &mut Store, kind: ResourceKind) {
        let ticket = store.begin(kind);
        let api = self.api.clone();
        match kind {
            ResourceKind::Sources => {
                self.spawn(async move { SyncEvent::Sources(ticket, api.list_sources().await) })
            }
            ResourceKind::Changes => {
                self.spawn(async move { SyncEvent::Changes(ticket, api.list_changes().await) })
            }
            ResourceKind::Specs => {
                self.spawn(async move { SyncEvent::Specs(ticket, api.list_specs().await) })
            }
            ResourceKind::Ideas => {
                self.spawn(async move { SyncEvent::Ideas(ticket, api.list_ideas().await) })
            }
        }
    }

    fn fetch_change(&self, id: String, ticket: super::Ticket) {
        let api = self.api.clone();
        self.spawn(async move {
            let result = api.change(&id).await;
            SyncEvent::ChangeDetail(id, ticket, result)
        });
    }

    fn fetch_spec(&self, id: String, ticket: super::Ticket) {
        let api = self.api.clone();
        self.spawn(async move {
            let result = api.spec(&id).await;
            SyncEvent::SpecDetail(id, ticket, result)
        });
    }

    fn spawn<F>(&self, fut: F)
    where
        F: std::future::Future<Output = SyncEvent> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            // The receiver is gone once the UI has shut down
            let _ = tx.send(fut.await);
        });
    }
}
