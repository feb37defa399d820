use crate::api::ApiError;
use crate::model::{Change, ChangeDetail, Idea, ServerConfig, Source, Spec, SpecDetail};

use super::dispatch::{Mutation, MutationOutput};
use super::live::LiveStatus;
use super::resource::{DetailResource, ListResource, Settled, Ticket};
use super::{ResourceKind, SyncEvent};

/// Key under which the server config is cached
pub const CONFIG_KEY: &str = "config";

/// What the caller has to do after applying an event
#[derive(Debug)]
pub enum Applied {
    Nothing,
    /// The live channel signalled a change: refetch every list
    RefetchAll,
    /// A mutation finished; caches are untouched and the caller decides what
    /// to refetch
    Mutated(Mutation, Result<MutationOutput, ApiError>),
}

/// All client-side cached server state
#[derive(Debug, Default)]
pub struct Store {
    pub sources: ListResource<Source>,
    pub changes: ListResource<Change>,
    pub specs: ListResource<Spec>,
    pub ideas: ListResource<Idea>,
    pub change_detail: DetailResource<ChangeDetail>,
    pub spec_detail: DetailResource<SpecDetail>,
    pub config: DetailResource<ServerConfig>,
    pub live: LiveStatus,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a fetch for one list resource
    pub fn begin(&mut self, kind: ResourceKind) -> Ticket {
        match kind {
            ResourceKind::Sources => self.sources.begin(),
            ResourceKind::Changes => self.changes.begin(),
            ResourceKind::Specs => self.specs.begin(),
            ResourceKind::Ideas => self.ideas.begin(),
        }
    }

    /// Begin (or restart) loading the server config
    pub fn begin_config(&mut self) -> Option<Ticket> {
        if self.config.key().is_some() {
            self.config.refresh().map(|(_, ticket)| ticket)
        } else {
            self.config.select(Some(CONFIG_KEY))
        }
    }

    /// True while either board collection is still on its first load
    pub fn board_loading(&self) -> bool {
        (self.changes.loading() && !self.changes.loaded())
            || (self.ideas.loading() && !self.ideas.loaded())
    }

    /// First error among the board collections
    pub fn board_error(&self) -> Option<&ApiError> {
        self.changes.error().or(self.ideas.error())
    }

    pub fn apply(&mut self, event: SyncEvent) -> Applied {
        let settled = match event {
            SyncEvent::Sources(t, r) => self.sources.settle(t, r),
            SyncEvent::Changes(t, r) => self.changes.settle(t, r),
            SyncEvent::Specs(t, r) => self.specs.settle(t, r),
            SyncEvent::Ideas(t, r) => self.ideas.settle(t, r),
            SyncEvent::ChangeDetail(key, t, r) => self.change_detail.settle(&key, t, r),
            SyncEvent::SpecDetail(key, t, r) => self.spec_detail.settle(&key, t, r),
            SyncEvent::Config(t, r) => self.config.settle(CONFIG_KEY, t, r),
            SyncEvent::Mutated(mutation, result) => {
                return Applied::Mutated(mutation, result);
            }
            SyncEvent::Live(event) => {
                return if self.live.apply(&event) {
                    Applied::RefetchAll
                } else {
                    Applied::Nothing
                };
            }
        };
        if settled == Settled::Stale {
            tracing::debug!("discarded stale response");
        }
        Applied::Nothing
    }
}
