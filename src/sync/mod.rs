pub mod dispatch;
pub mod live;
pub mod resource;
pub mod store;

pub use dispatch::{Dispatcher, Mutation, MutationOutput, Request};
pub use live::{ConnectionStatus, LiveChannel, LiveEvent, LiveStatus};
pub use resource::{DetailResource, ListResource, Settled, Ticket};
pub use store::{Applied, Store};

use crate::api::ApiError;
use crate::model::{Change, ChangeDetail, Idea, ServerConfig, Source, Spec, SpecDetail};

/// Which list resource a fetch belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Sources,
    Changes,
    Specs,
    Ideas,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Changes,
        ResourceKind::Specs,
        ResourceKind::Sources,
        ResourceKind::Ideas,
    ];
}

/// Results flowing from network tasks back to the UI thread, where the
/// [`Store`] applies them. Fetch results carry the [`Ticket`] they were
/// issued with so late responses can be discarded.
#[derive(Debug)]
pub enum SyncEvent {
    Sources(Ticket, Result<Vec<Source>, ApiError>),
    Changes(Ticket, Result<Vec<Change>, ApiError>),
    Specs(Ticket, Result<Vec<Spec>, ApiError>),
    Ideas(Ticket, Result<Vec<Idea>, ApiError>),
    ChangeDetail(String, Ticket, Result<ChangeDetail, ApiError>),
    SpecDetail(String, Ticket, Result<SpecDetail, ApiError>),
    Config(Ticket, Result<ServerConfig, ApiError>),
    Mutated(Mutation, Result<MutationOutput, ApiError>),
    Live(LiveEvent),
}
