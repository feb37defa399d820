use std::sync::Arc;

use crate::api::ApiError;

/// Handle for one issued fetch. Only the most recently issued ticket of a
/// resource may settle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// Outcome of settling a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// Result applied: collection replaced
    Replaced,
    /// Result applied: error recorded, previous data kept
    Failed,
    /// A newer request was issued (or the key changed); result discarded
    Stale,
}

/// Cached list resource: `{items, loading, error}` plus bookkeeping.
#[derive(Debug, Clone)]
pub struct ListResource<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<Arc<ApiError>>,
    issued: u64,
    revision: u64,
}

impl<T> Default for ListResource<T> {
    fn default() -> Self {
        ListResource {
            items: Vec::new(),
            loading: false,
            error: None,
            issued: 0,
            revision: 0,
        }
    }
}

impl<T> ListResource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_deref()
    }

    /// Bumped every time the collection is replaced
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True once any fetch has succeeded
    pub fn loaded(&self) -> bool {
        self.revision > 0
    }

    /// Mark a fetch as started and hand out its ticket.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.loading = true;
        Ticket(self.issued)
    }

    /// Apply a fetch result if `ticket` is still the latest one issued.
    pub fn settle(&mut self, ticket: Ticket, result: Result<Vec<T>, ApiError>) -> Settled {
        if ticket.0 != self.issued {
            return Settled::Stale;
        }
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
                self.revision += 1;
                Settled::Replaced
            }
            Err(e) => {
                self.error = Some(Arc::new(e));
                Settled::Failed
            }
        }
    }
}

/// Cached detail resource keyed by an optional id.
#[derive(Debug, Clone)]
pub struct DetailResource<T> {
    key: Option<String>,
    item: Option<T>,
    loading: bool,
    error: Option<Arc<ApiError>>,
    issued: u64,
}

impl<T> Default for DetailResource<T> {
    fn default() -> Self {
        DetailResource {
            key: None,
            item: None,
            loading: false,
            error: None,
            issued: 0,
        }
    }
}

impl<T> DetailResource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn item(&self) -> Option<&T> {
        self.item.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_deref()
    }

    /// Point the resource at a new id. Returns the ticket for the fetch that
    /// must be issued, or None when no network call is needed (no id, or the
    /// id is already selected).
    pub fn select(&mut self, id: Option<&str>) -> Option<Ticket> {
        match id {
            None => {
                self.key = None;
                self.item = None;
                self.error = None;
                self.loading = false;
                // Invalidate anything still in flight
                self.issued += 1;
                None
            }
            Some(id) if self.key.as_deref() == Some(id) => None,
            Some(id) => {
                self.key = Some(id.to_string());
                self.item = None;
                self.error = None;
                Some(self.begin())
            }
        }
    }

    /// Re-issue the fetch for the current id, if any.
    pub fn refresh(&mut self) -> Option<(String, Ticket)> {
        let key = self.key.clone()?;
        Some((key, self.begin()))
    }

    fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.loading = true;
        Ticket(self.issued)
    }

    /// Apply a fetch result for `key` if it is still current and latest.
    pub fn settle(&mut self, key: &str, ticket: Ticket, result: Result<T, ApiError>) -> Settled {
        if ticket.0 != self.issued || self.key.as_deref() != Some(key) {
            return Settled::Stale;
        }
        self.loading = false;
        match result {
            Ok(item) => {
                self.item = Some(item);
                self.error = None;
                Settled::Replaced
            }
            Err(e) => {
                self.error = Some(Arc::new(e));
                Settled::Failed
            }
        }
    }
}
