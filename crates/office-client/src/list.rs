use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use office_types::{Entity, ListQuery, Page};
use tracing::debug;

use crate::error::ClientError;
use crate::lock;
use crate::resource::Resource;
use crate::transport::Transport;

/// What a paginated table shows.
#[derive(Clone, Debug, PartialEq)]
pub struct ListSnapshot<E> {
    pub query: ListQuery,
    /// Kept across reloads so the table never flashes empty.
    pub page: Option<Page<E>>,
    pub is_fetching: bool,
    pub error: Option<ClientError>,
}

impl<E> ListSnapshot<E> {
    fn new(query: ListQuery) -> Self {
        Self {
            query,
            page: None,
            is_fetching: false,
            error: None,
        }
    }

    pub fn rows(&self) -> &[E] {
        self.page.as_ref().map(|p| p.content.as_slice()).unwrap_or(&[])
    }

    pub fn total_elements(&self) -> u64 {
        self.page.as_ref().map(|p| p.total_elements).unwrap_or(0)
    }

    /// Nothing to show yet and a request in flight.
    pub fn is_initial_load(&self) -> bool {
        self.page.is_none() && self.is_fetching
    }
}

type Listener<E> = Arc<dyn Fn(&ListSnapshot<E>) + Send + Sync>;

/// Drives one list view: tracks the query, keeps the previous page visible
/// while the next one loads, and ignores responses from superseded loads.
pub struct ListController<E: Entity, T> {
    resource: Arc<Resource<E, T>>,
    state: Mutex<ListSnapshot<E>>,
    dispatched: AtomicU64,
    listeners: Mutex<Vec<Listener<E>>>,
}

impl<E: Entity, T: Transport> ListController<E, T> {
    pub fn new(resource: Arc<Resource<E, T>>, query: ListQuery) -> Self {
        Self {
            resource,
            state: Mutex::new(ListSnapshot::new(query)),
            dispatched: AtomicU64::new(0),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Called with every snapshot change: once when a load starts and once
    /// when its result is applied.
    pub fn subscribe(&self, listener: impl Fn(&ListSnapshot<E>) + Send + Sync + 'static) {
        lock(&self.listeners).push(Arc::new(listener));
    }

    pub fn resource(&self) -> &Arc<Resource<E, T>> {
        &self.resource
    }

    pub fn snapshot(&self) -> ListSnapshot<E> {
        lock(&self.state).clone()
    }

    pub fn query(&self) -> ListQuery {
        lock(&self.state).query.clone()
    }

    /// Loads `query`. The returned snapshot reflects the latest dispatched
    /// load, which may not be this one.
    pub async fn load(&self, query: ListQuery) -> ListSnapshot<E> {
        let ticket = self.dispatched.fetch_add(1, Ordering::SeqCst) + 1;
        let pending = {
            let mut state = lock(&self.state);
            if let Some(cached) = self.resource.cached_page(&query) {
                state.page = Some(cached);
            }
            state.query = query.clone();
            state.is_fetching = true;
            state.clone()
        };
        self.publish(&pending);

        let result = self.resource.list_page(&query).await;

        if self.dispatched.load(Ordering::SeqCst) != ticket {
            debug!("{} load {ticket} superseded, dropping result", self.resource.kind());
            return self.snapshot();
        }

        let applied = {
            let mut state = lock(&self.state);
            match result {
                Ok(page) => {
                    state.page = Some(page);
                    state.error = None;
                }
                Err(e) => state.error = Some(e),
            }
            state.is_fetching = false;
            state.clone()
        };
        self.publish(&applied);
        applied
    }

    fn publish(&self, snapshot: &ListSnapshot<E>) {
        let listeners = lock(&self.listeners).clone();
        for listener in listeners {
            listener(snapshot);
        }
    }

    /// Reloads the current query; refetches only if it went stale.
    pub async fn refresh(&self) -> ListSnapshot<E> {
        self.load(self.query()).await
    }

    pub async fn set_page(&self, page: u32) -> ListSnapshot<E> {
        self.load(self.query().with_page(page)).await
    }

    pub async fn set_page_size(&self, size: u32) -> ListSnapshot<E> {
        self.load(self.query().with_size(size)).await
    }

    /// Applies an already-debounced search term, back on page 0.
    pub async fn set_search(&self, term: &str) -> ListSnapshot<E> {
        self.load(self.query().with_search(term)).await
    }
}
