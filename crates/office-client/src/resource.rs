use std::sync::{Arc, Mutex};

use office_types::{DeleteResult, Entity, EntityKind, ListQuery, Page, Validate};
use tracing::{debug, error, warn};

use crate::api::ApiClient;
use crate::cache::QueryCache;
use crate::error::ClientError;
use crate::lock;
use crate::transport::Transport;

type Listener = Arc<dyn Fn(EntityKind) + Send + Sync>;

/// Cache-aware read/write access to one backend collection.
///
/// Successful writes mark every cached list of the collection stale and
/// notify subscribers; failed writes leave the cache alone and return the
/// error untouched. Nothing is retried.
pub struct Resource<E: Entity, T> {
    api: Arc<ApiClient<T>>,
    lists: Mutex<QueryCache<ListQuery, Page<E>>>,
    items: Mutex<QueryCache<i64, E>>,
    listeners: Mutex<Vec<Listener>>,
}

impl<E: Entity, T: Transport> Resource<E, T> {
    pub fn new(api: Arc<ApiClient<T>>) -> Self {
        Self {
            api,
            lists: Mutex::new(QueryCache::new()),
            items: Mutex::new(QueryCache::new()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn kind(&self) -> EntityKind {
        E::KIND
    }

    /// Called after every successful write, and after [`Resource::invalidate`].
    pub fn subscribe(&self, listener: impl Fn(EntityKind) + Send + Sync + 'static) {
        lock(&self.listeners).push(Arc::new(listener));
    }

    /// Page for `query`, served from cache while fresh.
    pub async fn list_page(&self, query: &ListQuery) -> Result<Page<E>, ClientError> {
        if let Some(page) = lock(&self.lists).fresh(query) {
            debug!("{} list cache hit {query:?}", E::KIND);
            return Ok(page);
        }
        self.fetch_page(query).await
    }

    /// Last page seen for `query`, even if stale. Used to keep something on
    /// screen while a refetch is in flight.
    pub fn cached_page(&self, query: &ListQuery) -> Option<Page<E>> {
        lock(&self.lists).peek(query)
    }

    async fn fetch_page(&self, query: &ListQuery) -> Result<Page<E>, ClientError> {
        let ticket = lock(&self.lists).begin(query.clone());
        let fetched = self
            .api
            .get::<Page<E>>(E::KIND.collection_path(), query.to_pairs())
            .await
            .and_then(|response| {
                response.data.ok_or(ClientError::MissingData {
                    status: response.status,
                })
            });

        let mut lists = lock(&self.lists);
        let page = match fetched {
            Ok(page) => page,
            Err(e) => {
                lists.abandon(ticket);
                error!("listing {} failed: {e}", E::KIND);
                return Err(e);
            }
        };
        if lists.complete(ticket, page.clone()) {
            return Ok(page);
        }
        warn!("{} list response for {query:?} superseded", E::KIND);
        Ok(lists.peek(query).unwrap_or(page))
    }

    /// Fetches one record. A missing or zero id is a no-op reporting no data.
    pub async fn get_by_id(&self, id: Option<i64>) -> Result<Option<E>, ClientError> {
        let Some(id) = id.filter(|id| *id != 0) else {
            return Ok(None);
        };
        if let Some(record) = lock(&self.items).fresh(&id) {
            debug!("{} {id} cache hit", E::KIND);
            return Ok(Some(record));
        }

        let ticket = lock(&self.items).begin(id);
        let fetched = self
            .api
            .get::<E>(&E::KIND.item_path(id), Vec::new())
            .await
            .and_then(|response| {
                response.data.ok_or(ClientError::MissingData {
                    status: response.status,
                })
            });

        let mut items = lock(&self.items);
        let record = match fetched {
            Ok(record) => record,
            Err(e) => {
                items.abandon(ticket);
                error!("loading {} {id} failed: {e}", E::KIND);
                return Err(e);
            }
        };
        if items.complete(ticket, record.clone()) {
            return Ok(Some(record));
        }
        Ok(items.peek(&id).or(Some(record)))
    }

    /// Returns the created record when the backend echoes it.
    pub async fn create(&self, draft: &E::Draft) -> Result<Option<E>, ClientError> {
        draft.validate()?;
        let response = self
            .api
            .post::<_, E>(E::KIND.collection_path(), draft)
            .await
            .inspect_err(|e| error!("creating {} failed: {e}", E::KIND))?;

        self.invalidate_lists();
        Ok(response.data)
    }

    pub async fn update(&self, id: i64, patch: &E::Patch) -> Result<Option<E>, ClientError> {
        patch.validate()?;
        let response = self
            .api
            .put::<_, E>(&E::KIND.item_path(id), patch)
            .await
            .inspect_err(|e| error!("updating {} {id} failed: {e}", E::KIND))?;

        {
            let mut items = lock(&self.items);
            items.invalidate(&id);
            if let Some(updated) = &response.data {
                if updated.id() != id {
                    items.invalidate(&updated.id());
                }
            }
        }
        self.invalidate_lists();
        Ok(response.data)
    }

    /// Returns the removed record when the backend echoes it back.
    pub async fn delete(&self, id: i64) -> Result<Option<E>, ClientError> {
        let response = self
            .api
            .delete::<serde_json::Value>(&E::KIND.item_path(id))
            .await
            .inspect_err(|e| error!("deleting {} {id} failed: {e}", E::KIND))?;

        lock(&self.items).remove(&id);
        self.invalidate_lists();

        // the body shape varies between collections; the delete already succeeded
        let removed = response
            .data
            .and_then(|data| serde_json::from_value::<DeleteResult<E>>(data).ok())
            .map(|deleted| deleted.result);
        Ok(removed)
    }

    /// Marks everything cached for this collection stale. Used when another
    /// collection's write changes what this one embeds.
    pub fn invalidate(&self) {
        lock(&self.items).invalidate_all();
        self.invalidate_lists();
    }

    fn invalidate_lists(&self) {
        debug!("invalidating {} lists", E::KIND);
        lock(&self.lists).invalidate_all();
        let listeners = lock(&self.listeners).clone();
        for listener in listeners {
            listener(E::KIND);
        }
    }
}
