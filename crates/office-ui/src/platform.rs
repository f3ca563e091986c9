//! Host adapters for the client seams. The browser build talks to `window`;
//! server renders stop at the loading state and never arm anything.

use std::future::Future;
use std::sync::Arc;

use office_client::{Clock, Scheduler, SessionStore};

#[cfg(feature = "hydrate")]
pub use browser::{BrowserClock, BrowserScheduler, LocalStore};
#[cfg(not(feature = "hydrate"))]
pub use server::InertScheduler;

#[cfg(feature = "hydrate")]
pub fn scheduler() -> Arc<dyn Scheduler> {
    Arc::new(BrowserScheduler)
}

#[cfg(not(feature = "hydrate"))]
pub fn scheduler() -> Arc<dyn Scheduler> {
    Arc::new(InertScheduler)
}

#[cfg(feature = "hydrate")]
pub fn clock() -> Arc<dyn Clock> {
    Arc::new(BrowserClock)
}

#[cfg(not(feature = "hydrate"))]
pub fn clock() -> Arc<dyn Clock> {
    Arc::new(office_client::SystemClock)
}

#[cfg(feature = "hydrate")]
pub fn session_store() -> Arc<dyn SessionStore> {
    Arc::new(LocalStore)
}

#[cfg(not(feature = "hydrate"))]
pub fn session_store() -> Arc<dyn SessionStore> {
    Arc::new(office_client::MemoryStore::default())
}

/// Runs a client task on the browser event loop.
#[cfg(feature = "hydrate")]
pub fn spawn(task: impl Future<Output = ()> + 'static) {
    wasm_bindgen_futures::spawn_local(task);
}

/// Server renders do not run client tasks.
#[cfg(not(feature = "hydrate"))]
pub fn spawn(task: impl Future<Output = ()> + 'static) {
    drop(task);
}

#[cfg(feature = "hydrate")]
mod browser {
    use std::time::Duration;

    use leptos::logging::error;
    use leptos::prelude::set_timeout_with_handle;
    use office_client::store::{load_entries, save_entries};
    use office_client::timer::Task;
    use office_client::{
        Clock, KeyValueStorage, Scheduler, SessionStore, StoreError, StoredSession, TimerHandle,
    };

    pub struct BrowserScheduler;

    impl Scheduler for BrowserScheduler {
        fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
            match set_timeout_with_handle(task, delay) {
                Ok(handle) => TimerHandle::new(move || handle.clear()),
                Err(e) => {
                    error!("setTimeout failed: {e:?}");
                    TimerHandle::inert()
                }
            }
        }
    }

    pub struct BrowserClock;

    impl Clock for BrowserClock {
        fn now_millis(&self) -> i64 {
            js_sys::Date::now() as i64
        }
    }

    /// `localStorage`, looked up on every call since `Storage` is not `Send`.
    pub struct LocalStore;

    fn unavailable(e: impl std::fmt::Debug) -> StoreError {
        StoreError::Unavailable(format!("{e:?}"))
    }

    struct BrowserStorage(web_sys::Storage);

    impl BrowserStorage {
        fn open() -> Result<Self, StoreError> {
            web_sys::window()
                .ok_or_else(|| StoreError::Unavailable("no window".into()))?
                .local_storage()
                .map_err(unavailable)?
                .map(Self)
                .ok_or_else(|| StoreError::Unavailable("localStorage disabled".into()))
        }
    }

    impl KeyValueStorage for BrowserStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.get_item(key).map_err(unavailable)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.0.set_item(key, value).map_err(unavailable)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.0.remove_item(key).map_err(unavailable)
        }
    }

    impl SessionStore for LocalStore {
        fn load(&self) -> Result<StoredSession, StoreError> {
            load_entries(&BrowserStorage::open()?)
        }

        fn save(&self, session: &StoredSession) -> Result<(), StoreError> {
            save_entries(&BrowserStorage::open()?, session)
        }
    }
}

#[cfg(not(feature = "hydrate"))]
mod server {
    use std::time::Duration;

    use office_client::timer::Task;
    use office_client::{Scheduler, TimerHandle};

    /// Drops every task. Nothing scheduled during a server render is ever due.
    pub struct InertScheduler;

    impl Scheduler for InertScheduler {
        fn schedule(&self, _delay: Duration, task: Task) -> TimerHandle {
            drop(task);
            TimerHandle::inert()
        }
    }
}
