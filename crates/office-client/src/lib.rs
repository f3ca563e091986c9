#![allow(non_snake_case)]

pub mod api;
pub mod auth;
pub mod cache;
pub mod clock;
pub mod debounce;
pub mod error;
pub mod http;
pub mod list;
pub mod notify;
pub mod resource;
pub mod session;
pub mod store;
pub mod timer;
pub mod token;
pub mod transport;

pub use api::ApiClient;
pub use auth::AuthService;
pub use clock::{Clock, ManualClock, SystemClock};
pub use debounce::Debouncer;
pub use error::{ClientError, StoreError};
pub use http::HttpTransport;
pub use list::{ListController, ListSnapshot};
pub use notify::{Notification, NotificationCenter, NotificationKind};
pub use resource::Resource;
pub use session::{AuthStatus, SessionEvent, SessionGuard, SessionUser};
pub use store::{KeyValueStorage, MemoryStore, SessionStore, StoredSession};
pub use timer::{Scheduler, TimerHandle};
pub use transport::{ApiReply, ApiRequest, Method, Transport};

#[cfg(feature = "tokio")]
pub use timer::TokioScheduler;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// State behind these locks stays consistent across a panicking listener,
/// so a poisoned lock is simply taken over.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
