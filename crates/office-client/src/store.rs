use std::sync::Mutex;

use tracing::warn;

use crate::error::StoreError;
use crate::lock;

pub const TOKEN_KEY: &str = "authToken";
pub const USERNAME_KEY: &str = "authUsername";
pub const ROLE_KEY: &str = "authRole";

/// The three persisted session entries. They are always written together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoredSession {
    pub token: Option<String>,
    pub username: Option<String>,
    pub role: Option<String>,
}

impl StoredSession {
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.username.is_none() && self.role.is_none()
    }
}

/// Durable client-side storage for the session triple.
pub trait SessionStore: Send + Sync + 'static {
    fn load(&self) -> Result<StoredSession, StoreError>;
    fn save(&self, session: &StoredSession) -> Result<(), StoreError>;

    fn clear(&self) -> Result<(), StoreError> {
        self.save(&StoredSession::default())
    }
}

/// Flat string storage such as the browser's `localStorage`, where each
/// entry of the triple lives under its own key.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

const KEYS: [&str; 3] = [TOKEN_KEY, USERNAME_KEY, ROLE_KEY];

pub fn load_entries(storage: &impl KeyValueStorage) -> Result<StoredSession, StoreError> {
    Ok(StoredSession {
        token: storage.get(TOKEN_KEY)?,
        username: storage.get(USERNAME_KEY)?,
        role: storage.get(ROLE_KEY)?,
    })
}

/// Writes the triple key by key. If any write fails, every key is removed
/// so no partial session is left behind.
pub fn save_entries(
    storage: &impl KeyValueStorage,
    session: &StoredSession,
) -> Result<(), StoreError> {
    let values = [&session.token, &session.username, &session.role];
    for (key, value) in KEYS.into_iter().zip(values) {
        let written = match value {
            Some(value) => storage.set(key, value),
            None => storage.remove(key),
        };
        if let Err(e) = written {
            for key in KEYS {
                if let Err(cleanup) = storage.remove(key) {
                    warn!("could not remove {key} after failed write: {cleanup}");
                }
            }
            return Err(StoreError::Write(format!("{key}: {e}")));
        }
    }
    Ok(())
}

#[derive(Default)]
pub struct MemoryStore {
    session: Mutex<StoredSession>,
}

impl MemoryStore {
    pub fn new(session: StoredSession) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }

    pub fn snapshot(&self) -> StoredSession {
        lock(&self.session).clone()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<StoredSession, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, session: &StoredSession) -> Result<(), StoreError> {
        *lock(&self.session) = session.clone();
        Ok(())
    }
}
