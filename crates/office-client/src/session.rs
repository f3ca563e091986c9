use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::lock;
use crate::store::{SessionStore, StoredSession};
use crate::timer::{Scheduler, TimerHandle};
use crate::token::{self, TokenClaims};

/// Longest single timer the guard arms. `setTimeout` overflows a little
/// past 24.8 days; longer lifetimes are covered by re-arming.
const MAX_TIMER_DELAY: Duration = Duration::from_secs(24 * 24 * 60 * 60);

/// Tri-state answer to "is someone signed in".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStatus {
    /// Durable storage has not been read yet.
    Unknown,
    Authenticated,
    Anonymous,
}

impl AuthStatus {
    pub fn as_option(self) -> Option<bool> {
        match self {
            AuthStatus::Unknown => None,
            AuthStatus::Authenticated => Some(true),
            AuthStatus::Anonymous => Some(false),
        }
    }

    pub fn is_authenticated(self) -> bool {
        self == AuthStatus::Authenticated
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionUser {
    pub username: String,
    pub role: String,
}

/// Lifecycle notifications. Navigation is left to whoever listens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A valid session was read back from storage.
    Restored,
    SignedIn,
    /// Cleared through `set_session(None)`.
    Cleared,
    Expired,
    LoggedOut,
    /// A token that could not be decoded was discarded.
    Rejected,
}

impl SessionEvent {
    /// Events after which the composing layer sends the user to the public
    /// entry point.
    pub fn leaves_protected_area(self) -> bool {
        matches!(self, SessionEvent::Expired | SessionEvent::LoggedOut)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: String,
    pub expires_at_seconds: i64,
    pub username: Option<String>,
    pub role: Option<String>,
}

impl Session {
    pub fn user(&self) -> Option<SessionUser> {
        self.username.as_ref().map(|username| SessionUser {
            username: username.clone(),
            role: self.role.clone().unwrap_or_default(),
        })
    }
}

/// Validity of a token at a given instant. Decode failures count as signed out.
pub fn evaluate(token: Option<&str>, nowMillis: i64) -> AuthStatus {
    let Some(token) = token else {
        return AuthStatus::Anonymous;
    };
    match token::decode(token) {
        Ok(claims) if claims.is_valid_at(nowMillis) => AuthStatus::Authenticated,
        Ok(_) => AuthStatus::Anonymous,
        Err(e) => {
            warn!("discarding undecodable session token: {e}");
            AuthStatus::Anonymous
        }
    }
}

type Listener = Arc<dyn Fn(SessionEvent) + Send + Sync>;

#[derive(Default)]
struct GuardState {
    rehydrated: bool,
    session: Option<Session>,
    expiry: Option<TimerHandle>,
    epoch: u64,
}

struct GuardInner {
    store: Arc<dyn SessionStore>,
    scheduler: Arc<dyn Scheduler>,
    clock: Arc<dyn Clock>,
    state: Mutex<GuardState>,
    listeners: Mutex<Vec<Listener>>,
}

/// Owns the process-wide authentication state and its expiry timer.
///
/// Construct one, call [`SessionGuard::init`] once the host is ready to read
/// storage, and either drop every clone or call [`SessionGuard::teardown`] to
/// cancel the pending expiry.
#[derive(Clone)]
pub struct SessionGuard {
    inner: Arc<GuardInner>,
}

impl SessionGuard {
    pub fn new(
        store: Arc<dyn SessionStore>,
        scheduler: Arc<dyn Scheduler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(GuardInner {
                store,
                scheduler,
                clock,
                state: Mutex::new(GuardState::default()),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn subscribe(&self, listener: impl Fn(SessionEvent) + Send + Sync + 'static) {
        lock(&self.inner.listeners).push(Arc::new(listener));
    }

    /// Reads the persisted session back and arms its expiry.
    pub fn init(&self) -> AuthStatus {
        let stored = match self.inner.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!("session storage unreadable, starting signed out: {e}");
                StoredSession::default()
            }
        };

        let event = match stored.token {
            None => {
                self.mark_rehydrated();
                None
            }
            Some(token) => match token::decode(&token) {
                Err(e) => {
                    warn!("stored session token is malformed: {e}");
                    self.clear();
                    Some(SessionEvent::Rejected)
                }
                Ok(claims) => match claims.remaining(self.now()) {
                    None => {
                        info!("stored session already expired");
                        self.clear();
                        Some(SessionEvent::Expired)
                    }
                    Some(remaining) => {
                        let session = Session {
                            token,
                            expires_at_seconds: claims.expires_at_seconds(),
                            username: stored.username,
                            role: stored.role,
                        };
                        info!("session restored, {}s left", remaining.as_secs());
                        self.install(session, remaining);
                        Some(SessionEvent::Restored)
                    }
                },
            },
        };

        if let Some(event) = event {
            self.emit(event);
        }
        self.is_authenticated()
    }

    /// Stores a freshly issued token, or clears everything when `token` is
    /// `None`. Never navigates.
    pub fn set_session(&self, token: Option<String>, user: Option<SessionUser>) -> AuthStatus {
        let Some(token) = token else {
            self.end(SessionEvent::Cleared);
            return AuthStatus::Anonymous;
        };

        let claims = match token::decode(&token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("refusing undecodable token: {e}");
                self.end(SessionEvent::Rejected);
                return AuthStatus::Anonymous;
            }
        };
        let Some(remaining) = claims.remaining(self.now()) else {
            warn!("refusing token that is already expired");
            self.end(SessionEvent::Expired);
            return AuthStatus::Anonymous;
        };

        let (username, role) = resolve_subject(user, &claims);
        let stored = StoredSession {
            token: Some(token.clone()),
            username: username.clone(),
            role: role.clone(),
        };
        if let Err(e) = self.inner.store.save(&stored) {
            warn!("failed to persist session: {e}");
        }

        self.install(
            Session {
                token,
                expires_at_seconds: claims.expires_at_seconds(),
                username,
                role,
            },
            remaining,
        );
        info!("signed in, session valid for {}s", remaining.as_secs());
        self.emit(SessionEvent::SignedIn);
        AuthStatus::Authenticated
    }

    pub fn is_authenticated(&self) -> AuthStatus {
        let state = lock(&self.inner.state);
        if !state.rehydrated {
            return AuthStatus::Unknown;
        }
        evaluate(state.session.as_ref().map(|s| s.token.as_str()), self.now())
    }

    /// Clears the session unconditionally; listeners take the user out.
    pub fn logout(&self) {
        info!("logging out");
        self.end(SessionEvent::LoggedOut);
    }

    /// Cancels the pending expiry without touching the session.
    pub fn teardown(&self) {
        let pending = lock(&self.inner.state).expiry.take();
        if let Some(handle) = pending {
            debug!("session guard torn down, expiry timer cancelled");
            handle.cancel();
        }
    }

    pub fn token(&self) -> Option<String> {
        lock(&self.inner.state)
            .session
            .as_ref()
            .map(|s| s.token.clone())
    }

    pub fn session(&self) -> Option<Session> {
        lock(&self.inner.state).session.clone()
    }

    pub fn user(&self) -> Option<SessionUser> {
        lock(&self.inner.state)
            .session
            .as_ref()
            .and_then(Session::user)
    }

    fn now(&self) -> i64 {
        self.inner.clock.now_millis()
    }

    fn mark_rehydrated(&self) {
        lock(&self.inner.state).rehydrated = true;
    }

    fn install(&self, session: Session, remaining: Duration) {
        let mut state = lock(&self.inner.state);
        state.epoch += 1;
        let handle = self.arm(remaining, state.epoch);
        state.rehydrated = true;
        state.session = Some(session);
        // replacing the handle cancels any previous expiry
        state.expiry = Some(handle);
    }

    fn arm(&self, remaining: Duration, epoch: u64) -> TimerHandle {
        let clamped = remaining > MAX_TIMER_DELAY;
        let delay = remaining.min(MAX_TIMER_DELAY);
        let weak = Arc::downgrade(&self.inner);
        self.inner.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    SessionGuard { inner }.on_expiry_timer(epoch, clamped);
                }
            }),
        )
    }

    fn on_expiry_timer(&self, epoch: u64, clamped: bool) {
        let mut state = lock(&self.inner.state);
        if state.epoch != epoch {
            return;
        }

        if clamped {
            let remaining = state
                .session
                .as_ref()
                .and_then(|s| token::decode(&s.token).ok())
                .and_then(|claims| claims.remaining(self.now()));
            if let Some(remaining) = remaining {
                debug!("re-arming long session expiry, {}s left", remaining.as_secs());
                state.epoch += 1;
                let handle = self.arm(remaining, state.epoch);
                if let Some(own) = state.expiry.replace(handle) {
                    own.disarm();
                }
                return;
            }
        }

        if let Some(own) = state.expiry.take() {
            own.disarm();
        }
        drop(state);
        info!("session expired");
        self.end(SessionEvent::Expired);
    }

    fn clear(&self) {
        let pending = {
            let mut state = lock(&self.inner.state);
            state.epoch += 1;
            state.rehydrated = true;
            state.session = None;
            state.expiry.take()
        };
        drop(pending);

        if let Err(e) = self.inner.store.clear() {
            warn!("failed to clear persisted session: {e}");
        }
    }

    fn end(&self, event: SessionEvent) {
        self.clear();
        self.emit(event);
    }

    fn emit(&self, event: SessionEvent) {
        let listeners = lock(&self.inner.listeners).clone();
        for listener in listeners {
            listener(event);
        }
    }
}

fn resolve_subject(
    user: Option<SessionUser>,
    claims: &TokenClaims,
) -> (Option<String>, Option<String>) {
    match user {
        Some(user) => (Some(user.username), Some(user.role)),
        None => (
            claims.username.clone().or_else(|| claims.sub.clone()),
            claims.role.clone(),
        ),
    }
}

#[cfg(all(test, feature = "tokio"))]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;
    use crate::timer::TokioScheduler;
    use crate::token::encode_for_test;

    const NOW: i64 = 1_700_000_000;

    struct Fixture {
        guard: SessionGuard,
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        events: Arc<Mutex<Vec<SessionEvent>>>,
    }

    fn fixture(stored: StoredSession) -> Fixture {
        let store = Arc::new(MemoryStore::new(stored));
        let clock = Arc::new(ManualClock::at_seconds(NOW));
        let guard = SessionGuard::new(store.clone(), Arc::new(TokioScheduler), clock.clone());
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        guard.subscribe(move |event| sink.lock().unwrap().push(event));
        Fixture {
            guard,
            store,
            clock,
            events,
        }
    }

    fn token_expiring_in(seconds: i64) -> String {
        encode_for_test(&json!({ "exp": NOW + seconds, "username": "ana", "role": "ADMIN" }))
    }

    fn stored(token: &str) -> StoredSession {
        StoredSession {
            token: Some(token.to_string()),
            username: Some("ana".into()),
            role: Some("ADMIN".into()),
        }
    }

    #[test]
    fn evaluate_is_pure() {
        let token = token_expiring_in(60);
        assert_eq!(evaluate(Some(&token), NOW * 1000), AuthStatus::Authenticated);
        assert_eq!(evaluate(Some(&token), (NOW + 60) * 1000), AuthStatus::Anonymous);
        assert_eq!(evaluate(Some("garbage"), NOW * 1000), AuthStatus::Anonymous);
        assert_eq!(evaluate(None, NOW * 1000), AuthStatus::Anonymous);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_until_rehydrated() {
        let f = fixture(stored(&token_expiring_in(600)));
        assert_eq!(f.guard.is_authenticated(), AuthStatus::Unknown);
        assert_eq!(f.guard.init(), AuthStatus::Authenticated);
        assert_eq!(f.guard.user().unwrap().role, "ADMIN");
        assert_eq!(*f.events.lock().unwrap(), vec![SessionEvent::Restored]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_storage_is_anonymous_without_events() {
        let f = fixture(StoredSession::default());
        assert_eq!(f.guard.init(), AuthStatus::Anonymous);
        assert!(f.events.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_storage_is_cleared_on_init() {
        let f = fixture(stored(&token_expiring_in(-5)));
        assert_eq!(f.guard.init(), AuthStatus::Anonymous);
        assert!(f.store.snapshot().is_empty());
        assert_eq!(*f.events.lock().unwrap(), vec![SessionEvent::Expired]);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_storage_is_rejected() {
        let f = fixture(stored("not-a-token"));
        assert_eq!(f.guard.init(), AuthStatus::Anonymous);
        assert!(f.store.snapshot().is_empty());
        assert_eq!(*f.events.lock().unwrap(), vec![SessionEvent::Rejected]);
    }

    #[tokio::test(start_paused = true)]
    async fn restored_session_expires_on_time() {
        let f = fixture(stored(&token_expiring_in(90)));
        f.guard.init();

        tokio::time::sleep(Duration::from_secs(89)).await;
        assert_eq!(f.guard.is_authenticated(), AuthStatus::Authenticated);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(f.guard.is_authenticated(), AuthStatus::Anonymous);
        assert!(f.store.snapshot().is_empty());
        assert_eq!(
            *f.events.lock().unwrap(),
            vec![SessionEvent::Restored, SessionEvent::Expired]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_and_logout_drop_all_three_entries() {
        let f = fixture(StoredSession::default());
        f.guard.init();
        f.guard.set_session(
            Some(token_expiring_in(600)),
            Some(SessionUser {
                username: "bruno".into(),
                role: "USER".into(),
            }),
        );
        assert_eq!(f.store.snapshot().username.as_deref(), Some("bruno"));

        f.guard.set_session(None, None);
        assert!(f.store.snapshot().is_empty());
        assert!(f.guard.token().is_none());

        f.guard.set_session(Some(token_expiring_in(600)), None);
        assert_eq!(f.store.snapshot().username.as_deref(), Some("ana"));
        f.guard.logout();
        assert!(f.store.snapshot().is_empty());
        assert_eq!(f.guard.is_authenticated(), AuthStatus::Anonymous);

        let events = f.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                SessionEvent::SignedIn,
                SessionEvent::Cleared,
                SessionEvent::SignedIn,
                SessionEvent::LoggedOut
            ]
        );
        assert!(events[3].leaves_protected_area());
        assert!(!events[1].leaves_protected_area());
    }

    #[tokio::test(start_paused = true)]
    async fn undecodable_token_is_never_an_error() {
        let f = fixture(StoredSession::default());
        f.guard.init();
        assert_eq!(
            f.guard.set_session(Some("x.y.z".into()), None),
            AuthStatus::Anonymous
        );
        assert!(f.store.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn absurd_expiry_counts_as_expired() {
        let ancient = encode_for_test(&json!({ "exp": -1e300, "username": "ana" }));
        let f = fixture(stored(&ancient));
        assert_eq!(f.guard.init(), AuthStatus::Anonymous);
        assert!(f.store.snapshot().is_empty());

        assert_eq!(f.guard.set_session(Some(ancient), None), AuthStatus::Anonymous);
        assert_eq!(
            *f.events.lock().unwrap(),
            vec![SessionEvent::Expired, SessionEvent::Expired]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_cancels_expiry() {
        let f = fixture(stored(&token_expiring_in(30)));
        f.guard.init();
        f.guard.teardown();

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(*f.events.lock().unwrap(), vec![SessionEvent::Restored]);
        assert!(f.guard.token().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn replacing_session_cancels_previous_expiry() {
        let f = fixture(StoredSession::default());
        f.guard.init();
        f.guard.set_session(Some(token_expiring_in(10)), None);
        f.guard.set_session(Some(token_expiring_in(100)), None);

        tokio::time::sleep(Duration::from_secs(20)).await;
        f.clock.advance(Duration::from_secs(20));
        assert_eq!(f.guard.is_authenticated(), AuthStatus::Authenticated);
    }

    #[tokio::test(start_paused = true)]
    async fn long_lifetimes_are_rearmed() {
        let thirtyDays = 30 * 24 * 60 * 60;
        let f = fixture(stored(&token_expiring_in(thirtyDays)));
        f.guard.init();

        let first = MAX_TIMER_DELAY + Duration::from_secs(1);
        f.clock.advance(first);
        tokio::time::sleep(first).await;
        assert_eq!(f.guard.is_authenticated(), AuthStatus::Authenticated);

        let rest = Duration::from_secs(thirtyDays as u64) - first + Duration::from_secs(1);
        f.clock.advance(rest);
        tokio::time::sleep(rest).await;
        assert_eq!(f.guard.is_authenticated(), AuthStatus::Anonymous);
        assert_eq!(f.events.lock().unwrap().last(), Some(&SessionEvent::Expired));
    }
}
