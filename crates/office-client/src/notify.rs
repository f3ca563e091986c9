use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::lock;
use crate::timer::{Scheduler, TimerHandle};

pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
}

type Listener = Arc<dyn Fn(&[Notification]) + Send + Sync>;

#[derive(Default)]
struct CenterState {
    next_id: u64,
    items: Vec<Notification>,
    timers: HashMap<u64, TimerHandle>,
}

struct CenterInner {
    scheduler: Arc<dyn Scheduler>,
    ttl: Duration,
    state: Mutex<CenterState>,
    listeners: Mutex<Vec<Listener>>,
}

/// Process-wide stack of short-lived user messages, in insertion order.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<CenterInner>,
}

impl NotificationCenter {
    pub fn new(scheduler: Arc<dyn Scheduler>, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(CenterInner {
                scheduler,
                ttl,
                state: Mutex::new(CenterState::default()),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Listeners get the full list after every change.
    pub fn subscribe(&self, listener: impl Fn(&[Notification]) + Send + Sync + 'static) {
        lock(&self.inner.listeners).push(Arc::new(listener));
    }

    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> u64 {
        let id = {
            let mut state = lock(&self.inner.state);
            state.next_id += 1;
            let id = state.next_id;
            state.items.push(Notification {
                id,
                message: message.into(),
                kind,
            });

            let weak = Arc::downgrade(&self.inner);
            let handle = self.inner.scheduler.schedule(
                self.inner.ttl,
                Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        NotificationCenter { inner }.remove(id, false);
                    }
                }),
            );
            state.timers.insert(id, handle);
            id
        };
        self.publish();
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.notify(message, NotificationKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.notify(message, NotificationKind::Error)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.notify(message, NotificationKind::Info)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.notify(message, NotificationKind::Warning)
    }

    /// Removes a notification now. Unknown or already removed ids are ignored.
    pub fn dismiss(&self, id: u64) {
        self.remove(id, true);
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        lock(&self.inner.state).items.clone()
    }

    fn remove(&self, id: u64, cancelTimer: bool) {
        let (removed, handle) = {
            let mut state = lock(&self.inner.state);
            let before = state.items.len();
            state.items.retain(|n| n.id != id);
            let handle = state.timers.remove(&id);
            (state.items.len() != before, handle)
        };

        match handle {
            Some(handle) if cancelTimer => handle.cancel(),
            // the timer is the caller, let it finish on its own
            Some(handle) => handle.disarm(),
            None => {}
        }

        if removed {
            self.publish();
        }
    }

    fn publish(&self) {
        let items = self.snapshot();
        let listeners = lock(&self.inner.listeners).clone();
        for listener in listeners {
            listener(&items);
        }
    }
}

#[cfg(all(test, feature = "tokio"))]
mod tests {
    use super::*;
    use crate::timer::TokioScheduler;

    fn center() -> NotificationCenter {
        NotificationCenter::new(Arc::new(TokioScheduler), DEFAULT_TTL)
    }

    #[tokio::test(start_paused = true)]
    async fn expires_after_ttl() {
        let center = center();
        center.success("Marca criada com sucesso!");

        tokio::time::sleep(Duration::from_millis(4999)).await;
        assert_eq!(center.snapshot().len(), 1);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(center.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_is_immediate_and_idempotent() {
        let center = center();
        let first = center.error("Erro ao criar marca.");
        let second = center.info("Sincronizando");

        center.dismiss(first);
        center.dismiss(first);
        center.dismiss(999);

        let remaining = center.snapshot();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second);
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_insertion_order_and_distinct_ids() {
        let center = center();
        let ids: Vec<u64> = ["a", "b", "c"].iter().map(|m| center.warning(*m)).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let messages: Vec<String> = center.snapshot().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn listeners_see_every_change() {
        let center = center();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        center.subscribe(move |items| sink.lock().unwrap().push(items.len()));

        let id = center.success("ok");
        center.dismiss(id);
        center.success("again");
        tokio::time::sleep(Duration::from_secs(6)).await;

        assert_eq!(*seen.lock().unwrap(), vec![1, 0, 1, 0]);
    }
}
