use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::lock;
use crate::timer::{Scheduler, TimerHandle};

struct Pending {
    generation: u64,
    handle: Option<TimerHandle>,
}

struct DebounceInner<T> {
    scheduler: Arc<dyn Scheduler>,
    window: Duration,
    pending: Mutex<Pending>,
    on_settle: Box<dyn Fn(T) + Send + Sync>,
}

/// Single-slot delay: only the latest pushed value survives, and it is
/// delivered once no newer value has arrived for a full window.
pub struct Debouncer<T> {
    inner: Arc<DebounceInner<T>>,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(
        scheduler: Arc<dyn Scheduler>,
        window: Duration,
        on_settle: impl Fn(T) + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(DebounceInner {
                scheduler,
                window,
                pending: Mutex::new(Pending {
                    generation: 0,
                    handle: None,
                }),
                on_settle: Box::new(on_settle),
            }),
        }
    }

    pub fn window(&self) -> Duration {
        self.inner.window
    }

    pub fn push(&self, value: T) {
        let mut pending = lock(&self.inner.pending);
        pending.generation += 1;
        let generation = pending.generation;

        let weak = Arc::downgrade(&self.inner);
        let handle = self.inner.scheduler.schedule(
            self.inner.window,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let current = {
                    let mut pending = lock(&inner.pending);
                    let isCurrent = pending.generation == generation;
                    if isCurrent {
                        if let Some(own) = pending.handle.take() {
                            own.disarm();
                        }
                    }
                    isCurrent
                };
                if current {
                    (inner.on_settle)(value);
                }
            }),
        );

        // dropping the superseded handle cancels its fire
        let previous = pending.handle.replace(handle);
        drop(pending);
        drop(previous);
    }

    /// Drops the pending value, if any.
    pub fn cancel(&self) {
        let previous = {
            let mut pending = lock(&self.inner.pending);
            pending.generation += 1;
            pending.handle.take()
        };
        drop(previous);
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.inner.pending).handle.is_some()
    }
}
