use std::time::Duration;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs one-shot tasks after a delay.
///
/// The browser build schedules through `setTimeout`, native code through
/// tokio. Everything timed in this crate goes through this seam so tests can
/// drive it with a paused clock.
pub trait Scheduler: Send + Sync + 'static {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle;
}

/// A pending task. Dropping the handle cancels the task if it has not run.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Handle with nothing to cancel.
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    pub fn cancel(mut self) {
        self.fire_cancel();
    }

    /// Forgets the task without cancelling it.
    pub fn disarm(mut self) {
        self.cancel = None;
    }

    fn fire_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.fire_cancel();
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(feature = "tokio")]
pub use tokio_scheduler::TokioScheduler;

#[cfg(feature = "tokio")]
mod tokio_scheduler {
    use std::time::Duration;

    use super::{Scheduler, Task, TimerHandle};

    /// Spawns a sleeping task on the ambient tokio runtime.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct TokioScheduler;

    impl Scheduler for TokioScheduler {
        fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
            let runtime = match tokio::runtime::Handle::try_current() {
                Ok(handle) => handle,
                Err(e) => {
                    tracing::warn!("no tokio runtime, task dropped: {e}");
                    return TimerHandle::inert();
                }
            };

            let join = runtime.spawn(async move {
                tokio::time::sleep(delay).await;
                task();
            });
            TimerHandle::new(move || join.abort())
        }
    }
}
