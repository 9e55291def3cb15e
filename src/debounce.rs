//! Cancellable delayed invocation for search-as-you-type callers
//!
//! A [`Debouncer`] holds at most one pending task. Scheduling a new task
//! cancels the pending one, so only the last task scheduled within a quiet
//! window runs. A task that has already fired is never interrupted.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

const WAITING: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

struct PendingTask {
    handle: JoinHandle<()>,
    state: Arc<AtomicU8>,
}

impl PendingTask {
    /// Returns true if the task had not fired yet and is now cancelled
    fn cancel(&self) -> bool {
        let cancelled = self
            .state
            .compare_exchange(WAITING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if cancelled {
            self.handle.abort();
        }
        cancelled
    }

    fn is_waiting(&self) -> bool {
        self.state.load(Ordering::Acquire) == WAITING
    }
}

/// Delays a task until input has been quiet for a fixed interval.
///
/// Must be used from within a tokio runtime.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<PendingTask>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `task` to run after the quiet interval, replacing any task
    /// that has not fired yet.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let state = Arc::new(AtomicU8::new(WAITING));
        let task_state = state.clone();
        let delay = self.delay;

        let mut slot = self.pending.lock();
        if let Some(previous) = slot.take() {
            if previous.cancel() {
                trace!("Superseded pending debounced task");
            }
        }

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if task_state
                .compare_exchange(WAITING, FIRED, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                return;
            }
            task.await;
        });

        *slot = Some(PendingTask { handle, state });
    }

    /// Drop the pending task, if it has not fired. Returns whether a task
    /// was cancelled.
    pub fn cancel(&self) -> bool {
        self.pending
            .lock()
            .take()
            .map(|pending| pending.cancel())
            .unwrap_or(false)
    }

    /// Whether a task is waiting for its quiet interval to elapse
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .map(PendingTask::is_waiting)
            .unwrap_or(false)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.get_mut().take() {
            pending.cancel();
        }
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}
