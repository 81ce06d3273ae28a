//! Debounced, coalescing writer
//!
//! Rapid local mutations are batched into a single durable write after a
//! quiet period. The newest payload always replaces any pending one, so at
//! most one write per burst reaches the store and it carries the last value
//! (last write wins). Timer cancellation uses a generation counter: every
//! `schedule` bumps the generation, and a sleeping flush task that wakes up
//! with a stale generation does nothing.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::error::Result;

/// Quiet period before a scheduled payload is written.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

type WriteFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;
type WriteFn<T> = dyn Fn(T) -> WriteFuture + Send + Sync;

struct Pending<T> {
    payload: Option<T>,
    generation: u64,
}

struct Inner<T> {
    pending: Mutex<Pending<T>>,
    // Serializes writes: one write in flight per writer, never two.
    write_gate: tokio::sync::Mutex<()>,
    write: Box<WriteFn<T>>,
    delay: Duration,
}

impl<T: Send + 'static> Inner<T> {
    fn lock_pending(&self) -> MutexGuard<'_, Pending<T>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take the pending payload and invalidate any outstanding timer.
    fn take_pending(&self) -> Option<T> {
        let mut pending = self.lock_pending();
        pending.generation += 1;
        pending.payload.take()
    }

    async fn write_if_current(&self, generation: u64) {
        let payload = {
            let mut pending = self.lock_pending();
            if pending.generation != generation {
                // Superseded by a newer schedule/flush; let that one run.
                return;
            }
            pending.payload.take()
        };

        // Already flushed: the timer fires as a no-op.
        let Some(payload) = payload else { return };
        self.write_now(payload).await;
    }

    async fn write_now(&self, payload: T) {
        let _gate = self.write_gate.lock().await;
        if let Err(error) = (self.write)(payload).await {
            // Best effort: the local copy already reflects the change, so
            // the failure is logged and dropped rather than retried.
            tracing::warn!("Dropped coalesced write: {error}");
        }
    }
}

/// A stateful coalescing writer for one document type.
///
/// Constructed with a fixed delay and an async write function. Callers hand
/// every new full document state to [`schedule`](Self::schedule); the writer
/// owns the timer and issues at most one write per quiet period. Must be
/// used from within a Tokio runtime.
///
/// Dropping the writer cancels any pending write, so a torn-down owner can
/// never emit a late write; use [`flush`](Self::flush) or
/// [`dispose`](Self::dispose) first when the pending state should survive.
pub struct DebouncedWriter<T> {
    inner: Arc<Inner<T>>,
}

impl<T: Send + 'static> DebouncedWriter<T> {
    /// Create a writer with the given quiet period and write function.
    pub fn new<F, Fut>(delay: Duration, write: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                pending: Mutex::new(Pending {
                    payload: None,
                    generation: 0,
                }),
                write_gate: tokio::sync::Mutex::new(()),
                write: Box::new(move |payload| Box::pin(write(payload))),
                delay,
            }),
        }
    }

    /// Record `payload` as pending and restart the quiet-period timer.
    ///
    /// A payload scheduled before the timer fires simply replaces the
    /// pending one; the superseded timer becomes a no-op.
    pub fn schedule(&self, payload: T) {
        let generation = {
            let mut pending = self.inner.lock_pending();
            pending.payload = Some(payload);
            pending.generation += 1;
            pending.generation
        };

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.delay).await;
            inner.write_if_current(generation).await;
        });
    }

    /// Cancel the timer and write any pending payload immediately.
    ///
    /// Idempotent: a second flush with nothing pending does nothing.
    pub async fn flush(&self) {
        if let Some(payload) = self.inner.take_pending() {
            self.inner.write_now(payload).await;
        }
    }

    /// Detach a best-effort final write of any pending payload.
    ///
    /// The teardown/unload path: the write is spawned and never awaited, so
    /// no confirmation is observed. Prefer [`flush`](Self::flush) when the
    /// caller can still wait.
    pub fn dispose(&self) {
        if let Some(payload) = self.inner.take_pending() {
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move {
                inner.write_now(payload).await;
            });
        }
    }

    /// Whether a payload is waiting for its timer to fire.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.inner.lock_pending().payload.is_some()
    }
}

impl<T> Drop for DebouncedWriter<T> {
    fn drop(&mut self) {
        let mut pending = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        pending.generation += 1;
        pending.payload = None;
    }
}
