use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::oneshot;
use tracing::debug;

/// Completion of the last-submitted task for one handle. Shared so both the
/// successor task and the published chain entry can await it.
type Tail = Shared<BoxFuture<'static, ()>>;

struct Entry {
    /// Sequence number of the task that published this tail. A finishing
    /// task only removes the entry when it is still the newest one.
    seq: u64,
    tail: Tail,
}

/// FIFO task queue keyed by resource handle identity.
///
/// [`ExecQueue::run`] reserves a slot for the handle at call time, so two
/// calls made in order are executed in that order even when their futures
/// are polled concurrently. A task that fails (or is dropped before
/// completion) releases its slot and never blocks the tasks queued behind
/// it; its error is returned only to its own caller.
///
/// The queue holds no reference to the handle itself — entries are keyed by
/// pointer identity and removed as soon as the last task for that handle
/// finishes.
pub struct ExecQueue {
    chains: Arc<Mutex<HashMap<usize, Entry>>>,
    next_seq: AtomicU64,
}

impl ExecQueue {
    pub fn new() -> Self {
        Self {
            chains: Arc::new(Mutex::new(HashMap::new())),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Run `work` after all previously submitted work for `handle` has
    /// finished.
    ///
    /// The returned future resolves to `work`'s output and must be awaited;
    /// dropping it before completion releases its slot so queued successors
    /// still run.
    pub fn run<H, F, Fut, T>(
        &self,
        handle: &Arc<H>,
        work: F,
    ) -> impl Future<Output = T> + use<H, F, Fut, T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let key = Arc::as_ptr(handle) as usize;
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let (done_tx, done_rx) = oneshot::channel::<()>();

        let prev = {
            let mut chains = lock(&self.chains);
            let prev = chains.get(&key).map(|entry| entry.tail.clone());

            // The published tail resolves once the predecessor chain AND this
            // task are both done, so a successor submitted now still waits on
            // the full chain even if this task is dropped early. A closed
            // channel counts as done: failure must not wedge the queue.
            let tail_prev = prev.clone();
            let tail: Tail = async move {
                if let Some(prev) = tail_prev {
                    prev.await;
                }
                let _ = done_rx.await;
            }
            .boxed()
            .shared();

            chains.insert(key, Entry { seq, tail });
            prev
        };

        debug!(event = "core.exec.task_queued", key = key, seq = seq);

        let guard = SlotGuard {
            chains: Arc::clone(&self.chains),
            key,
            seq,
            done: Some(done_tx),
        };

        async move {
            let _guard = guard;
            if let Some(prev) = prev {
                prev.await;
            }
            work().await
        }
    }

    /// Number of handles that currently have queued or running work.
    /// Diagnostics only — entries disappear once a handle's queue drains.
    pub fn tracked_handles(&self) -> usize {
        lock(&self.chains).len()
    }
}

impl Default for ExecQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Signals task completion and prunes the chain entry, even when the task
/// future is dropped before finishing.
struct SlotGuard {
    chains: Arc<Mutex<HashMap<usize, Entry>>>,
    key: usize,
    seq: u64,
    done: Option<oneshot::Sender<()>>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        if let Some(done) = self.done.take() {
            let _ = done.send(());
        }
        let mut chains = lock(&self.chains);
        if let Some(entry) = chains.get(&self.key)
            && entry.seq == self.seq
        {
            chains.remove(&self.key);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
