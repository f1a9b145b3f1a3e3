use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last successfully fetched payload for a refresh target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub data: T,
    pub last_updated: DateTime<Utc>,
}

impl<T> Snapshot<T> {
    pub fn now(data: T) -> Self {
        Self {
            data,
            last_updated: Utc::now(),
        }
    }
}

/// Result of a refresh attempt that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The fetch ran and the snapshot was replaced.
    Updated,
    /// Another fetch was already in flight; this attempt was dropped.
    Skipped,
}

struct CellState<T> {
    snapshot: Option<Snapshot<T>>,
    last_error: Option<String>,
}

/// Cached snapshot plus the in-flight guard for one refresh target.
///
/// `refresh` is single-flight: a call arriving while a fetch is outstanding
/// returns [`RefreshOutcome::Skipped`] without invoking the fetch. This one
/// guard serves both scheduler ticks and manual refreshes, so the two can
/// never overlap. A fetch, once started, always runs to completion — there
/// is no cancelled state.
///
/// On success the snapshot and its timestamp are replaced atomically and
/// the error is cleared. On failure the previous snapshot is untouched, the
/// error message is recorded for display, and the error is returned to the
/// caller.
pub struct SnapshotCell<T> {
    state: Mutex<CellState<T>>,
    fetching: AtomicBool,
}

impl<T: Clone> SnapshotCell<T> {
    pub fn new() -> Self {
        Self::seeded(None)
    }

    /// Cell pre-populated from persisted storage, served until the first
    /// live fetch completes.
    pub fn seeded(snapshot: Option<Snapshot<T>>) -> Self {
        Self {
            state: Mutex::new(CellState {
                snapshot,
                last_error: None,
            }),
            fetching: AtomicBool::new(false),
        }
    }

    pub fn cached(&self) -> Option<Snapshot<T>> {
        lock(&self.state).snapshot.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        lock(&self.state).last_error.clone()
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching.load(Ordering::SeqCst)
    }

    /// Replace the snapshot with externally obtained data (login flow),
    /// clearing any recorded error.
    pub fn set_snapshot(&self, data: T) {
        let mut state = lock(&self.state);
        state.snapshot = Some(Snapshot::now(data));
        state.last_error = None;
    }

    /// Drop the cached snapshot and error (logout / entity removed).
    pub fn clear(&self) {
        let mut state = lock(&self.state);
        state.snapshot = None;
        state.last_error = None;
    }

    /// Run one fetch attempt now, unless one is already in flight.
    pub async fn refresh<F, Fut, E>(&self, fetch: F) -> Result<RefreshOutcome, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        if self
            .fetching
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(RefreshOutcome::Skipped);
        }
        let _guard = FetchGuard {
            flag: &self.fetching,
        };

        match fetch().await {
            Ok(data) => {
                let mut state = lock(&self.state);
                state.snapshot = Some(Snapshot::now(data));
                state.last_error = None;
                Ok(RefreshOutcome::Updated)
            }
            Err(error) => {
                let mut state = lock(&self.state);
                state.last_error = Some(error.to_string());
                Err(error)
            }
        }
    }
}

impl<T: Clone> Default for SnapshotCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases the in-flight flag even when the fetch future is dropped.
struct FetchGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_success_replaces_snapshot_and_clears_error() {
        let cell = SnapshotCell::new();

        let failed: Result<_, &str> = cell.refresh(|| async { Err::<u32, _>("down") }).await;
        assert!(failed.is_err());
        assert_eq!(cell.last_error(), Some("down".to_string()));
        assert!(cell.cached().is_none());

        let outcome = cell
            .refresh(|| async { Ok::<_, &str>(17u32) })
            .await
            .unwrap();
        assert_eq!(outcome, RefreshOutcome::Updated);
        assert_eq!(cell.cached().unwrap().data, 17);
        assert_eq!(cell.last_error(), None);
    }

    #[tokio::test]
    async fn test_failure_preserves_previous_snapshot() {
        let cell = SnapshotCell::new();
        cell.refresh(|| async { Ok::<_, &str>(17u32) })
            .await
            .unwrap();

        let failed: Result<_, &str> = cell.refresh(|| async { Err::<u32, _>("down") }).await;
        assert!(failed.is_err());
        assert_eq!(cell.cached().unwrap().data, 17, "stale data still served");
        assert_eq!(cell.last_error(), Some("down".to_string()));
    }

    #[tokio::test]
    async fn test_second_refresh_is_skipped_while_first_in_flight() {
        let cell = Arc::new(SnapshotCell::new());
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let in_flight = {
            let cell = Arc::clone(&cell);
            tokio::spawn(async move {
                cell.refresh(|| async move {
                    let _ = release_rx.await;
                    Ok::<_, &str>(1u32)
                })
                .await
            })
        };
        tokio::task::yield_now().await;
        assert!(cell.is_fetching());

        // Back-to-back second call: dropped, its fetch never runs.
        let second_started = Arc::new(AtomicBool::new(false));
        let started_flag = Arc::clone(&second_started);
        let outcome = cell
            .refresh(|| async move {
                started_flag.store(true, Ordering::SeqCst);
                Ok::<u32, &str>(0)
            })
            .await
            .unwrap();
        assert_eq!(outcome, RefreshOutcome::Skipped);
        assert!(
            !second_started.load(Ordering::SeqCst),
            "second fetch must not start"
        );

        release_tx.send(()).unwrap();
        let first = in_flight.await.unwrap().unwrap();
        assert_eq!(first, RefreshOutcome::Updated);
        assert!(!cell.is_fetching());
    }

    #[tokio::test]
    async fn test_guard_released_after_failure() {
        let cell = SnapshotCell::new();
        let _ = cell.refresh(|| async { Err::<u32, &str>("down") }).await;
        assert!(!cell.is_fetching());

        let outcome = cell
            .refresh(|| async { Ok::<_, &str>(2u32) })
            .await
            .unwrap();
        assert_eq!(outcome, RefreshOutcome::Updated);
    }

    #[tokio::test]
    async fn test_guard_released_when_fetch_future_dropped() {
        let cell = Arc::new(SnapshotCell::<u32>::new());
        let (_held_tx, held_rx) = oneshot::channel::<()>();

        let abandoned = {
            let cell = Arc::clone(&cell);
            tokio::spawn(async move {
                cell.refresh(|| async move {
                    let _ = held_rx.await;
                    Ok::<_, &str>(1u32)
                })
                .await
            })
        };
        tokio::task::yield_now().await;
        assert!(cell.is_fetching());

        abandoned.abort();
        let _ = abandoned.await;
        assert!(!cell.is_fetching());
    }

    #[test]
    fn test_seeded_cell_serves_snapshot_before_any_fetch() {
        let cell = SnapshotCell::seeded(Some(Snapshot::now(99u32)));
        assert_eq!(cell.cached().unwrap().data, 99);
        assert_eq!(cell.last_error(), None);
        assert!(!cell.is_fetching());
    }

    #[test]
    fn test_clear_drops_snapshot_and_error() {
        let cell = SnapshotCell::seeded(Some(Snapshot::now(99u32)));
        cell.clear();
        assert!(cell.cached().is_none());
    }

    #[test]
    fn test_set_snapshot_clears_stale_error() {
        let cell = SnapshotCell::new();
        {
            let mut state = cell.state.lock().unwrap();
            state.last_error = Some("old failure".to_string());
        }
        cell.set_snapshot(5u32);
        assert_eq!(cell.cached().unwrap().data, 5);
        assert_eq!(cell.last_error(), None);
    }
}
