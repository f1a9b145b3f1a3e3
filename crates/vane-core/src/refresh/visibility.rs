use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

/// Foreground/background signal shared by every refresh timer.
///
/// The host environment reports window visibility here; timers subscribe
/// and suspend while hidden. Duplicate reports of the current state are
/// absorbed so subscribers only ever observe actual edges.
#[derive(Clone)]
pub struct VisibilityGate {
    tx: Arc<watch::Sender<bool>>,
}

impl VisibilityGate {
    /// New gate, visible by default.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(true);
        Self { tx: Arc::new(tx) }
    }

    /// Report the host window's visibility. Returns true when this was an
    /// actual edge (the state changed).
    pub fn set_visible(&self, visible: bool) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == visible {
                false
            } else {
                *current = visible;
                true
            }
        });
        if changed {
            debug!(event = "core.refresh.visibility_changed", visible = visible);
        }
        changed
    }

    pub fn is_visible(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_by_default() {
        let gate = VisibilityGate::new();
        assert!(gate.is_visible());
    }

    #[test]
    fn test_set_visible_reports_edges_only() {
        let gate = VisibilityGate::new();
        assert!(!gate.set_visible(true), "no edge: already visible");
        assert!(gate.set_visible(false));
        assert!(!gate.set_visible(false), "no edge: already hidden");
        assert!(gate.set_visible(true));
    }

    #[tokio::test]
    async fn test_subscribers_observe_edges() {
        let gate = VisibilityGate::new();
        let mut rx = gate.subscribe();

        gate.set_visible(false);
        rx.changed().await.unwrap();
        assert!(!*rx.borrow());

        // A duplicate report must not wake the subscriber again.
        gate.set_visible(false);
        assert!(!rx.has_changed().unwrap());
    }
}
