use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use crate::refresh::scheduler::{TimerHandle, spawn_timer};
use crate::refresh::types::TargetId;
use crate::refresh::visibility::VisibilityGate;

/// Owns the refresh timers for one group of targets.
///
/// Each service constructs its own registry — there is no process-global
/// timer table, so tests and multiple monitor instances never share state.
/// `attach` tears down any existing timer for the target before arming a
/// new one, which is also how interval changes take effect: no tick with a
/// stale period can fire after a re-attach.
pub struct RefreshRegistry {
    visibility: VisibilityGate,
    timers: Mutex<HashMap<TargetId, TimerHandle>>,
}

impl RefreshRegistry {
    pub fn new(visibility: VisibilityGate) -> Self {
        Self {
            visibility,
            timers: Mutex::new(HashMap::new()),
        }
    }

    pub fn visibility(&self) -> &VisibilityGate {
        &self.visibility
    }

    /// Arm (or re-arm) the timer for `target`.
    ///
    /// Any previous timer for the target is stopped first. When `enabled`
    /// is false this only tears down, leaving the target detached.
    /// The interval is clamped to the target kind's floor.
    ///
    /// Must be called from within a tokio runtime.
    pub fn attach<F>(&self, target: TargetId, enabled: bool, interval_minutes: u32, tick: F)
    where
        F: Fn() + Send + 'static,
    {
        let mut timers = lock(&self.timers);
        if let Some(mut previous) = timers.remove(&target) {
            previous.stop();
        }

        if !enabled {
            debug!(event = "core.refresh.detached", target = %target, reason = "disabled");
            return;
        }

        let minutes = target.kind().clamp_interval(i64::from(interval_minutes));
        let period = target.kind().period(interval_minutes);
        let handle = spawn_timer(target.clone(), period, self.visibility.subscribe(), tick);
        info!(
            event = "core.refresh.attached",
            target = %target,
            interval_minutes = minutes,
        );
        timers.insert(target, handle);
    }

    /// Stop and remove the timer for `target`. No-op when none is armed.
    pub fn detach(&self, target: &TargetId) {
        let mut timers = lock(&self.timers);
        if let Some(mut handle) = timers.remove(target) {
            handle.stop();
            debug!(event = "core.refresh.detached", target = %target, reason = "removed");
        }
    }

    /// Stop every timer (shutdown path).
    pub fn detach_all(&self) {
        let mut timers = lock(&self.timers);
        for (_, mut handle) in timers.drain() {
            handle.stop();
        }
    }

    pub fn is_attached(&self, target: &TargetId) -> bool {
        lock(&self.timers).contains_key(target)
    }

    /// Number of currently armed timers.
    pub fn active_count(&self) -> usize {
        lock(&self.timers).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
