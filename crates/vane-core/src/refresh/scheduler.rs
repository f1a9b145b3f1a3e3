use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use crate::refresh::types::TargetId;

/// Handle to one armed refresh timer.
///
/// Stopping cancels future ticks only — a fetch already started by a tick
/// runs to completion. `stop` is idempotent and dropping the handle stops
/// the timer.
pub struct TimerHandle {
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.task.is_none()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Arm a repeating timer for `target`.
///
/// While the gate reports visible, `tick` fires every `period`, starting one
/// full period after arming — never immediately. On a hidden edge the armed
/// ticker is dropped at once so nothing fires while hidden, and skipped
/// ticks do not accumulate. On the visible edge a fresh ticker is armed a
/// full period out; there is no catch-up fire for the hidden stretch.
///
/// `tick` must be cheap and non-blocking: it is expected to spawn the actual
/// fetch as its own task, which keeps in-flight fetches alive across `stop`.
pub fn spawn_timer<F>(
    target: TargetId,
    period: Duration,
    mut visibility: watch::Receiver<bool>,
    tick: F,
) -> TimerHandle
where
    F: Fn() + Send + 'static,
{
    let task = tokio::spawn(async move {
        loop {
            // Suspended: no ticker exists while hidden.
            while !*visibility.borrow() {
                if visibility.changed().await.is_err() {
                    return;
                }
            }

            debug!(
                event = "core.refresh.timer_armed",
                target = %target,
                period_secs = period.as_secs(),
            );
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        debug!(event = "core.refresh.tick", target = %target);
                        tick();
                    }
                    changed = visibility.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        if !*visibility.borrow() {
                            debug!(event = "core.refresh.timer_suspended", target = %target);
                            break;
                        }
                    }
                }
            }
        }
    });

    TimerHandle { task: Some(task) }
}
