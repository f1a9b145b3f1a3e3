//! Visibility-aware auto-refresh timers.
//!
//! One timer drives one refresh target (the whole site list, a single site,
//! or the credit account). Timers fire on a fixed cadence while the host
//! window is visible, suspend entirely while it is hidden, and re-arm a
//! fresh full period on return — there is no catch-up burst for ticks
//! missed while hidden. A tick only *starts* a fetch; it never cancels one.

pub mod registry;
pub mod scheduler;
pub mod types;
pub mod visibility;

pub use registry::RefreshRegistry;
pub use scheduler::{TimerHandle, spawn_timer};
pub use types::{TargetId, TargetKind};
pub use visibility::VisibilityGate;
