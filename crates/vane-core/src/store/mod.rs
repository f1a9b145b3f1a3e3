//! Last-known-good snapshot caching.
//!
//! Every refresh target keeps its most recent successful payload in a
//! [`SnapshotCell`], served synchronously on cold start and replaced only
//! when a fetch succeeds. A failed fetch records an error message but never
//! clobbers good data. The cell also owns the single in-flight guard that
//! keeps scheduler ticks and manual refreshes from overlapping.

mod snapshot;

pub use snapshot::{RefreshOutcome, Snapshot, SnapshotCell};
