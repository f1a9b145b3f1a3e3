//! vane-core: Core library for API gateway site monitoring
//!
//! This library provides the business logic for vane: a dashboard that
//! periodically probes a user-configured list of API-gateway sites plus one
//! credit account, and caches the last-known-good data for instant display.
//! It is consumed by UI front-ends and the CLI.
//!
//! # Main Entry Points
//!
//! - [`sites`] - Per-site detection caches and the detection sweep
//! - [`credit`] - Credit account data, login lifecycle, auto-refresh
//! - [`refresh`] - Visibility-aware refresh timers
//! - [`exec`] - Per-handle serialization of browser-automation work
//! - [`config`] - Site list and settings persistence

pub mod config;
pub mod credit;
pub mod errors;
pub mod events;
pub mod exec;
pub mod logging;
pub mod probe;
pub mod refresh;
pub mod sites;
pub mod store;

// Re-export commonly used types at crate root for convenience
pub use config::types::{AppConfig, Settings, SiteConfig, SiteGroup};
pub use credit::CreditService;
pub use credit::types::{
    CreditConfig, CreditConfigPatch, CreditInfo, CreditLoginResult, DailyStatItem, DailyStats,
    TransactionList, TransactionOrder, TransactionStatus,
};
pub use errors::{ConfigError, VaneError};
pub use events::Event;
pub use exec::ExecQueue;
pub use probe::{CreditProber, ProbeError, SiteProber};
pub use refresh::registry::RefreshRegistry;
pub use refresh::types::{TargetId, TargetKind};
pub use refresh::visibility::VisibilityGate;
pub use sites::SiteMonitor;
pub use sites::types::DetectionResult;
pub use store::{RefreshOutcome, Snapshot, SnapshotCell};

// Re-export logging initialization
pub use logging::init_logging;
