//! Site list and settings configuration.
//!
//! The whole app configuration lives in one JSON file (`config.json` under
//! the data directory): the monitored sites with their per-site
//! auto-refresh preferences, site groups, and global settings including the
//! detection sweep cadence. Loads fall back to defaults when the file does
//! not exist; writes go through a temp file and rename.

pub mod defaults;
pub mod operations;
pub mod persistence;
pub mod types;

pub use types::{AppConfig, Settings, SiteConfig, SiteGroup};
