//! Default implementations for configuration types.
//!
//! Contains all `Default` implementations and the helper functions serde
//! uses for missing fields, so a hand-edited or old config file still loads
//! with sensible values.

use crate::config::types::{AppConfig, Settings, SiteGroup};
use crate::refresh::types::TargetKind;

/// Schema version written into new config files.
pub fn default_version() -> String {
    "2".to_string()
}

pub fn new_site_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn default_enabled() -> bool {
    true
}

pub fn default_group_id() -> String {
    "default".to_string()
}

/// Probe timeout in seconds (10s).
pub fn default_timeout_secs() -> u64 {
    10
}

/// Detection sweep cadence when the user never chose one. Shared with the
/// scheduler's clamp through [`TargetKind`].
pub fn default_detection_interval() -> u32 {
    TargetKind::Detection.default_interval_minutes()
}

pub fn default_groups() -> Vec<SiteGroup> {
    vec![SiteGroup {
        id: default_group_id(),
        name: "Default".to_string(),
    }]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            concurrent: true,
            show_disabled: false,
            auto_refresh: false,
            refresh_interval_minutes: default_detection_interval(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            sites: Vec::new(),
            groups: default_groups(),
            settings: Settings::default(),
            last_updated: None,
        }
    }
}
