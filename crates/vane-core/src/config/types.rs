use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::defaults;

/// One monitored API-gateway site.
///
/// The auto-refresh preference is part of the site record: `auto_refresh`
/// toggles the per-site timer and `auto_refresh_interval` keeps the user's
/// chosen cadence in minutes. The interval survives disabling so that
/// re-enabling restores it; it is `None` only while the user never picked
/// one, in which case enabling falls back to the kind default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "defaults::new_site_id")]
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default = "defaults::default_enabled")]
    pub enabled: bool,
    #[serde(default = "defaults::default_group_id")]
    pub group: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default)]
    pub auto_refresh: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_refresh_interval: Option<u32>,

    /// Whether the last probe saw a check-in endpoint on this site.
    #[serde(default)]
    pub has_checkin: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_time: Option<DateTime<Utc>>,
}

impl SiteConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: defaults::new_site_id(),
            name: name.into(),
            url: url.into(),
            enabled: true,
            group: defaults::default_group_id(),
            api_key: None,
            access_token: None,
            user_id: None,
            auto_refresh: false,
            auto_refresh_interval: None,
            has_checkin: false,
            created_at: None,
            updated_at: None,
            last_sync_time: None,
        }
    }
}

/// A named group sites can be sorted into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteGroup {
    pub id: String,
    pub name: String,
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Probe timeout in seconds, passed through to the probing collaborator.
    #[serde(default = "defaults::default_timeout_secs")]
    pub timeout_secs: u64,
    /// Probe all sites concurrently during a detection sweep.
    #[serde(default = "defaults::default_enabled")]
    pub concurrent: bool,
    /// Show disabled sites in listings.
    #[serde(default)]
    pub show_disabled: bool,
    /// Run the periodic detection sweep over the whole site list.
    #[serde(default)]
    pub auto_refresh: bool,
    /// Minutes between detection sweeps.
    #[serde(default = "defaults::default_detection_interval")]
    pub refresh_interval_minutes: u32,
}

/// The persisted `config.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "defaults::default_version")]
    pub version: String,
    #[serde(default)]
    pub sites: Vec<SiteConfig>,
    #[serde(default = "defaults::default_groups")]
    pub groups: Vec<SiteGroup>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl AppConfig {
    pub fn site(&self, name: &str) -> Option<&SiteConfig> {
        self.sites.iter().find(|site| site.name == name)
    }

    pub fn site_mut(&mut self, name: &str) -> Option<&mut SiteConfig> {
        self.sites.iter_mut().find(|site| site.name == name)
    }
}
