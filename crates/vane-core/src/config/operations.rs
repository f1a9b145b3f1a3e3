//! In-memory config edits: site list management and auto-refresh
//! preferences.
//!
//! These functions mutate an [`AppConfig`] and return what changed; callers
//! decide when to persist. Every path that stores an interval clamps it
//! first, so a value below the floor can never reach disk.

use chrono::Utc;

use crate::config::types::{AppConfig, SiteConfig};
use crate::refresh::types::TargetKind;
use crate::sites::errors::SiteError;

/// Add a site. Fails when a site with the same name already exists.
pub fn add_site(config: &mut AppConfig, mut site: SiteConfig) -> Result<(), SiteError> {
    if config.site(&site.name).is_some() {
        return Err(SiteError::AlreadyExists {
            name: site.name.clone(),
        });
    }

    site.auto_refresh_interval = site
        .auto_refresh_interval
        .map(|minutes| TargetKind::Site.clamp_interval(i64::from(minutes)));
    let now = Utc::now();
    site.created_at.get_or_insert(now);
    site.updated_at = Some(now);

    config.sites.push(site);
    touch(config);
    Ok(())
}

/// Remove a site by name, returning the removed record.
pub fn remove_site(config: &mut AppConfig, name: &str) -> Result<SiteConfig, SiteError> {
    let index = config
        .sites
        .iter()
        .position(|site| site.name == name)
        .ok_or_else(|| SiteError::NotFound {
            name: name.to_string(),
        })?;

    let removed = config.sites.remove(index);
    touch(config);
    Ok(removed)
}

/// Save a site's auto-refresh preference.
///
/// The interval is persisted (clamped) even when `enabled` is false, so the
/// user's cadence is restored on re-enable. With no interval given and none
/// stored, the kind default applies. Returns the effective
/// `(enabled, interval)` pair.
pub fn set_site_auto_refresh(
    config: &mut AppConfig,
    name: &str,
    enabled: bool,
    interval_minutes: Option<i64>,
) -> Result<(bool, u32), SiteError> {
    let site = config.site_mut(name).ok_or_else(|| SiteError::NotFound {
        name: name.to_string(),
    })?;

    let interval = match interval_minutes {
        Some(raw) => TargetKind::Site.clamp_interval(raw),
        None => site
            .auto_refresh_interval
            .unwrap_or_else(|| TargetKind::Site.default_interval_minutes()),
    };
    site.auto_refresh = enabled;
    site.auto_refresh_interval = Some(interval);
    site.updated_at = Some(Utc::now());

    touch(config);
    Ok((enabled, interval))
}

/// Toggle a site's auto-refresh flag.
///
/// Only the flag inverts. The stored interval is kept as-is; a site that
/// never had one gets the kind default so the timer has a cadence to use.
pub fn toggle_site_auto_refresh(
    config: &mut AppConfig,
    name: &str,
) -> Result<(bool, u32), SiteError> {
    let site = config.site_mut(name).ok_or_else(|| SiteError::NotFound {
        name: name.to_string(),
    })?;

    let interval = site
        .auto_refresh_interval
        .unwrap_or_else(|| TargetKind::Site.default_interval_minutes());
    site.auto_refresh = !site.auto_refresh;
    site.auto_refresh_interval = Some(interval);
    site.updated_at = Some(Utc::now());

    let enabled = site.auto_refresh;
    touch(config);
    Ok((enabled, interval))
}

/// Save the global detection sweep preference. Returns the effective
/// `(enabled, interval)` pair.
pub fn set_detection_auto_refresh(
    config: &mut AppConfig,
    enabled: bool,
    interval_minutes: Option<i64>,
) -> (bool, u32) {
    if let Some(raw) = interval_minutes {
        config.settings.refresh_interval_minutes = TargetKind::Detection.clamp_interval(raw);
    }
    config.settings.auto_refresh = enabled;
    touch(config);
    (enabled, config.settings.refresh_interval_minutes)
}

/// Record a successful probe: sync time and whether check-in is available.
pub fn mark_synced(config: &mut AppConfig, name: &str, has_checkin: bool) {
    if let Some(site) = config.site_mut(name) {
        site.last_sync_time = Some(Utc::now());
        site.has_checkin = has_checkin;
    }
}

fn touch(config: &mut AppConfig) {
    config.last_updated = Some(Utc::now());
}
