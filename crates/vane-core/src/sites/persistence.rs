//! Detection snapshot persistence
//!
//! The last successful probe result per site is kept in `snapshots.json` so
//! a restarted app can show data immediately, before the first live probe.
//! The cache is disposable: an unreadable file is logged and treated as
//! empty rather than failing startup.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::sites::errors::SiteError;
use crate::sites::types::DetectionResult;
use crate::store::Snapshot;

pub type SnapshotMap = HashMap<String, Snapshot<DetectionResult>>;

pub fn load_snapshots(path: &Path) -> SnapshotMap {
    if !path.exists() {
        return SnapshotMap::new();
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(
                event = "core.sites.snapshots_read_failed",
                file = %path.display(),
                error = %e,
                message = "Failed to read snapshot cache, starting empty"
            );
            return SnapshotMap::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(snapshots) => snapshots,
        Err(e) => {
            tracing::warn!(
                event = "core.sites.snapshots_invalid_json",
                file = %path.display(),
                error = %e,
                message = "Snapshot cache is corrupt, starting empty"
            );
            SnapshotMap::new()
        }
    }
}

pub fn save_snapshots(path: &Path, snapshots: &SnapshotMap) -> Result<(), SiteError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(snapshots).map_err(|e| SiteError::Persist {
        message: e.to_string(),
    })?;

    let temp_file = path.with_extension("json.tmp");
    if let Err(e) = fs::write(&temp_file, &content) {
        let _ = fs::remove_file(&temp_file);
        return Err(SiteError::Io { source: e });
    }
    if let Err(e) = fs::rename(&temp_file, path) {
        let _ = fs::remove_file(&temp_file);
        return Err(SiteError::Io { source: e });
    }

    Ok(())
}
