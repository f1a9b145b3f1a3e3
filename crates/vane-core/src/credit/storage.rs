//! Credit storage persistence
//!
//! Config, cached data sets and the session cookie string all live in one
//! `credit.json` under the data directory, written atomically. A missing or
//! unreadable file yields defaults — the user just isn't logged in yet.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::credit::errors::CreditError;
use crate::credit::types::{CreditConfig, CreditInfo, DailyStats, TransactionList};
use crate::store::Snapshot;

/// The persisted `credit.json` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditStorage {
    #[serde(default)]
    pub config: CreditConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_info: Option<Snapshot<CreditInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_daily_stats: Option<Snapshot<DailyStats>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_transactions: Option<Snapshot<TransactionList>>,
    /// Opaque session cookies from the login flow. Present means logged in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<String>,
}

pub fn load_storage(path: &Path) -> CreditStorage {
    if !path.exists() {
        return CreditStorage::default();
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(
                event = "core.credit.storage_read_failed",
                file = %path.display(),
                error = %e,
                message = "Failed to read credit storage, using defaults"
            );
            return CreditStorage::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(storage) => storage,
        Err(e) => {
            tracing::warn!(
                event = "core.credit.storage_invalid_json",
                file = %path.display(),
                error = %e,
                message = "Credit storage is corrupt, using defaults"
            );
            CreditStorage::default()
        }
    }
}

pub fn save_storage(path: &Path, storage: &CreditStorage) -> Result<(), CreditError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(storage).map_err(|e| CreditError::Persist {
        message: e.to_string(),
    })?;

    let temp_file = path.with_extension("json.tmp");
    if let Err(e) = fs::write(&temp_file, &content) {
        let _ = fs::remove_file(&temp_file);
        return Err(CreditError::Io { source: e });
    }
    if let Err(e) = fs::rename(&temp_file, path) {
        let _ = fs::remove_file(&temp_file);
        return Err(CreditError::Io { source: e });
    }

    Ok(())
}
