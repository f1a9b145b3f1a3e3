//! Config file persistence
//!
//! Reads and writes `config.json` with atomic replace semantics: the new
//! content goes to a temp file first, then a rename swaps it in, so a crash
//! mid-write never leaves a truncated config behind.

use std::fs;
use std::path::Path;

use crate::config::types::AppConfig;
use crate::errors::ConfigError;

/// Load the app config, returning defaults when the file does not exist.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Persist the app config atomically.
pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content =
        serde_json::to_string_pretty(config).map_err(|e| ConfigError::SerializeError {
            message: e.to_string(),
        })?;

    let temp_file = path.with_extension("json.tmp");

    if let Err(e) = fs::write(&temp_file, &content) {
        cleanup_temp_file(&temp_file, &e);
        return Err(ConfigError::IoError { source: e });
    }

    if let Err(e) = fs::rename(&temp_file, path) {
        cleanup_temp_file(&temp_file, &e);
        return Err(ConfigError::IoError { source: e });
    }

    Ok(())
}

fn cleanup_temp_file(temp_file: &Path, original_error: &std::io::Error) {
    if let Err(cleanup_err) = fs::remove_file(temp_file) {
        tracing::warn!(
            event = "core.config.temp_file_cleanup_failed",
            temp_file = %temp_file.display(),
            original_error = %original_error,
            cleanup_error = %cleanup_err,
            message = "Failed to clean up temp file after write error"
        );
    }
}
