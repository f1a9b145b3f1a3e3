use crate::errors::VaneError;
use crate::probe::ProbeError;

#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("Site '{name}' already exists")]
    AlreadyExists { name: String },

    #[error("Site '{name}' not found")]
    NotFound { name: String },

    #[error("Site '{name}' is disabled")]
    Disabled { name: String },

    #[error("Probe failed: {source}")]
    Probe {
        #[from]
        source: ProbeError,
    },

    #[error("Config operation failed: {source}")]
    Config {
        #[from]
        source: crate::errors::ConfigError,
    },

    #[error("Failed to persist snapshots: {message}")]
    Persist { message: String },

    #[error("IO operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl VaneError for SiteError {
    fn error_code(&self) -> &'static str {
        match self {
            SiteError::AlreadyExists { .. } => "SITE_ALREADY_EXISTS",
            SiteError::NotFound { .. } => "SITE_NOT_FOUND",
            SiteError::Disabled { .. } => "SITE_DISABLED",
            SiteError::Probe { .. } => "SITE_PROBE_FAILED",
            SiteError::Config { .. } => "SITE_CONFIG_ERROR",
            SiteError::Persist { .. } => "SITE_PERSIST_FAILED",
            SiteError::Io { .. } => "SITE_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            SiteError::AlreadyExists { .. }
                | SiteError::NotFound { .. }
                | SiteError::Disabled { .. }
        )
    }
}
