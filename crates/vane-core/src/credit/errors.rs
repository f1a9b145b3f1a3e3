use crate::errors::VaneError;
use crate::probe::ProbeError;

#[derive(Debug, thiserror::Error)]
pub enum CreditError {
    #[error("Not logged in to the credit account")]
    NotLoggedIn,

    #[error("Probe failed: {source}")]
    Probe {
        #[from]
        source: ProbeError,
    },

    #[error("Failed to persist credit storage: {message}")]
    Persist { message: String },

    #[error("IO operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl VaneError for CreditError {
    fn error_code(&self) -> &'static str {
        match self {
            CreditError::NotLoggedIn => "CREDIT_NOT_LOGGED_IN",
            CreditError::Probe { .. } => "CREDIT_PROBE_FAILED",
            CreditError::Persist { .. } => "CREDIT_PERSIST_FAILED",
            CreditError::Io { .. } => "CREDIT_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, CreditError::NotLoggedIn)
    }
}
