use std::error::Error;

/// Base trait for all application errors
pub trait VaneError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Common result type for the application
pub type VaneResult<T> = Result<T, Box<dyn VaneError>>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    #[error("Failed to serialize config: {message}")]
    SerializeError { message: String },

    #[error("IO error accessing config: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl VaneError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::SerializeError { .. } => "CONFIG_SERIALIZE_ERROR",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, ConfigError::ParseError { .. })
    }
}
