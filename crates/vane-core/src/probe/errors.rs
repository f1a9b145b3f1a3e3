use crate::errors::VaneError;

/// Failure modes reported by the probing collaborators.
///
/// `AuthRequired` is the load-bearing distinction: the caching layer flips
/// the login state on it instead of treating it as a transient failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProbeError {
    #[error("Authentication required: {message}")]
    AuthRequired { message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },
}

impl ProbeError {
    /// Classify an HTTP failure status. Only 401/403 are authentication
    /// failures — a 404 from a probe endpoint is not a lost login.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => ProbeError::AuthRequired { message },
            _ => ProbeError::Http { status, message },
        }
    }

    pub fn is_auth(&self) -> bool {
        match self {
            ProbeError::AuthRequired { .. } => true,
            ProbeError::Http { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }

    /// Whether the next scheduled tick may plausibly succeed without user
    /// action. Auth and malformed-response failures are not transient.
    pub fn is_transient(&self) -> bool {
        match self {
            ProbeError::Network { .. } | ProbeError::Timeout { .. } => true,
            ProbeError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl VaneError for ProbeError {
    fn error_code(&self) -> &'static str {
        match self {
            ProbeError::AuthRequired { .. } => "PROBE_AUTH_REQUIRED",
            ProbeError::Network { .. } => "PROBE_NETWORK_ERROR",
            ProbeError::Http { .. } => "PROBE_HTTP_ERROR",
            ProbeError::Timeout { .. } => "PROBE_TIMEOUT",
            ProbeError::InvalidResponse { .. } => "PROBE_INVALID_RESPONSE",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, ProbeError::AuthRequired { .. })
    }
}

/// Whether a failure message from a probing collaborator indicates a lost
/// login. Upstream gateways phrase this inconsistently (and some only in
/// Chinese), so the known markers are matched as substrings.
pub fn looks_like_auth_error(message: &str) -> bool {
    const MARKERS: &[&str] = &[
        "not logged in",
        "login required",
        "login expired",
        "session expired",
        "please log in again",
        "未登录",
        "登录已过期",
        "登录可能已过期",
        "重新登录",
        "认证失败",
    ];

    let lowered = message.to_lowercase();
    MARKERS.iter().any(|marker| lowered.contains(marker))
}
