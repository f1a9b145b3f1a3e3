use serde::{Deserialize, Serialize};

/// Business-level notifications broadcast by the monitoring services.
///
/// Each variant describes _what happened_, not what should happen. Front-ends
/// subscribe to react (re-render a row, show a re-login prompt) without
/// polling. Events use owned types so they can be serialized and sent across
/// the IPC boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A site probe succeeded and its cached snapshot was replaced.
    /// `changed` is false when the fresh data matches the previous snapshot.
    SiteUpdated { name: String, changed: bool },
    /// A site probe failed; the previous snapshot is still served.
    SiteRefreshFailed { name: String, error: String },
    /// A site probe failed with an authentication-class error; the user
    /// needs to log in to the site again.
    SiteAuthRequired {
        name: String,
        url: String,
        error: String,
    },
    /// A full detection sweep over the site list finished.
    DetectionCompleted { refreshed: usize, failed: usize },
    /// The credit account snapshot was replaced.
    CreditUpdated,
    /// A credit refresh failed; the previous snapshot is still served.
    CreditRefreshFailed { error: String },
    /// The credit login state flipped (auth failure, login, or logout).
    LoginStateChanged { logged_in: bool },
}
