use serde::{Deserialize, Serialize};

/// What one probe of a gateway site reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub name: String,
    pub url: String,
    /// Models the site currently serves.
    #[serde(default)]
    pub models: Vec<String>,
    /// Account balance in the site's display currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_prompt_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_completion_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_requests: Option<u64>,
    /// Whether the site exposes a check-in endpoint.
    #[serde(default)]
    pub has_checkin: bool,
}

/// Whether a fresh result differs enough from the previous one to tell the
/// user "data updated" rather than "no change".
pub fn has_significant_changes(old: Option<&DetectionResult>, new: &DetectionResult) -> bool {
    let Some(old) = old else {
        return true;
    };
    old.balance != new.balance
        || old.today_usage != new.today_usage
        || old.models.len() != new.models.len()
}
