use serde::{Deserialize, Serialize};

use crate::refresh::types::TargetKind;

/// The credit account's profile and balances.
///
/// `community_balance` is the settled baseline from the credit platform;
/// `gamification_score` is the live forum score. Their difference is the
/// user's real-time net income/spend since the last settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditInfo {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub trust_level: u8,

    pub community_balance: f64,
    pub gamification_score: f64,
    pub difference: f64,

    #[serde(default)]
    pub total_receive: String,
    #[serde(default)]
    pub total_payment: String,
    #[serde(default)]
    pub total_transfer: String,
    #[serde(default)]
    pub total_community: String,
    #[serde(default)]
    pub available_balance: String,

    #[serde(default)]
    pub pay_score: i64,
    #[serde(default)]
    pub pay_level: u8,
    #[serde(default)]
    pub is_pay_key: bool,
    #[serde(default)]
    pub remain_quota: String,
    #[serde(default)]
    pub daily_limit: i64,

    #[serde(default)]
    pub is_admin: bool,
}

/// One day's income and expense, amounts as the API's decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStatItem {
    /// Date in `YYYY-MM-DD` form.
    pub date: String,
    pub income: String,
    pub expense: String,
}

/// Income/expense stats over a window of days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub items: Vec<DailyStatItem>,
    pub total_income: f64,
    pub total_expense: f64,
}

impl DailyStats {
    /// Build stats from raw items, computing the totals.
    pub fn from_items(items: Vec<DailyStatItem>) -> Self {
        let total_income = calculate_total_income(&items);
        let total_expense = calculate_total_expense(&items);
        Self {
            items,
            total_income,
            total_expense,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Success,
    Failed,
    Pending,
}

/// One transaction on the credit account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionOrder {
    pub id: String,
    pub order_no: String,
    #[serde(default)]
    pub order_name: String,
    pub amount: String,
    pub status: TransactionStatus,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub payment_type: String,
    #[serde(default)]
    pub trade_time: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub payer_username: String,
    #[serde(default)]
    pub payee_username: String,
    #[serde(default)]
    pub app_name: String,
}

/// A page of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionList {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub orders: Vec<TransactionOrder>,
}

/// User-configurable credit monitoring preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditConfig {
    /// Whether the credit panel is enabled at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Whether the balance auto-refreshes on a timer.
    #[serde(default)]
    pub auto_refresh: bool,
    /// Minutes between automatic refreshes.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_minutes: u32,
}

impl Default for CreditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_refresh: false,
            refresh_interval_minutes: default_refresh_interval(),
        }
    }
}

impl CreditConfig {
    /// Merge a partial update onto this config, clamping the interval.
    pub fn apply(&mut self, patch: CreditConfigPatch) {
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(auto_refresh) = patch.auto_refresh {
            self.auto_refresh = auto_refresh;
        }
        if let Some(raw) = patch.refresh_interval_minutes {
            self.refresh_interval_minutes = clamp_refresh_interval(raw);
        }
    }
}

/// Partial [`CreditConfig`] update from the settings UI; absent fields keep
/// their current values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditConfigPatch {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub auto_refresh: Option<bool>,
    #[serde(default)]
    pub refresh_interval_minutes: Option<i64>,
}

/// Everything the login flow hands back in one shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditLoginResult {
    pub credit_info: CreditInfo,
    #[serde(default)]
    pub daily_stats: Option<DailyStats>,
    #[serde(default)]
    pub transactions: Option<TransactionList>,
}

fn default_true() -> bool {
    true
}

fn default_refresh_interval() -> u32 {
    TargetKind::Credit.default_interval_minutes()
}

/// Clamp a credit refresh interval to the credit floor.
pub fn clamp_refresh_interval(minutes: i64) -> u32 {
    TargetKind::Credit.clamp_interval(minutes)
}

pub fn calculate_difference(gamification_score: f64, community_balance: f64) -> f64 {
    gamification_score - community_balance
}

pub fn calculate_total_income(items: &[DailyStatItem]) -> f64 {
    items
        .iter()
        .map(|item| item.income.parse::<f64>().unwrap_or(0.0))
        .sum()
}

pub fn calculate_total_expense(items: &[DailyStatItem]) -> f64 {
    items
        .iter()
        .map(|item| item.expense.parse::<f64>().unwrap_or(0.0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<DailyStatItem> {
        vec![
            DailyStatItem {
                date: "2026-07-01".to_string(),
                income: "1".to_string(),
                expense: "5.1".to_string(),
            },
            DailyStatItem {
                date: "2026-07-02".to_string(),
                income: "0".to_string(),
                expense: "2.4".to_string(),
            },
        ]
    }

    #[test]
    fn test_daily_stats_totals() {
        let stats = DailyStats::from_items(items());
        assert!((stats.total_income - 1.0).abs() < f64::EPSILON);
        assert!((stats.total_expense - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_totals_ignore_unparseable_amounts() {
        let mut broken = items();
        broken.push(DailyStatItem {
            date: "2026-07-03".to_string(),
            income: "".to_string(),
            expense: "n/a".to_string(),
        });
        let stats = DailyStats::from_items(broken);
        assert!((stats.total_income - 1.0).abs() < f64::EPSILON);
        assert!((stats.total_expense - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_difference_is_score_minus_balance() {
        assert!((calculate_difference(120.5, 100.0) - 20.5).abs() < f64::EPSILON);
        assert!(calculate_difference(80.0, 100.0) < 0.0);
    }

    #[test]
    fn test_credit_config_defaults() {
        let config = CreditConfig::default();
        assert!(config.enabled);
        assert!(!config.auto_refresh);
        assert_eq!(config.refresh_interval_minutes, 5);
    }

    #[test]
    fn test_clamp_refresh_interval_floor() {
        assert_eq!(clamp_refresh_interval(-10), 5);
        assert_eq!(clamp_refresh_interval(0), 5);
        assert_eq!(clamp_refresh_interval(5), 5);
        assert_eq!(clamp_refresh_interval(90), 90);
    }

    #[test]
    fn test_config_apply_merges_and_clamps() {
        let mut config = CreditConfig::default();
        config.apply(CreditConfigPatch {
            auto_refresh: Some(true),
            refresh_interval_minutes: Some(1),
            ..Default::default()
        });

        assert!(config.enabled, "untouched field keeps its value");
        assert!(config.auto_refresh);
        assert_eq!(config.refresh_interval_minutes, 5);
    }

    #[test]
    fn test_transaction_status_serde_is_lowercase() {
        let json = serde_json::to_string(&TransactionStatus::Pending).unwrap();
        assert_eq!(json, r#""pending""#);
        let parsed: TransactionStatus = serde_json::from_str(r#""success""#).unwrap();
        assert_eq!(parsed, TransactionStatus::Success);
    }

    #[test]
    fn test_transaction_order_kind_field_maps_to_type() {
        let json = r#"{
            "id": "1", "order_no": "n-1", "amount": "0.1",
            "status": "success", "type": "payment"
        }"#;
        let order: TransactionOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.kind, "payment");
        let back = serde_json::to_string(&order).unwrap();
        assert!(back.contains(r#""type":"payment""#));
    }
}
