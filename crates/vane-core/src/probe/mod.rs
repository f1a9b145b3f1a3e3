//! Boundary traits for the probing collaborators.
//!
//! The actual HTTP/browser-automation logic that scrapes a gateway site or
//! the credit account lives outside this crate. The services here only
//! depend on these traits: one async fetch per data set, with failures
//! classified through [`ProbeError`] so authentication loss is
//! distinguishable from a flaky network.
//!
//! Implementations that share one browser-automation page across calls are
//! expected to serialize their page work through [`crate::exec::ExecQueue`].

pub mod errors;

pub use errors::{ProbeError, looks_like_auth_error};

use futures::future::BoxFuture;

use crate::config::types::SiteConfig;
use crate::credit::types::{CreditInfo, DailyStats, TransactionList};
use crate::sites::types::DetectionResult;

/// Probes one gateway site for status, balance, models and usage.
pub trait SiteProber: Send + Sync {
    /// Run one probe against `site`. `quick` allows the prober to reuse
    /// slow-to-fetch secondary data (model pricing, key lists) from its own
    /// caches instead of re-scraping everything. `timeout_secs` comes from
    /// the user's settings; enforcing it is the prober's job — the caller
    /// never aborts a probe from the outside.
    fn detect(
        &self,
        site: &SiteConfig,
        quick: bool,
        timeout_secs: u64,
    ) -> BoxFuture<'static, Result<DetectionResult, ProbeError>>;
}

/// Probes the credit account for balances, daily stats and transactions.
pub trait CreditProber: Send + Sync {
    fn fetch_credit(&self) -> BoxFuture<'static, Result<CreditInfo, ProbeError>>;

    fn fetch_daily_stats(&self, days: u32) -> BoxFuture<'static, Result<DailyStats, ProbeError>>;

    fn fetch_transactions(
        &self,
        page: u32,
        page_size: u32,
    ) -> BoxFuture<'static, Result<TransactionList, ProbeError>>;
}
