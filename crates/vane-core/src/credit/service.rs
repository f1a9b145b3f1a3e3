use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::credit::errors::CreditError;
use crate::credit::storage::{CreditStorage, load_storage, save_storage};
use crate::credit::types::{
    CreditConfig, CreditConfigPatch, CreditInfo, CreditLoginResult, DailyStats, TransactionList,
};
use crate::events::Event;
use crate::probe::{CreditProber, ProbeError, looks_like_auth_error};
use crate::refresh::scheduler::{TimerHandle, spawn_timer};
use crate::refresh::types::{TargetId, TargetKind};
use crate::refresh::visibility::VisibilityGate;
use crate::store::{RefreshOutcome, Snapshot, SnapshotCell};

/// Cache-and-refresh service for the credit account.
///
/// Holds one snapshot cell per data set (balance/profile, daily stats,
/// transactions), all seeded from `credit.json` on startup so the panel has
/// data before the first live fetch. The auto-refresh timer runs only while
/// `auto_refresh` is on AND the user is logged in; it refreshes the balance
/// data set, like the manual refresh button does.
///
/// An authentication-classified failure flips `logged_in` to false and
/// leaves the cached data intact — the UI swaps the stale balance for a
/// re-login prompt. Preference changes always take effect in memory even
/// when the disk write fails.
pub struct CreditService {
    storage_path: PathBuf,
    config: Mutex<CreditConfig>,
    cookies: Mutex<Option<String>>,
    info: SnapshotCell<CreditInfo>,
    daily_stats: SnapshotCell<DailyStats>,
    transactions: SnapshotCell<TransactionList>,
    logged_in: AtomicBool,
    timer: Mutex<Option<TimerHandle>>,
    visibility: VisibilityGate,
    prober: Arc<dyn CreditProber>,
    events: broadcast::Sender<Event>,
}

impl CreditService {
    /// Load persisted state from `data_dir` and build the service. The
    /// timer is not armed yet — call [`CreditService::start`] from within a
    /// runtime.
    pub fn new(
        data_dir: &Path,
        prober: Arc<dyn CreditProber>,
        visibility: VisibilityGate,
    ) -> Arc<Self> {
        let storage_path = data_dir.join("credit.json");
        let storage = load_storage(&storage_path);
        let logged_in = storage.cookies.is_some();

        info!(
            event = "core.credit.service_loaded",
            logged_in = logged_in,
            has_cached_info = storage.cached_info.is_some(),
        );

        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            storage_path,
            config: Mutex::new(storage.config),
            cookies: Mutex::new(storage.cookies),
            info: SnapshotCell::seeded(storage.cached_info),
            daily_stats: SnapshotCell::seeded(storage.cached_daily_stats),
            transactions: SnapshotCell::seeded(storage.cached_transactions),
            logged_in: AtomicBool::new(logged_in),
            timer: Mutex::new(None),
            visibility,
            prober,
            events,
        })
    }

    /// Arm the auto-refresh timer according to the loaded preferences.
    pub fn start(self: &Arc<Self>) {
        self.rearm_timer();
    }

    /// Stop the timer. An in-flight fetch runs to completion.
    pub fn shutdown(&self) {
        if let Some(mut timer) = lock(&self.timer).take() {
            timer.stop();
        }
    }

    // ------------------------------------------------------------------
    // Refreshing
    // ------------------------------------------------------------------

    /// Fetch the balance/profile data set now. No-op while a fetch is
    /// already in flight; shared guard for ticks and the refresh button.
    pub async fn refresh_credit(&self) -> Result<RefreshOutcome, CreditError> {
        if !self.is_logged_in() {
            return Err(CreditError::NotLoggedIn);
        }

        debug!(event = "core.credit.refresh_started", data_set = "info");
        let prober = Arc::clone(&self.prober);
        match self.info.refresh(|| prober.fetch_credit()).await {
            Ok(RefreshOutcome::Skipped) => {
                debug!(event = "core.credit.refresh_skipped", data_set = "info");
                Ok(RefreshOutcome::Skipped)
            }
            Ok(RefreshOutcome::Updated) => {
                info!(event = "core.credit.refresh_completed", data_set = "info");
                self.persist_logged();
                self.emit(Event::CreditUpdated);
                Ok(RefreshOutcome::Updated)
            }
            Err(probe_error) => {
                self.handle_probe_error(&probe_error, true);
                Err(probe_error.into())
            }
        }
    }

    /// Fetch the daily income/expense stats. Failures only log — a broken
    /// stats endpoint must not disturb the main panel.
    pub async fn refresh_daily_stats(&self, days: u32) -> Result<RefreshOutcome, CreditError> {
        if !self.is_logged_in() {
            return Err(CreditError::NotLoggedIn);
        }

        let prober = Arc::clone(&self.prober);
        match self
            .daily_stats
            .refresh(|| prober.fetch_daily_stats(days))
            .await
        {
            Ok(outcome) => {
                if outcome == RefreshOutcome::Updated {
                    debug!(event = "core.credit.refresh_completed", data_set = "daily_stats");
                    self.persist_logged();
                }
                Ok(outcome)
            }
            Err(probe_error) => {
                self.handle_probe_error(&probe_error, false);
                Err(probe_error.into())
            }
        }
    }

    /// Fetch one page of transactions. Same failure policy as the stats.
    pub async fn refresh_transactions(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<RefreshOutcome, CreditError> {
        if !self.is_logged_in() {
            return Err(CreditError::NotLoggedIn);
        }

        let prober = Arc::clone(&self.prober);
        match self
            .transactions
            .refresh(|| prober.fetch_transactions(page, page_size))
            .await
        {
            Ok(outcome) => {
                if outcome == RefreshOutcome::Updated {
                    debug!(event = "core.credit.refresh_completed", data_set = "transactions");
                    self.persist_logged();
                }
                Ok(outcome)
            }
            Err(probe_error) => {
                self.handle_probe_error(&probe_error, false);
                Err(probe_error.into())
            }
        }
    }

    /// Refresh all three data sets in one go (the prober reuses a single
    /// automation session underneath). Stats and transaction failures are
    /// best-effort once the balance fetch has succeeded.
    pub async fn refresh_all(&self) -> Result<RefreshOutcome, CreditError> {
        match self.refresh_credit().await? {
            RefreshOutcome::Skipped => Ok(RefreshOutcome::Skipped),
            RefreshOutcome::Updated => {
                if let Err(e) = self.refresh_daily_stats(7).await {
                    warn!(event = "core.credit.stats_refresh_failed", error = %e);
                }
                if let Err(e) = self.refresh_transactions(1, 10).await {
                    warn!(event = "core.credit.transactions_refresh_failed", error = %e);
                }
                Ok(RefreshOutcome::Updated)
            }
        }
    }

    // ------------------------------------------------------------------
    // Login lifecycle
    // ------------------------------------------------------------------

    /// Accept the outcome of the external login flow: session cookies plus
    /// the full data set fetched during login.
    pub fn apply_login(self: &Arc<Self>, cookies: String, result: CreditLoginResult) {
        *lock(&self.cookies) = Some(cookies);
        self.logged_in.store(true, Ordering::SeqCst);

        self.info.set_snapshot(result.credit_info);
        if let Some(stats) = result.daily_stats {
            self.daily_stats.set_snapshot(stats);
        }
        if let Some(transactions) = result.transactions {
            self.transactions.set_snapshot(transactions);
        }

        info!(event = "core.credit.login_applied");
        self.persist_logged();
        self.emit(Event::LoginStateChanged { logged_in: true });
        self.emit(Event::CreditUpdated);
        self.rearm_timer();
    }

    /// Log out: drop cookies, cached data and the timer.
    pub fn logout(self: &Arc<Self>) {
        *lock(&self.cookies) = None;
        self.logged_in.store(false, Ordering::SeqCst);
        self.info.clear();
        self.daily_stats.clear();
        self.transactions.clear();
        self.shutdown();

        info!(event = "core.credit.logged_out");
        self.persist_logged();
        self.emit(Event::LoginStateChanged { logged_in: false });
    }

    // ------------------------------------------------------------------
    // Preferences
    // ------------------------------------------------------------------

    /// Merge a settings-UI update into the config and re-arm the timer.
    /// The merged config is effective immediately; a failed disk write is
    /// logged, never surfaced — the toggle must stick for this session.
    pub fn update_config(self: &Arc<Self>, patch: CreditConfigPatch) -> CreditConfig {
        let merged = {
            let mut config = lock(&self.config);
            config.apply(patch);
            config.clone()
        };
        info!(
            event = "core.credit.config_updated",
            enabled = merged.enabled,
            auto_refresh = merged.auto_refresh,
            interval_minutes = merged.refresh_interval_minutes,
        );
        self.persist_logged();
        self.rearm_timer();
        merged
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn cached_info(&self) -> Option<Snapshot<CreditInfo>> {
        self.info.cached()
    }

    pub fn cached_daily_stats(&self) -> Option<Snapshot<DailyStats>> {
        self.daily_stats.cached()
    }

    pub fn cached_transactions(&self) -> Option<Snapshot<TransactionList>> {
        self.transactions.cached()
    }

    pub fn last_error(&self) -> Option<String> {
        self.info.last_error()
    }

    pub fn is_refreshing(&self) -> bool {
        self.info.is_fetching()
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> CreditConfig {
        lock(&self.config).clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Whether the auto-refresh timer is currently armed.
    pub fn timer_armed(&self) -> bool {
        lock(&self.timer).is_some()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn rearm_timer(self: &Arc<Self>) {
        let mut timer = lock(&self.timer);
        if let Some(mut previous) = timer.take() {
            previous.stop();
        }

        let config = lock(&self.config).clone();
        let should_run = config.enabled && config.auto_refresh && self.is_logged_in();
        if !should_run {
            debug!(
                event = "core.credit.timer_not_armed",
                enabled = config.enabled,
                auto_refresh = config.auto_refresh,
                logged_in = self.is_logged_in(),
            );
            return;
        }

        let period = TargetKind::Credit.period(config.refresh_interval_minutes);
        let service = Arc::clone(self);
        *timer = Some(spawn_timer(
            TargetId::Credit,
            period,
            self.visibility.subscribe(),
            move || {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    // Skips and failures are already recorded on the cell.
                    if service.is_logged_in() {
                        let _ = service.refresh_credit().await;
                    }
                });
            },
        ));
    }

    fn handle_probe_error(&self, error: &ProbeError, emit_failure: bool) {
        let message = error.to_string();
        if error.is_auth() || looks_like_auth_error(&message) {
            warn!(event = "core.credit.auth_lost", error = %message);
            *lock(&self.cookies) = None;
            if self.logged_in.swap(false, Ordering::SeqCst) {
                self.emit(Event::LoginStateChanged { logged_in: false });
            }
            self.persist_logged();
        } else {
            warn!(event = "core.credit.refresh_failed", error = %message);
            if emit_failure {
                self.emit(Event::CreditRefreshFailed { error: message });
            }
        }
    }

    fn persist(&self) -> Result<(), CreditError> {
        let storage = CreditStorage {
            config: lock(&self.config).clone(),
            cached_info: self.info.cached(),
            cached_daily_stats: self.daily_stats.cached(),
            cached_transactions: self.transactions.cached(),
            cookies: lock(&self.cookies).clone(),
        };
        save_storage(&self.storage_path, &storage)
    }

    fn persist_logged(&self) {
        if let Err(e) = self.persist() {
            warn!(
                event = "core.credit.storage_persist_failed",
                error = %e,
                message = "Credit state applied in memory only",
            );
        }
    }

    fn emit(&self, event: Event) {
        let _ = self.events.send(event);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
