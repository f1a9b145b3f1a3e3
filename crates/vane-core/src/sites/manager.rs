use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::types::{AppConfig, Settings, SiteConfig};
use crate::config::{operations, persistence as config_persistence};
use crate::events::Event;
use crate::probe::{SiteProber, looks_like_auth_error};
use crate::refresh::registry::RefreshRegistry;
use crate::refresh::types::{TargetId, TargetKind};
use crate::refresh::visibility::VisibilityGate;
use crate::sites::errors::SiteError;
use crate::sites::persistence::{SnapshotMap, load_snapshots, save_snapshots};
use crate::sites::types::{DetectionResult, has_significant_changes};
use crate::store::{RefreshOutcome, Snapshot, SnapshotCell};

/// Tally of one detection sweep over the site list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepSummary {
    pub refreshed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Orchestrates site monitoring.
///
/// Owns the site list, one snapshot cell per site, and the refresh timers
/// (the global detection sweep plus one timer per auto-refreshing site).
/// Probing goes through the external [`SiteProber`]; results land in the
/// cells and are mirrored to `snapshots.json` for cold-start display.
///
/// Auto-refresh preference changes take effect in memory and on the timers
/// even when the config file cannot be written — the disk failure is
/// logged, not propagated.
pub struct SiteMonitor {
    config_path: PathBuf,
    snapshots_path: PathBuf,
    config: Mutex<AppConfig>,
    cells: Mutex<HashMap<String, Arc<SnapshotCell<DetectionResult>>>>,
    registry: RefreshRegistry,
    prober: Arc<dyn SiteProber>,
    events: broadcast::Sender<Event>,
}

impl SiteMonitor {
    /// Load config and cached snapshots from `data_dir` and build the
    /// monitor. No timers are armed yet — call [`SiteMonitor::start`] from
    /// within a runtime.
    pub fn new(
        data_dir: &Path,
        prober: Arc<dyn SiteProber>,
        visibility: VisibilityGate,
    ) -> Result<Arc<Self>, SiteError> {
        let config_path = data_dir.join("config.json");
        let snapshots_path = data_dir.join("snapshots.json");

        let config = config_persistence::load_config(&config_path)?;
        let snapshots = load_snapshots(&snapshots_path);

        let cells = config
            .sites
            .iter()
            .map(|site| {
                let seeded = snapshots.get(&site.name).cloned();
                (site.name.clone(), Arc::new(SnapshotCell::seeded(seeded)))
            })
            .collect();

        let (events, _) = broadcast::channel(64);

        info!(
            event = "core.sites.monitor_loaded",
            sites = config.sites.len(),
            config_path = %config_path.display(),
        );

        Ok(Arc::new(Self {
            config_path,
            snapshots_path,
            config: Mutex::new(config),
            cells: Mutex::new(cells),
            registry: RefreshRegistry::new(visibility),
            prober,
            events,
        }))
    }

    /// Arm the detection sweep timer and the per-site timers according to
    /// the loaded preferences.
    pub fn start(self: &Arc<Self>) {
        let (settings, auto_sites) = {
            let config = lock(&self.config);
            let auto_sites: Vec<(String, u32)> = config
                .sites
                .iter()
                .filter(|site| site.auto_refresh)
                .map(|site| {
                    (
                        site.name.clone(),
                        site.auto_refresh_interval
                            .unwrap_or_else(|| TargetKind::Site.default_interval_minutes()),
                    )
                })
                .collect();
            (config.settings.clone(), auto_sites)
        };

        self.arm_detection_timer(&settings);
        for (name, interval) in auto_sites {
            self.arm_site_timer(&name, true, interval);
        }
    }

    /// Stop every timer. In-flight probes run to completion.
    pub fn shutdown(&self) {
        self.registry.detach_all();
    }

    // ------------------------------------------------------------------
    // Probing
    // ------------------------------------------------------------------

    /// Probe one site now. No-op (`Skipped`) while a probe for the same
    /// site is still in flight — this guard is shared by scheduler ticks
    /// and manual refresh alike.
    pub async fn detect_site(&self, name: &str, quick: bool) -> Result<RefreshOutcome, SiteError> {
        let (site, timeout_secs) = {
            let config = lock(&self.config);
            let site = config
                .site(name)
                .cloned()
                .ok_or_else(|| SiteError::NotFound {
                    name: name.to_string(),
                })?;
            (site, config.settings.timeout_secs)
        };

        let cell = self.cell(name);
        let previous = cell.cached();

        debug!(event = "core.sites.detect_started", site = name, quick = quick);
        let prober = Arc::clone(&self.prober);
        let outcome = cell
            .refresh(|| prober.detect(&site, quick, timeout_secs))
            .await;

        match outcome {
            Ok(RefreshOutcome::Skipped) => {
                debug!(event = "core.sites.detect_skipped", site = name);
                Ok(RefreshOutcome::Skipped)
            }
            Ok(RefreshOutcome::Updated) => {
                let fresh = cell.cached();
                let changed = match &fresh {
                    Some(snapshot) => has_significant_changes(
                        previous.as_ref().map(|s| &s.data),
                        &snapshot.data,
                    ),
                    None => false,
                };
                let has_checkin = fresh.map(|s| s.data.has_checkin).unwrap_or(false);

                {
                    let mut config = lock(&self.config);
                    operations::mark_synced(&mut config, name, has_checkin);
                }
                self.persist_config_logged();
                self.persist_snapshots_logged();

                info!(
                    event = "core.sites.detect_completed",
                    site = name,
                    changed = changed,
                );
                self.emit(Event::SiteUpdated {
                    name: name.to_string(),
                    changed,
                });
                Ok(RefreshOutcome::Updated)
            }
            Err(probe_error) => {
                let message = probe_error.to_string();
                if probe_error.is_auth() || looks_like_auth_error(&message) {
                    warn!(
                        event = "core.sites.detect_auth_required",
                        site = name,
                        error = %message,
                    );
                    self.emit(Event::SiteAuthRequired {
                        name: name.to_string(),
                        url: site.url.clone(),
                        error: message,
                    });
                } else {
                    warn!(
                        event = "core.sites.detect_failed",
                        site = name,
                        error = %message,
                    );
                    self.emit(Event::SiteRefreshFailed {
                        name: name.to_string(),
                        error: message,
                    });
                }
                Err(SiteError::Probe {
                    source: probe_error,
                })
            }
        }
    }

    /// Probe every enabled site once (the detection sweep). Individual
    /// failures never abort the sweep.
    pub async fn detect_all(&self, quick: bool) -> SweepSummary {
        let (names, concurrent) = {
            let config = lock(&self.config);
            let names: Vec<String> = config
                .sites
                .iter()
                .filter(|site| site.enabled)
                .map(|site| site.name.clone())
                .collect();
            (names, config.settings.concurrent)
        };

        info!(
            event = "core.sites.sweep_started",
            sites = names.len(),
            concurrent = concurrent,
        );

        let mut summary = SweepSummary::default();
        if concurrent {
            let probes = names.iter().map(|name| self.detect_site(name, quick));
            for outcome in futures::future::join_all(probes).await {
                tally(&mut summary, outcome);
            }
        } else {
            for name in &names {
                let outcome = self.detect_site(name, quick).await;
                tally(&mut summary, outcome);
            }
        }

        info!(
            event = "core.sites.sweep_completed",
            refreshed = summary.refreshed,
            skipped = summary.skipped,
            failed = summary.failed,
        );
        self.emit(Event::DetectionCompleted {
            refreshed: summary.refreshed,
            failed: summary.failed,
        });
        summary
    }

    // ------------------------------------------------------------------
    // Site list management
    // ------------------------------------------------------------------

    /// Add a site and, when its auto-refresh is enabled, arm its timer.
    pub fn add_site(self: &Arc<Self>, site: SiteConfig) -> Result<(), SiteError> {
        let name = site.name.clone();
        let (auto_refresh, interval) = {
            let mut config = lock(&self.config);
            operations::add_site(&mut config, site)?;
            let added = config.site(&name).expect("site was just added");
            (
                added.auto_refresh,
                added
                    .auto_refresh_interval
                    .unwrap_or_else(|| TargetKind::Site.default_interval_minutes()),
            )
        };
        self.persist_config()?;

        lock(&self.cells).insert(name.clone(), Arc::new(SnapshotCell::new()));
        if auto_refresh {
            self.arm_site_timer(&name, true, interval);
        }

        info!(event = "core.sites.site_added", site = %name);
        Ok(())
    }

    /// Remove a site: its timer, cell and persisted snapshot go with it.
    pub fn remove_site(self: &Arc<Self>, name: &str) -> Result<(), SiteError> {
        {
            let mut config = lock(&self.config);
            operations::remove_site(&mut config, name)?;
        }
        self.persist_config()?;

        self.registry.detach(&TargetId::Site(name.to_string()));
        lock(&self.cells).remove(name);
        self.persist_snapshots_logged();

        info!(event = "core.sites.site_removed", site = name);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Auto-refresh preferences
    // ------------------------------------------------------------------

    /// Save a site's auto-refresh preference and re-arm its timer.
    pub fn set_site_auto_refresh(
        self: &Arc<Self>,
        name: &str,
        enabled: bool,
        interval_minutes: Option<i64>,
    ) -> Result<(), SiteError> {
        let (enabled, interval) = {
            let mut config = lock(&self.config);
            operations::set_site_auto_refresh(&mut config, name, enabled, interval_minutes)?
        };
        info!(
            event = "core.sites.auto_refresh_saved",
            site = name,
            enabled = enabled,
            interval_minutes = interval,
        );
        self.persist_config_logged();
        self.arm_site_timer(name, enabled, interval);
        Ok(())
    }

    /// Toggle a site's auto-refresh flag, keeping its stored cadence.
    pub fn toggle_site_auto_refresh(self: &Arc<Self>, name: &str) -> Result<bool, SiteError> {
        let (enabled, interval) = {
            let mut config = lock(&self.config);
            operations::toggle_site_auto_refresh(&mut config, name)?
        };
        info!(
            event = "core.sites.auto_refresh_toggled",
            site = name,
            enabled = enabled,
        );
        self.persist_config_logged();
        self.arm_site_timer(name, enabled, interval);
        Ok(enabled)
    }

    /// Save the detection sweep preference and re-arm the sweep timer.
    pub fn set_detection_auto_refresh(
        self: &Arc<Self>,
        enabled: bool,
        interval_minutes: Option<i64>,
    ) {
        let settings = {
            let mut config = lock(&self.config);
            operations::set_detection_auto_refresh(&mut config, enabled, interval_minutes);
            config.settings.clone()
        };
        info!(
            event = "core.sites.detection_auto_refresh_saved",
            enabled = enabled,
            interval_minutes = settings.refresh_interval_minutes,
        );
        self.persist_config_logged();
        self.arm_detection_timer(&settings);
    }

    /// Replace the global settings and re-arm the sweep timer.
    pub fn update_settings(self: &Arc<Self>, mut settings: Settings) {
        settings.refresh_interval_minutes =
            TargetKind::Detection.clamp_interval(i64::from(settings.refresh_interval_minutes));
        {
            let mut config = lock(&self.config);
            config.settings = settings.clone();
        }
        self.persist_config_logged();
        self.arm_detection_timer(&settings);
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn cached(&self, name: &str) -> Option<Snapshot<DetectionResult>> {
        lock(&self.cells).get(name).and_then(|cell| cell.cached())
    }

    pub fn last_error(&self, name: &str) -> Option<String> {
        lock(&self.cells).get(name).and_then(|cell| cell.last_error())
    }

    pub fn is_fetching(&self, name: &str) -> bool {
        lock(&self.cells)
            .get(name)
            .map(|cell| cell.is_fetching())
            .unwrap_or(false)
    }

    pub fn sites(&self) -> Vec<SiteConfig> {
        lock(&self.config).sites.clone()
    }

    pub fn settings(&self) -> Settings {
        lock(&self.config).settings.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Number of armed refresh timers (sweep + per-site).
    pub fn active_timers(&self) -> usize {
        self.registry.active_count()
    }

    pub fn visibility(&self) -> &VisibilityGate {
        self.registry.visibility()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn cell(&self, name: &str) -> Arc<SnapshotCell<DetectionResult>> {
        let mut cells = lock(&self.cells);
        Arc::clone(
            cells
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(SnapshotCell::new())),
        )
    }

    fn arm_detection_timer(self: &Arc<Self>, settings: &Settings) {
        let monitor = Arc::clone(self);
        self.registry.attach(
            TargetId::Detection,
            settings.auto_refresh,
            settings.refresh_interval_minutes,
            move || {
                let monitor = Arc::clone(&monitor);
                tokio::spawn(async move {
                    monitor.detect_all(true).await;
                });
            },
        );
    }

    fn arm_site_timer(self: &Arc<Self>, name: &str, enabled: bool, interval_minutes: u32) {
        let monitor = Arc::clone(self);
        let site_name = name.to_string();
        self.registry.attach(
            TargetId::Site(name.to_string()),
            enabled,
            interval_minutes,
            move || {
                let monitor = Arc::clone(&monitor);
                let site_name = site_name.clone();
                tokio::spawn(async move {
                    // Errors are already recorded on the cell and broadcast.
                    let _ = monitor.detect_site(&site_name, true).await;
                });
            },
        );
    }

    fn persist_config(&self) -> Result<(), SiteError> {
        let config = lock(&self.config).clone();
        config_persistence::save_config(&self.config_path, &config)?;
        Ok(())
    }

    fn persist_config_logged(&self) {
        if let Err(e) = self.persist_config() {
            warn!(
                event = "core.sites.config_persist_failed",
                error = %e,
                message = "Config change applied in memory only",
            );
        }
    }

    fn persist_snapshots_logged(&self) {
        let snapshots: SnapshotMap = {
            let cells = lock(&self.cells);
            cells
                .iter()
                .filter_map(|(name, cell)| cell.cached().map(|snap| (name.clone(), snap)))
                .collect()
        };
        if let Err(e) = save_snapshots(&self.snapshots_path, &snapshots) {
            warn!(
                event = "core.sites.snapshots_persist_failed",
                error = %e,
            );
        }
    }

    fn emit(&self, event: Event) {
        // Send fails only when no front-end is subscribed, which is fine.
        let _ = self.events.send(event);
    }
}

fn tally(summary: &mut SweepSummary, outcome: Result<RefreshOutcome, SiteError>) {
    match outcome {
        Ok(RefreshOutcome::Updated) => summary.refreshed += 1,
        Ok(RefreshOutcome::Skipped) => summary.skipped += 1,
        Err(_) => summary.failed += 1,
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeError;
    use futures::FutureExt;
    use futures::future::BoxFuture;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample_result(name: &str) -> DetectionResult {
        DetectionResult {
            name: name.to_string(),
            url: format!("https://{}.example.com", name),
            models: vec!["m1".to_string()],
            balance: Some(25.0),
            today_usage: Some(0.5),
            today_prompt_tokens: None,
            today_completion_tokens: None,
            today_requests: None,
            has_checkin: true,
        }
    }

    /// Prober that pops scripted responses, falling back to success.
    struct ScriptedProber {
        responses: Mutex<VecDeque<Result<DetectionResult, ProbeError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedProber {
        fn new(responses: Vec<Result<DetectionResult, ProbeError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SiteProber for ScriptedProber {
        fn detect(
            &self,
            site: &SiteConfig,
            _quick: bool,
            _timeout_secs: u64,
        ) -> BoxFuture<'static, Result<DetectionResult, ProbeError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let response = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(sample_result(&site.name)));
            async move { response }.boxed()
        }
    }

    fn monitor_with(
        dir: &Path,
        prober: Arc<ScriptedProber>,
        sites: &[&str],
    ) -> Arc<SiteMonitor> {
        let mut config = AppConfig::default();
        for name in sites {
            config
                .sites
                .push(SiteConfig::new(*name, format!("https://{}.example.com", name)));
        }
        config_persistence::save_config(&dir.join("config.json"), &config).unwrap();
        SiteMonitor::new(dir, prober, VisibilityGate::new()).unwrap()
    }

    #[tokio::test]
    async fn test_detect_populates_cache_and_marks_sync() {
        let dir = tempfile::tempdir().unwrap();
        let prober = ScriptedProber::new(vec![]);
        let monitor = monitor_with(dir.path(), prober, &["relay-one"]);
        let mut events = monitor.subscribe();

        let outcome = monitor.detect_site("relay-one", true).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::Updated);

        let snapshot = monitor.cached("relay-one").unwrap();
        assert_eq!(snapshot.data.balance, Some(25.0));
        assert_eq!(monitor.last_error("relay-one"), None);

        let site = monitor.sites().into_iter().next().unwrap();
        assert!(site.has_checkin);
        assert!(site.last_sync_time.is_some());

        assert_eq!(
            events.try_recv().unwrap(),
            Event::SiteUpdated {
                name: "relay-one".to_string(),
                changed: true,
            }
        );
    }

    #[tokio::test]
    async fn test_failed_detect_preserves_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let prober = ScriptedProber::new(vec![
            Ok(sample_result("relay-one")),
            Err(ProbeError::Network {
                message: "connection refused".to_string(),
            }),
        ]);
        let monitor = monitor_with(dir.path(), prober, &["relay-one"]);

        monitor.detect_site("relay-one", true).await.unwrap();
        let before = monitor.cached("relay-one").unwrap();

        let result = monitor.detect_site("relay-one", true).await;
        assert!(matches!(result, Err(SiteError::Probe { .. })));

        let after = monitor.cached("relay-one").unwrap();
        assert_eq!(after, before, "stale snapshot still served after failure");
        assert!(
            monitor
                .last_error("relay-one")
                .unwrap()
                .contains("connection refused")
        );
    }

    #[tokio::test]
    async fn test_auth_failure_emits_auth_event() {
        let dir = tempfile::tempdir().unwrap();
        let prober = ScriptedProber::new(vec![Err(ProbeError::AuthRequired {
            message: "未登录".to_string(),
        })]);
        let monitor = monitor_with(dir.path(), prober, &["relay-one"]);
        let mut events = monitor.subscribe();

        let _ = monitor.detect_site("relay-one", true).await;
        assert!(matches!(
            events.try_recv().unwrap(),
            Event::SiteAuthRequired { .. }
        ));
    }

    #[tokio::test]
    async fn test_plain_failure_emits_refresh_failed() {
        let dir = tempfile::tempdir().unwrap();
        let prober = ScriptedProber::new(vec![Err(ProbeError::Http {
            status: 404,
            message: "not found".to_string(),
        })]);
        let monitor = monitor_with(dir.path(), prober, &["relay-one"]);
        let mut events = monitor.subscribe();

        let _ = monitor.detect_site("relay-one", true).await;
        assert!(matches!(
            events.try_recv().unwrap(),
            Event::SiteRefreshFailed { .. }
        ));
    }

    #[tokio::test]
    async fn test_detect_unknown_site_errors() {
        let dir = tempfile::tempdir().unwrap();
        let monitor = monitor_with(dir.path(), ScriptedProber::new(vec![]), &[]);
        let result = monitor.detect_site("ghost", true).await;
        assert!(matches!(result, Err(SiteError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_sweep_skips_disabled_sites_and_survives_failures() {
        let dir = tempfile::tempdir().unwrap();
        let prober = ScriptedProber::new(vec![Err(ProbeError::Timeout { seconds: 10 })]);
        let monitor = monitor_with(dir.path(), Arc::clone(&prober), &["a", "b", "c"]);
        {
            let mut config = lock(&monitor.config);
            config.site_mut("c").unwrap().enabled = false;
        }

        let summary = monitor.detect_all(false).await;
        assert_eq!(summary.refreshed + summary.failed, 2, "disabled site skipped");
        assert_eq!(summary.failed, 1);
        assert_eq!(prober.calls(), 2);
    }

    #[tokio::test]
    async fn test_cold_start_serves_persisted_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let prober = ScriptedProber::new(vec![]);
        let monitor = monitor_with(dir.path(), Arc::clone(&prober), &["relay-one"]);
        monitor.detect_site("relay-one", true).await.unwrap();
        drop(monitor);

        // A fresh monitor over the same data dir has data before any probe.
        let reloaded =
            SiteMonitor::new(dir.path(), ScriptedProber::new(vec![]), VisibilityGate::new())
                .unwrap();
        let snapshot = reloaded.cached("relay-one").unwrap();
        assert_eq!(snapshot.data.balance, Some(25.0));
    }

    #[tokio::test]
    async fn test_add_site_persists_and_duplicate_fails() {
        let dir = tempfile::tempdir().unwrap();
        let monitor = monitor_with(dir.path(), ScriptedProber::new(vec![]), &[]);

        monitor
            .add_site(SiteConfig::new("relay-one", "https://relay.example.com"))
            .unwrap();
        let result = monitor.add_site(SiteConfig::new("relay-one", "https://other.example.com"));
        assert!(matches!(result, Err(SiteError::AlreadyExists { .. })));

        let on_disk = config_persistence::load_config(&dir.path().join("config.json")).unwrap();
        assert_eq!(on_disk.sites.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_site_detaches_timer_and_cell() {
        let dir = tempfile::tempdir().unwrap();
        let monitor = monitor_with(dir.path(), ScriptedProber::new(vec![]), &["relay-one"]);

        monitor
            .set_site_auto_refresh("relay-one", true, Some(5))
            .unwrap();
        assert_eq!(monitor.active_timers(), 1);

        monitor.detect_site("relay-one", true).await.unwrap();
        monitor.remove_site("relay-one").unwrap();

        assert_eq!(monitor.active_timers(), 0);
        assert!(monitor.cached("relay-one").is_none());
        assert!(load_snapshots(&dir.path().join("snapshots.json")).is_empty());
    }

    #[tokio::test]
    async fn test_auto_refresh_preference_clamps_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let monitor = monitor_with(dir.path(), ScriptedProber::new(vec![]), &["relay-one"]);

        monitor
            .set_site_auto_refresh("relay-one", true, Some(-5))
            .unwrap();

        let on_disk = config_persistence::load_config(&dir.path().join("config.json")).unwrap();
        let site = on_disk.site("relay-one").unwrap();
        assert!(site.auto_refresh);
        assert_eq!(site.auto_refresh_interval, Some(3));
    }

    #[tokio::test]
    async fn test_toggle_rearms_and_detaches_timer() {
        let dir = tempfile::tempdir().unwrap();
        let monitor = monitor_with(dir.path(), ScriptedProber::new(vec![]), &["relay-one"]);

        let enabled = monitor.toggle_site_auto_refresh("relay-one").unwrap();
        assert!(enabled);
        assert_eq!(monitor.active_timers(), 1);

        let enabled = monitor.toggle_site_auto_refresh("relay-one").unwrap();
        assert!(!enabled);
        assert_eq!(monitor.active_timers(), 0);
    }

    #[tokio::test]
    async fn test_start_arms_timers_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        let mut site = SiteConfig::new("relay-one", "https://relay.example.com");
        site.auto_refresh = true;
        site.auto_refresh_interval = Some(5);
        config.sites.push(site);
        config.sites.push(SiteConfig::new("relay-two", "https://two.example.com"));
        config.settings.auto_refresh = true;
        config_persistence::save_config(&dir.path().join("config.json"), &config).unwrap();

        let monitor =
            SiteMonitor::new(dir.path(), ScriptedProber::new(vec![]), VisibilityGate::new())
                .unwrap();
        monitor.start();

        // Sweep timer plus one per-site timer; relay-two has none.
        assert_eq!(monitor.active_timers(), 2);
        monitor.shutdown();
        assert_eq!(monitor.active_timers(), 0);
    }
}
