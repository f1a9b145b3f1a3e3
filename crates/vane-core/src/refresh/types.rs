use std::fmt;
use std::time::Duration;

/// A named schedulable entity: the whole site list, one site, or the
/// credit account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetId {
    /// The global detection sweep over every enabled site.
    Detection,
    /// Auto-refresh for a single site, keyed by site name.
    Site(String),
    /// The credit-panel refresh.
    Credit,
}

impl TargetId {
    pub fn kind(&self) -> TargetKind {
        match self {
            TargetId::Detection => TargetKind::Detection,
            TargetId::Site(_) => TargetKind::Site,
            TargetId::Credit => TargetKind::Credit,
        }
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetId::Detection => write!(f, "detection"),
            TargetId::Site(name) => write!(f, "site:{}", name),
            TargetId::Credit => write!(f, "credit"),
        }
    }
}

/// The three refresh target kinds, each carrying its interval floor and
/// default. Both the timers and the configuration layer consult these — a
/// saved interval can never slip under the cadence the scheduler enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Detection,
    Site,
    Credit,
}

impl TargetKind {
    /// Minimum refresh interval in minutes.
    pub fn min_interval_minutes(self) -> u32 {
        match self {
            TargetKind::Detection | TargetKind::Site => 3,
            TargetKind::Credit => 5,
        }
    }

    /// Default refresh interval in minutes, used when the user never chose one.
    pub fn default_interval_minutes(self) -> u32 {
        match self {
            TargetKind::Detection => 30,
            TargetKind::Site | TargetKind::Credit => 5,
        }
    }

    /// Clamp a user-supplied interval to this kind's floor.
    pub fn clamp_interval(self, minutes: i64) -> u32 {
        let floor = self.min_interval_minutes();
        if minutes < i64::from(floor) {
            floor
        } else {
            u32::try_from(minutes).unwrap_or(u32::MAX)
        }
    }

    /// Timer period for a configured interval, clamp applied.
    pub fn period(self, interval_minutes: u32) -> Duration {
        let minutes = self.clamp_interval(i64::from(interval_minutes));
        Duration::from_secs(u64::from(minutes) * 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_floors_per_kind() {
        assert_eq!(TargetKind::Detection.min_interval_minutes(), 3);
        assert_eq!(TargetKind::Site.min_interval_minutes(), 3);
        assert_eq!(TargetKind::Credit.min_interval_minutes(), 5);
    }

    #[test]
    fn test_interval_defaults_per_kind() {
        assert_eq!(TargetKind::Detection.default_interval_minutes(), 30);
        assert_eq!(TargetKind::Site.default_interval_minutes(), 5);
        assert_eq!(TargetKind::Credit.default_interval_minutes(), 5);
    }

    #[test]
    fn test_clamp_enforces_floor_for_any_input() {
        for raw in [-100i64, -5, 0, 1, 2] {
            assert_eq!(TargetKind::Site.clamp_interval(raw), 3);
            assert_eq!(TargetKind::Credit.clamp_interval(raw), 5);
        }
        assert_eq!(TargetKind::Site.clamp_interval(3), 3);
        assert_eq!(TargetKind::Site.clamp_interval(240), 240);
        assert_eq!(TargetKind::Credit.clamp_interval(5), 5);
    }

    #[test]
    fn test_clamp_is_idempotent() {
        for kind in [TargetKind::Detection, TargetKind::Site, TargetKind::Credit] {
            for raw in -10i64..120 {
                let once = kind.clamp_interval(raw);
                let twice = kind.clamp_interval(i64::from(once));
                assert_eq!(once, twice);
                assert!(once >= kind.min_interval_minutes());
            }
        }
    }

    #[test]
    fn test_period_converts_clamped_minutes() {
        assert_eq!(TargetKind::Site.period(5), Duration::from_secs(300));
        // Below the floor the period snaps to the floor, not to the raw value.
        assert_eq!(TargetKind::Site.period(1), Duration::from_secs(180));
        assert_eq!(TargetKind::Credit.period(1), Duration::from_secs(300));
    }

    #[test]
    fn test_target_id_display_and_kind() {
        assert_eq!(TargetId::Detection.to_string(), "detection");
        assert_eq!(TargetId::Site("relay".to_string()).to_string(), "site:relay");
        assert_eq!(TargetId::Credit.to_string(), "credit");
        assert_eq!(TargetId::Site("relay".to_string()).kind(), TargetKind::Site);
    }
}
