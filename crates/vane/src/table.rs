use vane_core::config::types::SiteConfig;
use vane_core::sites::persistence::SnapshotMap;

/// One printable row of the sites listing: config joined with the cached
/// snapshot, already formatted.
pub struct SiteRow {
    pub name: String,
    pub status: String,
    pub balance: String,
    pub today: String,
    pub models: String,
    pub auto: String,
    pub updated: String,
}

impl SiteRow {
    pub fn build(site: &SiteConfig, snapshots: &SnapshotMap) -> Self {
        let snapshot = snapshots.get(&site.name);

        let status = if !site.enabled {
            "disabled".to_string()
        } else if snapshot.is_some() {
            "cached".to_string()
        } else {
            "never".to_string()
        };

        let auto = if site.auto_refresh {
            format!(
                "{}m",
                site.auto_refresh_interval
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "5".to_string())
            )
        } else {
            "off".to_string()
        };

        let (balance, today, models, updated) = match snapshot {
            Some(snapshot) => (
                snapshot
                    .data
                    .balance
                    .map(|b| format!("{:.2}", b))
                    .unwrap_or_else(|| "-".to_string()),
                snapshot
                    .data
                    .today_usage
                    .map(|u| format!("{:.2}", u))
                    .unwrap_or_else(|| "-".to_string()),
                snapshot.data.models.len().to_string(),
                snapshot.last_updated.format("%Y-%m-%d %H:%M").to_string(),
            ),
            None => (
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
            ),
        };

        Self {
            name: site.name.clone(),
            status,
            balance,
            today,
            models,
            auto,
            updated,
        }
    }
}

pub struct TableFormatter {
    name_width: usize,
    status_width: usize,
    balance_width: usize,
    today_width: usize,
    models_width: usize,
    auto_width: usize,
    updated_width: usize,
}

impl TableFormatter {
    pub fn new(rows: &[SiteRow]) -> Self {
        let name_width = rows
            .iter()
            .map(|row| row.name.len())
            .max()
            .unwrap_or(16)
            .clamp(4, 40);

        Self {
            name_width,
            status_width: 8,
            balance_width: 10,
            today_width: 8,
            models_width: 6,
            auto_width: 5,
            updated_width: 16,
        }
    }

    pub fn print_table(&self, rows: &[SiteRow]) {
        println!("{}", self.header_row());
        println!("{}", self.separator());
        for row in rows {
            self.print_row(row);
        }
    }

    fn header_row(&self) -> String {
        format!(
            "{:<nw$}  {:<sw$}  {:>bw$}  {:>tw$}  {:>mw$}  {:<aw$}  {:<uw$}",
            "NAME",
            "STATUS",
            "BALANCE",
            "TODAY",
            "MODELS",
            "AUTO",
            "UPDATED",
            nw = self.name_width,
            sw = self.status_width,
            bw = self.balance_width,
            tw = self.today_width,
            mw = self.models_width,
            aw = self.auto_width,
            uw = self.updated_width,
        )
    }

    fn separator(&self) -> String {
        let total = self.name_width
            + self.status_width
            + self.balance_width
            + self.today_width
            + self.models_width
            + self.auto_width
            + self.updated_width
            + 12;
        "-".repeat(total)
    }

    fn print_row(&self, row: &SiteRow) {
        println!(
            "{:<nw$}  {:<sw$}  {:>bw$}  {:>tw$}  {:>mw$}  {:<aw$}  {:<uw$}",
            truncate(&row.name, self.name_width),
            truncate(&row.status, self.status_width),
            truncate(&row.balance, self.balance_width),
            truncate(&row.today, self.today_width),
            truncate(&row.models, self.models_width),
            truncate(&row.auto, self.auto_width),
            truncate(&row.updated, self.updated_width),
            nw = self.name_width,
            sw = self.status_width,
            bw = self.balance_width,
            tw = self.today_width,
            mw = self.models_width,
            aw = self.auto_width,
            uw = self.updated_width,
        );
    }
}

/// Truncate a string to `max_len` characters, appending `…` when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
