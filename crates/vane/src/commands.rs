use std::path::PathBuf;

use clap::ArgMatches;
use tracing::{info, warn};

use vane_core::config::types::SiteConfig;
use vane_core::config::{operations, persistence as config_persistence};
use vane_core::credit::storage::{load_storage, save_storage};
use vane_core::credit::types::{CreditConfigPatch, calculate_difference};
use vane_core::sites::persistence::load_snapshots;

use crate::table::{SiteRow, TableFormatter};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

pub fn run_command(matches: &ArgMatches) -> CommandResult {
    match matches.subcommand() {
        Some(("sites", sub)) => cmd_sites(sub),
        Some(("add", sub)) => cmd_add(sub),
        Some(("remove", sub)) => cmd_remove(sub),
        Some(("autorefresh", sub)) => cmd_autorefresh(sub),
        Some(("credit", _)) => cmd_credit(),
        Some(("settings", _)) => cmd_settings(),
        _ => unreachable!("subcommand is required by clap"),
    }
}

/// Data directory: $VANE_DIR, or ~/.vane.
fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("VANE_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".vane"),
        None => {
            eprintln!(
                "Warning: Could not find home directory. Set HOME or VANE_DIR. \
                 Using fallback directory."
            );
            std::env::temp_dir().join(".vane")
        }
    }
}

fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

fn cmd_sites(matches: &ArgMatches) -> CommandResult {
    let config = config_persistence::load_config(&config_path())?;
    let snapshots = load_snapshots(&data_dir().join("snapshots.json"));

    let show_all = matches.get_flag("all") || config.settings.show_disabled;
    let rows: Vec<SiteRow> = config
        .sites
        .iter()
        .filter(|site| show_all || site.enabled)
        .map(|site| SiteRow::build(site, &snapshots))
        .collect();

    if rows.is_empty() {
        println!("No sites configured. Add one with 'vane add <name> <url>'.");
        return Ok(());
    }

    TableFormatter::new(&rows).print_table(&rows);
    Ok(())
}

fn cmd_add(matches: &ArgMatches) -> CommandResult {
    let name = matches.get_one::<String>("name").expect("required");
    let url = matches.get_one::<String>("url").expect("required");

    let mut site = SiteConfig::new(name, url);
    site.api_key = matches.get_one::<String>("api-key").cloned();
    site.access_token = matches.get_one::<String>("token").cloned();
    site.user_id = matches.get_one::<String>("user-id").cloned();
    if let Some(group) = matches.get_one::<String>("group") {
        site.group = group.clone();
    }
    site.enabled = !matches.get_flag("disabled");

    let path = config_path();
    let mut config = config_persistence::load_config(&path)?;
    operations::add_site(&mut config, site)?;
    config_persistence::save_config(&path, &config)?;

    info!(event = "cli.add.completed", site = %name);
    println!("Added site '{}' ({})", name, url);
    Ok(())
}

fn cmd_remove(matches: &ArgMatches) -> CommandResult {
    let name = matches.get_one::<String>("name").expect("required");

    let path = config_path();
    let mut config = config_persistence::load_config(&path)?;
    operations::remove_site(&mut config, name)?;
    config_persistence::save_config(&path, &config)?;

    info!(event = "cli.remove.completed", site = %name);
    println!("Removed site '{}'", name);
    Ok(())
}

fn cmd_autorefresh(matches: &ArgMatches) -> CommandResult {
    let target = matches.get_one::<String>("target").expect("required");
    let enable = matches.get_flag("enable");
    let disable = matches.get_flag("disable");
    let toggle = matches.get_flag("toggle");
    let interval = matches.get_one::<i64>("interval").copied();

    match target.as_str() {
        "credit" => autorefresh_credit(enable, disable, toggle, interval),
        "detection" => autorefresh_detection(enable, disable, toggle, interval),
        site_name => autorefresh_site(site_name, enable, disable, toggle, interval),
    }
}

fn autorefresh_site(
    name: &str,
    enable: bool,
    disable: bool,
    toggle: bool,
    interval: Option<i64>,
) -> CommandResult {
    let path = config_path();
    let mut config = config_persistence::load_config(&path)?;

    if !enable && !disable && !toggle && interval.is_none() {
        let site = config
            .site(name)
            .ok_or_else(|| format!("Site '{}' not found", name))?;
        print_preference(
            &format!("site '{}'", name),
            site.auto_refresh,
            site.auto_refresh_interval,
        );
        return Ok(());
    }

    let (enabled, minutes) = if toggle {
        operations::toggle_site_auto_refresh(&mut config, name)?
    } else {
        let site = config
            .site(name)
            .ok_or_else(|| format!("Site '{}' not found", name))?;
        let enabled = if enable {
            true
        } else if disable {
            false
        } else {
            site.auto_refresh
        };
        operations::set_site_auto_refresh(&mut config, name, enabled, interval)?
    };
    config_persistence::save_config(&path, &config)?;

    info!(
        event = "cli.autorefresh.site_saved",
        site = name,
        enabled = enabled,
        interval_minutes = minutes,
    );
    print_preference(&format!("site '{}'", name), enabled, Some(minutes));
    Ok(())
}

fn autorefresh_detection(
    enable: bool,
    disable: bool,
    toggle: bool,
    interval: Option<i64>,
) -> CommandResult {
    let path = config_path();
    let mut config = config_persistence::load_config(&path)?;

    if !enable && !disable && !toggle && interval.is_none() {
        print_preference(
            "detection sweep",
            config.settings.auto_refresh,
            Some(config.settings.refresh_interval_minutes),
        );
        return Ok(());
    }

    let enabled = if toggle {
        !config.settings.auto_refresh
    } else if enable {
        true
    } else if disable {
        false
    } else {
        config.settings.auto_refresh
    };
    let (enabled, minutes) = operations::set_detection_auto_refresh(&mut config, enabled, interval);
    config_persistence::save_config(&path, &config)?;

    info!(
        event = "cli.autorefresh.detection_saved",
        enabled = enabled,
        interval_minutes = minutes,
    );
    print_preference("detection sweep", enabled, Some(minutes));
    Ok(())
}

fn autorefresh_credit(
    enable: bool,
    disable: bool,
    toggle: bool,
    interval: Option<i64>,
) -> CommandResult {
    let path = data_dir().join("credit.json");
    let mut storage = load_storage(&path);

    if !enable && !disable && !toggle && interval.is_none() {
        print_preference(
            "credit panel",
            storage.config.auto_refresh,
            Some(storage.config.refresh_interval_minutes),
        );
        return Ok(());
    }

    let auto_refresh = if toggle {
        Some(!storage.config.auto_refresh)
    } else if enable {
        Some(true)
    } else if disable {
        Some(false)
    } else {
        None
    };
    storage.config.apply(CreditConfigPatch {
        auto_refresh,
        refresh_interval_minutes: interval,
        ..Default::default()
    });
    save_storage(&path, &storage)?;

    info!(
        event = "cli.autorefresh.credit_saved",
        enabled = storage.config.auto_refresh,
        interval_minutes = storage.config.refresh_interval_minutes,
    );
    print_preference(
        "credit panel",
        storage.config.auto_refresh,
        Some(storage.config.refresh_interval_minutes),
    );
    Ok(())
}

fn print_preference(label: &str, enabled: bool, interval: Option<u32>) {
    let state = if enabled { "on" } else { "off" };
    match interval {
        Some(minutes) => println!("Auto-refresh for {}: {} (every {}m)", label, state, minutes),
        None => println!("Auto-refresh for {}: {} (no interval chosen)", label, state),
    }
}

fn cmd_credit() -> CommandResult {
    let storage = load_storage(&data_dir().join("credit.json"));

    if storage.cookies.is_none() {
        println!("Not logged in to the credit account.");
    }

    match storage.cached_info {
        Some(snapshot) => {
            let info = &snapshot.data;
            println!(
                "{} (trust level {})",
                if info.nickname.is_empty() {
                    &info.username
                } else {
                    &info.nickname
                },
                info.trust_level
            );
            println!("  balance:    {:.2}", info.community_balance);
            println!("  live score: {:.2}", info.gamification_score);
            println!(
                "  difference: {:+.2}",
                calculate_difference(info.gamification_score, info.community_balance)
            );
            println!("  available:  {}", info.available_balance);
            println!(
                "  updated:    {}",
                snapshot.last_updated.format("%Y-%m-%d %H:%M")
            );
        }
        None => println!("No cached credit data yet."),
    }

    if let Some(stats) = storage.cached_daily_stats {
        println!(
            "Last {} days: +{:.2} / -{:.2}",
            stats.data.items.len(),
            stats.data.total_income,
            stats.data.total_expense
        );
    }
    if let Some(transactions) = storage.cached_transactions {
        println!("Transactions cached: {}", transactions.data.total);
    }

    Ok(())
}

fn cmd_settings() -> CommandResult {
    let dir = data_dir();
    let config = match config_persistence::load_config(&dir.join("config.json")) {
        Ok(config) => config,
        Err(e) => {
            warn!(event = "cli.settings.config_load_failed", error = %e);
            eprintln!("Warning: Could not load config: {}. Showing defaults.", e);
            Default::default()
        }
    };

    println!("Data directory:  {}", dir.display());
    println!("Config file:     {}", dir.join("config.json").display());
    println!("Sites:           {}", config.sites.len());
    println!("Probe timeout:   {}s", config.settings.timeout_secs);
    println!("Concurrent:      {}", config.settings.concurrent);
    println!("Show disabled:   {}", config.settings.show_disabled);
    println!(
        "Detection sweep: {} (every {}m)",
        if config.settings.auto_refresh {
            "on"
        } else {
            "off"
        },
        config.settings.refresh_interval_minutes
    );
    Ok(())
}
