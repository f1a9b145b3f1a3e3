use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("vane")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect and configure API gateway site monitoring")
        .long_about(
            "vane keeps a local cache of balance, model and usage data for a list of \
             API-gateway sites plus one credit account. The CLI reads that cache and \
             edits the monitoring preferences; probing itself is driven by the desktop app.",
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only emit error-level logs")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("sites")
                .about("List monitored sites with their cached status")
                .arg(
                    Arg::new("all")
                        .long("all")
                        .help("Include disabled sites regardless of the show_disabled setting")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("add")
                .about("Add a site to the monitored list")
                .arg(Arg::new("name").help("Site name").required(true).index(1))
                .arg(Arg::new("url").help("Site base URL").required(true).index(2))
                .arg(
                    Arg::new("api-key")
                        .long("api-key")
                        .help("API key used by the prober"),
                )
                .arg(
                    Arg::new("token")
                        .long("token")
                        .help("System access token used by the prober"),
                )
                .arg(
                    Arg::new("user-id")
                        .long("user-id")
                        .help("Account user id for probe requests"),
                )
                .arg(
                    Arg::new("group")
                        .long("group")
                        .help("Group id to sort the site into"),
                )
                .arg(
                    Arg::new("disabled")
                        .long("disabled")
                        .help("Add the site without enabling probing")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove a site and its cached data")
                .arg(Arg::new("name").help("Site name").required(true).index(1)),
        )
        .subcommand(
            Command::new("autorefresh")
                .about("Show or change auto-refresh preferences")
                .long_about(
                    "Targets: a site name, 'detection' for the global sweep over the \
                     site list, or 'credit' for the credit panel. Without flags the \
                     current preference is printed. Intervals are clamped to the \
                     target's minimum.",
                )
                .arg(
                    Arg::new("target")
                        .help("Site name, 'detection', or 'credit'")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("enable")
                        .long("enable")
                        .help("Turn auto-refresh on")
                        .action(ArgAction::SetTrue)
                        .conflicts_with_all(["disable", "toggle"]),
                )
                .arg(
                    Arg::new("disable")
                        .long("disable")
                        .help("Turn auto-refresh off (the interval is kept)")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("toggle"),
                )
                .arg(
                    Arg::new("toggle")
                        .long("toggle")
                        .help("Invert the auto-refresh flag")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .short('i')
                        .help("Refresh interval in minutes")
                        .allow_hyphen_values(true)
                        .value_parser(clap::value_parser!(i64)),
                ),
        )
        .subcommand(Command::new("credit").about("Show cached credit account data"))
        .subcommand(Command::new("settings").about("Show data paths and global settings"))
}
