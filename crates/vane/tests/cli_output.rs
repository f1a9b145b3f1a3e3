//! Integration tests for CLI output behavior

use std::process::Command;

/// Execute a vane subcommand against an isolated data directory.
fn run_vane(dir: &std::path::Path, args: &[&str]) -> std::process::Output {
    let output = Command::new(env!("CARGO_BIN_EXE_vane"))
        .args(args)
        .env("VANE_DIR", dir)
        .output()
        .expect("Failed to execute vane");

    assert!(
        output.status.success(),
        "vane {:?} failed with exit code {:?}. stderr: {}",
        args,
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    output
}

/// Verify that stdout contains only user-facing output (no JSON logs)
/// and that any stderr output is structured JSON logs.
#[test]
fn test_sites_stdout_is_clean() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_vane(dir.path(), &["sites"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        !stdout.contains(r#""event":"#),
        "stdout should not contain JSON logs, got: {}",
        stdout
    );

    if !stderr.is_empty() {
        assert!(
            stderr.contains(r#""timestamp""#) || stderr.contains(r#""level""#),
            "stderr should contain structured logs, got: {}",
            stderr
        );
    }
}

#[test]
fn test_empty_site_list_hint() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_vane(dir.path(), &["sites"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No sites configured"));
}

#[test]
fn test_add_then_list_shows_site() {
    let dir = tempfile::tempdir().unwrap();
    run_vane(dir.path(), &["add", "relay-one", "https://relay.example.com"]);

    let output = run_vane(dir.path(), &["sites"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("relay-one"));
    assert!(stdout.contains("never"), "no snapshot cached yet");
}

#[test]
fn test_autorefresh_clamps_negative_interval() {
    let dir = tempfile::tempdir().unwrap();
    run_vane(dir.path(), &["add", "relay-one", "https://relay.example.com"]);

    let output = run_vane(
        dir.path(),
        &["autorefresh", "relay-one", "--enable", "--interval", "-5"],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("every 3m"),
        "interval clamped to the site floor, got: {}",
        stdout
    );
}

#[test]
fn test_autorefresh_toggle_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    run_vane(dir.path(), &["add", "relay-one", "https://relay.example.com"]);
    run_vane(
        dir.path(),
        &["autorefresh", "relay-one", "--enable", "--interval", "12"],
    );

    let output = run_vane(dir.path(), &["autorefresh", "relay-one", "--toggle"]);
    assert!(String::from_utf8_lossy(&output.stdout).contains("off (every 12m)"));

    let output = run_vane(dir.path(), &["autorefresh", "relay-one", "--toggle"]);
    assert!(
        String::from_utf8_lossy(&output.stdout).contains("on (every 12m)"),
        "re-enable restores the stored cadence"
    );
}

#[test]
fn test_autorefresh_credit_clamps_to_credit_floor() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_vane(
        dir.path(),
        &["autorefresh", "credit", "--enable", "--interval", "1"],
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("every 5m"));
}

#[test]
fn test_credit_without_login() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_vane(dir.path(), &["credit"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Not logged in"));
    assert!(stdout.contains("No cached credit data"));
}

#[test]
fn test_settings_shows_paths_and_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_vane(dir.path(), &["settings"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Data directory"));
    assert!(stdout.contains("every 30m"), "detection default is 30 minutes");
}
