//! CLI surface tests - argument parsing stays stable

use clap::Parser;
use std::path::PathBuf;
use vigilctl::cli::{Cli, Commands};

#[test]
fn status_parses_with_defaults() {
    let cli = Cli::try_parse_from(["vigilctl", "status"]).unwrap();
    assert!(cli.config.is_none());
    match cli.command {
        Commands::Status {
            timeout,
            probe,
            json,
        } => {
            assert!(timeout.is_none());
            assert!(probe.is_none());
            assert!(!json);
        }
        _ => panic!("expected status"),
    }
}

#[test]
fn status_accepts_overrides() {
    let cli = Cli::try_parse_from([
        "vigilctl",
        "status",
        "--config",
        "/tmp/fleet.toml",
        "--timeout",
        "2",
        "--probe",
        "uptime",
        "--json",
    ])
    .unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/fleet.toml")));
    match cli.command {
        Commands::Status {
            timeout,
            probe,
            json,
        } => {
            assert_eq!(timeout, Some(2));
            assert_eq!(probe.as_deref(), Some("uptime"));
            assert!(json);
        }
        _ => panic!("expected status"),
    }
}

#[test]
fn watch_interval_defaults_to_sixty() {
    let cli = Cli::try_parse_from(["vigilctl", "watch"]).unwrap();
    match cli.command {
        Commands::Watch { interval } => assert_eq!(interval, 60),
        _ => panic!("expected watch"),
    }
}

#[test]
fn hosts_import_flag_is_off_by_default() {
    let cli = Cli::try_parse_from(["vigilctl", "hosts"]).unwrap();
    match cli.command {
        Commands::Hosts { import_zshrc } => assert!(!import_zshrc),
        _ => panic!("expected hosts"),
    }
}

#[test]
fn unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["vigilctl", "frobnicate"]).is_err());
}
