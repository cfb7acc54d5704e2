//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn parse_convert_with_urls() {
    let cli = parse(&["tglink", "convert", "https://t.me/durov", "https://t.me/+1"]);
    assert!(cli.rules.is_none());
    match cli.command {
        CliCommand::Convert { urls, json } => {
            assert_eq!(urls, vec!["https://t.me/durov", "https://t.me/+1"]);
            assert!(!json);
        }
        other => panic!("expected Convert, got {other:?}"),
    }
}

#[test]
fn parse_convert_stdin_json() {
    let cli = parse(&["tglink", "convert", "--json"]);
    match cli.command {
        CliCommand::Convert { urls, json } => {
            assert!(urls.is_empty());
            assert!(json);
        }
        other => panic!("expected Convert, got {other:?}"),
    }
}

#[test]
fn parse_global_rules_flag_after_subcommand() {
    let cli = parse(&["tglink", "host", "t.me", "--rules", "/tmp/rules.toml"]);
    assert_eq!(
        cli.rules.as_deref(),
        Some(std::path::Path::new("/tmp/rules.toml"))
    );
    match cli.command {
        CliCommand::Host { hostname } => assert_eq!(hostname, "t.me"),
        other => panic!("expected Host, got {other:?}"),
    }
}

#[test]
fn parse_rules() {
    let cli = parse(&["tglink", "rules"]);
    assert!(matches!(cli.command, CliCommand::Rules));
}

#[test]
fn host_requires_argument() {
    assert!(Cli::try_parse_from(["tglink", "host"]).is_err());
}
