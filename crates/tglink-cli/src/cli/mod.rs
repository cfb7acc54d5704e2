//! CLI for the tglink deep-link rewriter.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tglink_core::rules;

use commands::{run_convert, run_host, run_rules};

/// Top-level CLI for tglink.
#[derive(Debug, Parser)]
#[command(name = "tglink")]
#[command(about = "tglink: turn Telegram web links into tg:// deep links", long_about = None)]
pub struct Cli {
    /// Rules file (TOML). Defaults to $XDG_CONFIG_HOME/tglink/rules.toml if present.
    #[arg(long, global = true, value_name = "PATH")]
    pub rules: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the deep link for each URL ("-" when there is none).
    Convert {
        /// Web addresses to convert. Reads one per line from stdin when omitted.
        urls: Vec<String>,
        /// Emit one JSON object per line instead of plain text.
        #[arg(long)]
        json: bool,
    },

    /// Report whether a hostname belongs to the service.
    Host {
        /// Hostname to check, e.g. t.me.
        hostname: String,
    },

    /// Print the effective rule table as TOML.
    Rules,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        let table = rules::load_or_default(cli.rules.as_deref())?;
        tracing::debug!("loaded rules: {:?}", table);

        match cli.command {
            CliCommand::Convert { urls, json } => run_convert(&table, urls, json),
            CliCommand::Host { hostname } => run_host(&table, &hostname),
            CliCommand::Rules => run_rules(&table),
        }
    }
}

#[cfg(test)]
mod tests;
