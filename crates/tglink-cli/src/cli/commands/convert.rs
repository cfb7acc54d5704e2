//! `tglink convert` – map web addresses to deep links.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use tglink_core::rewriter::try_convert;
use tglink_core::rules::RuleTable;

#[derive(Debug, Serialize)]
struct Conversion<'a> {
    input: &'a str,
    deep_link: Option<String>,
}

/// One output line for `input`.
pub(crate) fn render(rules: &RuleTable, input: &str, json: bool) -> Result<String> {
    let deep_link = match try_convert(rules, input) {
        Ok(link) => Some(link),
        Err(skip) => {
            tracing::debug!("{input}: {skip}");
            None
        }
    };
    if json {
        return Ok(serde_json::to_string(&Conversion { input, deep_link })?);
    }
    Ok(deep_link.unwrap_or_else(|| "-".to_string()))
}

pub fn run_convert(rules: &RuleTable, urls: Vec<String>, json: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !urls.is_empty() {
        for url in &urls {
            writeln!(out, "{}", render(rules, url, json)?)?;
        }
        return Ok(());
    }

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        let url = line.trim();
        if url.is_empty() {
            continue;
        }
        writeln!(out, "{}", render(rules, url, json)?)?;
    }
    Ok(())
}
