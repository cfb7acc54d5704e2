//! `tglink host` – check a hostname against the rule table.

use anyhow::Result;
use tglink_core::host::is_recognized_host;
use tglink_core::rules::RuleTable;

pub fn run_host(rules: &RuleTable, hostname: &str) -> Result<()> {
    if is_recognized_host(rules, hostname) {
        println!("{hostname}: recognized");
    } else {
        println!("{hostname}: not recognized");
    }
    Ok(())
}
