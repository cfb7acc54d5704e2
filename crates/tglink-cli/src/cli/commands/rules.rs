//! `tglink rules` – dump the effective rule table.

use anyhow::Result;
use tglink_core::rules::RuleTable;

pub fn run_rules(rules: &RuleTable) -> Result<()> {
    print!("{}", toml::to_string_pretty(rules)?);
    Ok(())
}
