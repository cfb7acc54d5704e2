//! Host matching against the rule table's hostname set.
//!
//! Exact, case-insensitive comparison only. Subdomains that are not listed
//! explicitly are rejected.

use crate::rules::RuleTable;

/// True if `hostname` is one of the service's recognized hosts.
pub fn is_recognized_host(rules: &RuleTable, hostname: &str) -> bool {
    if hostname.is_empty() {
        return false;
    }
    rules.hosts.contains(&hostname.to_ascii_lowercase())
}
