//! Rule table: recognized hosts, reserved first path segments, username syntax,
//! and the debounce interval. Built once at load and never mutated.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_HOSTS: &[&str] = &[
    "t.me",
    "www.t.me",
    "telegram.me",
    "www.telegram.me",
    "telegram.dog",
    "www.telegram.dog",
];

const DEFAULT_RESERVED: &[&str] = &[
    "addemoji",
    "addlist",
    "addstickers",
    "addtheme",
    "apps",
    "auth",
    "bg",
    "blog",
    "boost",
    "c",
    "confirmphone",
    "contact",
    "dl",
    "faq",
    "invoice",
    "iv",
    "joinchat",
    "login",
    "m",
    "proxy",
    "s",
    "setlanguage",
    "share",
    "socks",
];

/// Immutable rule table shared by the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    /// Hostnames belonging to the service (compared case-insensitively).
    #[serde(default = "default_hosts")]
    pub hosts: BTreeSet<String>,
    /// First path segments the service routes itself; never usernames.
    #[serde(default = "default_reserved_paths")]
    pub reserved_paths: BTreeSet<String>,
    /// Minimum username length (usernames are ASCII alphanumeric or `_`).
    #[serde(default = "default_username_min_len")]
    pub username_min_len: usize,
    /// Fixed coalescing window for DOM mutations, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_hosts() -> BTreeSet<String> {
    DEFAULT_HOSTS.iter().map(|s| s.to_string()).collect()
}

fn default_reserved_paths() -> BTreeSet<String> {
    DEFAULT_RESERVED.iter().map(|s| s.to_string()).collect()
}

fn default_username_min_len() -> usize {
    3
}

fn default_debounce_ms() -> u64 {
    100
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            hosts: default_hosts(),
            reserved_paths: default_reserved_paths(),
            username_min_len: default_username_min_len(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl RuleTable {
    /// Lower-cases hosts and reserved words so lookups can be exact.
    pub fn normalized(self) -> Self {
        Self {
            hosts: self
                .hosts
                .into_iter()
                .map(|h| h.trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
            reserved_paths: self
                .reserved_paths
                .into_iter()
                .map(|w| w.trim().to_ascii_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
            ..self
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// True if `segment` is a first path segment the service reserves.
    pub fn is_reserved(&self, segment: &str) -> bool {
        self.reserved_paths.contains(&segment.to_ascii_lowercase())
    }

    /// Username syntax: ASCII alphanumeric or underscore, at least `username_min_len` chars.
    pub fn is_valid_username(&self, candidate: &str) -> bool {
        candidate.len() >= self.username_min_len
            && candidate
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_')
    }
}

/// Existing rules file under `$XDG_CONFIG_HOME/tglink/rules.toml` (or an XDG config dir), if any.
pub fn find_rules_file() -> Option<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tglink").ok()?;
    xdg_dirs.find_config_file("rules.toml")
}

/// Parse a rule table from TOML text.
pub fn from_toml_str(data: &str) -> Result<RuleTable> {
    let table: RuleTable = toml::from_str(data).context("invalid rules TOML")?;
    Ok(table.normalized())
}

/// Load the rule table from `path`, or from the XDG location when `path` is None.
///
/// No file at the XDG location yields the built-in table; the file is never
/// created. An explicit `path` must exist.
pub fn load_or_default(path: Option<&Path>) -> Result<RuleTable> {
    let path = match path.map(Path::to_path_buf).or_else(find_rules_file) {
        Some(p) => p,
        None => return Ok(RuleTable::default()),
    };

    let data = fs::read_to_string(&path)
        .with_context(|| format!("failed to read rules from {}", path.display()))?;
    let table = from_toml_str(&data)?;
    tracing::info!(
        "loaded {} hosts and {} reserved paths from {}",
        table.hosts.len(),
        table.reserved_paths.len(),
        path.display()
    );
    Ok(table)
}
