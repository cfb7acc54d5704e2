//! Logging init: structured output to stderr, filtered by `RUST_LOG`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "warn,tglink=info,tglink_core=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize structured logging to stderr.
///
/// Returns Err if a global subscriber is already installed, so the caller can
/// decide whether that matters (the CLI just keeps going).
pub fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    tracing::debug!("tglink logging initialized");
    Ok(())
}
