//! Subcommand implementations.

mod convert;
mod host;
mod rules;

pub use convert::run_convert;
pub use host::run_host;
pub use rules::run_rules;
