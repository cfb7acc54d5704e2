pub mod rules;
pub mod logging;

pub mod coalescer;
pub mod deeplink;
pub mod dom;
pub mod host;
pub mod lifecycle;
pub mod rewriter;
pub mod scanner;
pub mod url_model;
