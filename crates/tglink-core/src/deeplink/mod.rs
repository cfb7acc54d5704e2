//! Deep links in the `tg://` scheme and the engine that derives them from
//! web addresses.

mod error;
mod transform;

pub use error::TransformError;
pub use transform::{build_deep_link, try_build_deep_link};

use std::fmt;

/// Scheme of every link this crate produces.
pub const DEEP_LINK_SCHEME: &str = "tg";

/// Who a `resolve` link points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveTarget {
    /// Public username.
    Domain(String),
    /// Phone number digits, without the leading `+`.
    Phone(String),
}

/// A native-app link. All carried values are already percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepLink {
    Resolve {
        target: ResolveTarget,
        text: Option<String>,
        profile: bool,
    },
    Contact {
        token: String,
    },
    Background {
        slug: String,
        mode: Option<String>,
    },
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeepLink::Resolve {
                target,
                text,
                profile,
            } => {
                match target {
                    ResolveTarget::Domain(user) => {
                        write!(f, "{DEEP_LINK_SCHEME}://resolve?domain={user}")?
                    }
                    ResolveTarget::Phone(digits) => {
                        write!(f, "{DEEP_LINK_SCHEME}://resolve?phone={digits}")?
                    }
                }
                if let Some(text) = text {
                    write!(f, "&text={text}")?;
                }
                if *profile {
                    write!(f, "&profile=1")?;
                }
                Ok(())
            }
            DeepLink::Contact { token } => write!(f, "{DEEP_LINK_SCHEME}://contact?token={token}"),
            DeepLink::Background { slug, mode } => {
                write!(f, "{DEEP_LINK_SCHEME}://bg?slug={slug}")?;
                if let Some(mode) = mode {
                    write!(f, "&mode={mode}")?;
                }
                Ok(())
            }
        }
    }
}

/// True if `address` already uses the deep-link scheme (any letter case).
pub fn is_deep_link(address: &str) -> bool {
    let bytes = address.trim_start().as_bytes();
    let n = DEEP_LINK_SCHEME.len();
    bytes.len() > n
        && bytes[..n].eq_ignore_ascii_case(DEEP_LINK_SCHEME.as_bytes())
        && bytes[n] == b':'
}
