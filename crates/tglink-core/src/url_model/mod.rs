//! Address modeling: parsing a web address into host, path segments and
//! query parameters, plus the component encoder used for deep-link output.

mod encode;

pub use encode::{encode_component, encode_segment, try_encode_segment, EncodeError};

use thiserror::Error;
use url::Url;

/// Why an address string could not be modeled.
#[derive(Debug, Error)]
pub enum AddressError {
    #[error("malformed address {input:?}: {source}")]
    Malformed {
        input: String,
        #[source]
        source: url::ParseError,
    },
}

/// A web address reduced to what the transform engine consults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    /// Hostname as reported by the URL parser (empty when the address has none).
    pub host: String,
    /// Non-empty `/`-delimited path components, still percent-encoded.
    pub segments: Vec<String>,
    /// Decoded query pairs in document order; keys may repeat.
    pub query: Vec<(String, String)>,
}

impl ParsedAddress {
    /// Parses an absolute address.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let url = Url::parse(input).map_err(|source| AddressError::Malformed {
            input: input.to_string(),
            source,
        })?;
        Ok(Self::from_url(&url))
    }

    pub fn from_url(url: &Url) -> Self {
        let segments = url
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        let query = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self {
            host: url.host_str().unwrap_or_default().to_string(),
            segments,
            query,
        }
    }

    /// First value for `key`, if the parameter is present at all.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_query(&self, key: &str) -> bool {
        self.query.iter().any(|(k, _)| k == key)
    }
}
