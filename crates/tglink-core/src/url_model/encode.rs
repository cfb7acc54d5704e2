//! Component percent-encoding for deep-link query values.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;

/// Characters left as-is: ASCII alphanumerics and `-_.!~*'()`.
const COMPONENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("path segment {raw:?} does not decode to UTF-8")]
    InvalidUtf8 { raw: String },
}

/// Percent-encodes an already-decoded value. Total: every `&str` encodes.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT_ENCODE_SET).to_string()
}

/// Re-encodes a raw (still percent-encoded) path segment.
///
/// The segment is decoded first so that existing escapes are not encoded twice.
pub fn try_encode_segment(raw: &str) -> Result<String, EncodeError> {
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| EncodeError::InvalidUtf8 {
            raw: raw.to_string(),
        })?;
    Ok(encode_component(&decoded))
}

/// Like [`try_encode_segment`], but falls back to the raw segment on failure.
pub fn encode_segment(raw: &str) -> String {
    match try_encode_segment(raw) {
        Ok(encoded) => encoded,
        Err(e) => {
            tracing::warn!("{e}; passing segment through unmodified");
            raw.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreserved_characters_pass_through() {
        assert_eq!(encode_component("abc_XYZ-0.9!~*'()"), "abc_XYZ-0.9!~*'()");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(encode_component("a b&c=d/e?f#g"), "a%20b%26c%3Dd%2Fe%3Ff%23g");
        assert_eq!(encode_component("+1"), "%2B1");
        assert_eq!(encode_component("привет"), "%D0%BF%D1%80%D0%B8%D0%B2%D0%B5%D1%82");
    }

    #[test]
    fn segment_escapes_are_not_doubled() {
        assert_eq!(try_encode_segment("a%20b").unwrap(), "a%20b");
        assert_eq!(try_encode_segment("caf%C3%A9").unwrap(), "caf%C3%A9");
    }

    #[test]
    fn undecodable_segment_falls_back_to_raw() {
        assert!(try_encode_segment("bad%FFbyte").is_err());
        assert_eq!(encode_segment("bad%FFbyte"), "bad%FFbyte");
    }
}
