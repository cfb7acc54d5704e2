//! Path/query classification: web address -> deep link.

use crate::rules::RuleTable;
use crate::url_model::{encode_component, encode_segment, ParsedAddress};

use super::{DeepLink, ResolveTarget, TransformError};

/// `/s/<name>` is a share redirect for `/<name>`.
const SHORT_PATH_MARKER: &str = "s";
const CONTACT_MARKER: &str = "contact";
const BACKGROUND_MARKER: &str = "bg";

/// Builds the deep link for `addr`, or explains why none exists.
///
/// Markers are matched case-insensitively; echoed values keep their casing.
/// The short-path marker is unwrapped once only, so `/s/s/name` is treated
/// as `/s/name`.
pub fn try_build_deep_link(
    rules: &RuleTable,
    addr: &ParsedAddress,
) -> Result<DeepLink, TransformError> {
    let segments = match addr.segments.as_slice() {
        [marker, rest @ ..] if marker.eq_ignore_ascii_case(SHORT_PATH_MARKER) && !rest.is_empty() => {
            rest
        }
        all => all,
    };

    let (first, second) = match segments {
        [] => return Err(TransformError::NoSegments),
        [first, rest @ ..] => (first.as_str(), rest.first().map(String::as_str)),
    };

    if let Some(token) = second.filter(|_| first.eq_ignore_ascii_case(CONTACT_MARKER)) {
        return Ok(DeepLink::Contact {
            token: encode_segment(token),
        });
    }

    if let Some(slug) = second.filter(|_| first.eq_ignore_ascii_case(BACKGROUND_MARKER)) {
        return Ok(DeepLink::Background {
            slug: encode_segment(slug),
            mode: addr.query_value("mode").map(encode_component),
        });
    }

    if let Some(digits) = first.strip_prefix('+') {
        if digits.is_empty() {
            return Err(TransformError::EmptyPhone);
        }
        return Ok(resolve(addr, ResolveTarget::Phone(encode_segment(digits))));
    }

    if rules.is_reserved(first) {
        return Err(TransformError::ReservedPath {
            segment: first.to_string(),
        });
    }
    if !rules.is_valid_username(first) {
        return Err(TransformError::InvalidUsername {
            segment: first.to_string(),
        });
    }
    Ok(resolve(addr, ResolveTarget::Domain(encode_segment(first))))
}

/// `resolve` link with the optional `text` and `profile` forwarding.
fn resolve(addr: &ParsedAddress, target: ResolveTarget) -> DeepLink {
    DeepLink::Resolve {
        target,
        text: addr.query_value("text").map(encode_component),
        profile: addr.has_query("profile"),
    }
}

/// Fail-soft form of [`try_build_deep_link`]: any reason for "no mapping" is `None`.
pub fn build_deep_link(rules: &RuleTable, addr: &ParsedAddress) -> Option<DeepLink> {
    match try_build_deep_link(rules, addr) {
        Ok(link) => Some(link),
        Err(e) => {
            tracing::trace!("no deep link for {:?}: {e}", addr.segments);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(path: &str) -> Option<String> {
        let rules = RuleTable::default();
        let addr = ParsedAddress::parse(&format!("https://t.me{path}")).unwrap();
        build_deep_link(&rules, &addr).map(|l| l.to_string())
    }

    fn reason(path: &str) -> TransformError {
        let rules = RuleTable::default();
        let addr = ParsedAddress::parse(&format!("https://t.me{path}")).unwrap();
        try_build_deep_link(&rules, &addr).unwrap_err()
    }

    #[test]
    fn username() {
        assert_eq!(convert("/durov").as_deref(), Some("tg://resolve?domain=durov"));
        assert_eq!(
            convert("/Durov_Bot").as_deref(),
            Some("tg://resolve?domain=Durov_Bot")
        );
        // Trailing segments (e.g. a post id) do not change the target.
        assert_eq!(convert("/durov/42").as_deref(), Some("tg://resolve?domain=durov"));
    }

    #[test]
    fn username_with_text_and_profile() {
        assert_eq!(
            convert("/durov?text=hello%20world&profile").as_deref(),
            Some("tg://resolve?domain=durov&text=hello%20world&profile=1")
        );
        assert_eq!(
            convert("/durov?profile=0").as_deref(),
            Some("tg://resolve?domain=durov&profile=1")
        );
        assert_eq!(
            convert("/durov?text=a%26b&text=second").as_deref(),
            Some("tg://resolve?domain=durov&text=a%26b")
        );
    }

    #[test]
    fn phone() {
        assert_eq!(
            convert("/+15551234567?text=hi").as_deref(),
            Some("tg://resolve?phone=15551234567&text=hi")
        );
        assert_eq!(
            convert("/+15551234567?profile").as_deref(),
            Some("tg://resolve?phone=15551234567&profile=1")
        );
    }

    #[test]
    fn bare_plus_has_no_mapping() {
        assert_eq!(convert("/+"), None);
        assert_eq!(reason("/+"), TransformError::EmptyPhone);
    }

    #[test]
    fn contact() {
        assert_eq!(
            convert("/contact/abc123").as_deref(),
            Some("tg://contact?token=abc123")
        );
        assert_eq!(
            convert("/CONTACT/AbC123").as_deref(),
            Some("tg://contact?token=AbC123")
        );
        assert_eq!(convert("/contact"), None);
    }

    #[test]
    fn background() {
        assert_eq!(
            convert("/bg/pattern1?mode=dark").as_deref(),
            Some("tg://bg?slug=pattern1&mode=dark")
        );
        assert_eq!(convert("/bg/pattern1").as_deref(), Some("tg://bg?slug=pattern1"));
        assert_eq!(
            convert("/bg/a%20b?mode=x%20y").as_deref(),
            Some("tg://bg?slug=a%20b&mode=x%20y")
        );
        assert_eq!(convert("/bg"), None);
    }

    #[test]
    fn short_path_is_unwrapped_once() {
        assert_eq!(convert("/s/durov"), convert("/durov"));
        assert_eq!(
            convert("/S/contact/tok").as_deref(),
            Some("tg://contact?token=tok")
        );
        assert_eq!(
            convert("/s/+15551234567").as_deref(),
            Some("tg://resolve?phone=15551234567")
        );
        // Nested markers are not unwrapped further: the second `s` is reserved.
        assert_eq!(convert("/s/s/durov"), None);
        // A lone marker is itself reserved.
        assert_eq!(convert("/s"), None);
    }

    #[test]
    fn reserved_paths_are_never_usernames() {
        assert_eq!(convert("/login"), None);
        assert_eq!(convert("/Proxy?server=x"), None);
        assert_eq!(convert("/joinchat/AAAA"), None);
        assert_eq!(
            reason("/login"),
            TransformError::ReservedPath {
                segment: "login".into()
            }
        );
    }

    #[test]
    fn invalid_usernames() {
        assert_eq!(convert("/ab"), None);
        assert_eq!(convert("/with-dash"), None);
        assert_eq!(convert("/caf%C3%A9"), None);
        assert!(matches!(
            reason("/ab"),
            TransformError::InvalidUsername { .. }
        ));
    }

    #[test]
    fn root_has_no_mapping() {
        assert_eq!(convert("/"), None);
        assert_eq!(reason("/"), TransformError::NoSegments);
    }

    #[test]
    fn undecodable_token_passes_through_raw() {
        assert_eq!(
            convert("/contact/x%FFy").as_deref(),
            Some("tg://contact?token=x%FFy")
        );
    }
}
