//! Single-anchor rewrite.

use thiserror::Error;

use crate::deeplink::{is_deep_link, try_build_deep_link, TransformError};
use crate::dom::Document;
use crate::host::is_recognized_host;
use crate::rules::RuleTable;
use crate::url_model::{AddressError, ParsedAddress};

/// Why an anchor was left untouched.
#[derive(Debug, Error)]
pub enum RewriteSkip {
    #[error("node is not an anchor")]
    NotAnchor,
    #[error("anchor has no address")]
    NoAddress,
    #[error("address already uses the deep-link scheme")]
    AlreadyDeepLink,
    #[error(transparent)]
    Malformed(#[from] AddressError),
    #[error("host {0:?} is not recognized")]
    UnrecognizedHost(String),
    #[error(transparent)]
    NoMapping(#[from] TransformError),
    #[error("address is already up to date")]
    Unchanged,
}

/// Computes the deep link for a web address, checking every precondition
/// except the DOM ones.
pub fn try_convert(rules: &RuleTable, address: &str) -> Result<String, RewriteSkip> {
    if address.is_empty() {
        return Err(RewriteSkip::NoAddress);
    }
    if is_deep_link(address) {
        return Err(RewriteSkip::AlreadyDeepLink);
    }
    let parsed = ParsedAddress::parse(address)?;
    if !is_recognized_host(rules, &parsed.host) {
        return Err(RewriteSkip::UnrecognizedHost(parsed.host));
    }
    Ok(try_build_deep_link(rules, &parsed)?.to_string())
}

/// Rewrites `node`'s address when it maps to a different deep link.
///
/// Returns the new address on success.
pub fn try_rewrite<D: Document>(
    doc: &mut D,
    node: &D::Node,
    rules: &RuleTable,
) -> Result<String, RewriteSkip> {
    let href = doc
        .href(node)
        .filter(|h| !h.is_empty())
        .ok_or(RewriteSkip::NoAddress)?;
    if !doc.is_anchor(node) {
        return Err(RewriteSkip::NotAnchor);
    }

    let target = try_convert(rules, &href)?;
    if target == href {
        return Err(RewriteSkip::Unchanged);
    }
    doc.set_href(node, &target);
    Ok(target)
}

/// Fail-soft form of [`try_rewrite`]: true iff the anchor was modified.
pub fn rewrite_if_applicable<D: Document>(doc: &mut D, node: &D::Node, rules: &RuleTable) -> bool {
    match try_rewrite(doc, node, rules) {
        Ok(target) => {
            tracing::debug!("rewrote {node:?} -> {target}");
            true
        }
        Err(RewriteSkip::Malformed(e)) => {
            tracing::trace!("skipping {node:?}: {e}");
            false
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Tree;

    fn anchored(href: &str) -> (Tree, crate::dom::NodeId) {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.append_anchor(root, href);
        (tree, a)
    }

    #[test]
    fn rewrites_recognized_link() {
        let rules = RuleTable::default();
        let (mut tree, a) = anchored("https://t.me/durov");
        assert!(rewrite_if_applicable(&mut tree, &a, &rules));
        assert_eq!(tree.href(&a).as_deref(), Some("tg://resolve?domain=durov"));
    }

    #[test]
    fn second_application_is_a_noop() {
        let rules = RuleTable::default();
        let (mut tree, a) = anchored("https://telegram.me/+15551234567?text=hi");
        assert!(rewrite_if_applicable(&mut tree, &a, &rules));
        let once = tree.href(&a);
        assert!(!rewrite_if_applicable(&mut tree, &a, &rules));
        assert_eq!(tree.href(&a), once);
        assert!(matches!(
            try_rewrite(&mut tree, &a, &rules),
            Err(RewriteSkip::AlreadyDeepLink)
        ));
    }

    #[test]
    fn deep_links_are_never_touched() {
        let rules = RuleTable::default();
        let (mut tree, a) = anchored("tg://resolve?domain=other");
        assert!(!rewrite_if_applicable(&mut tree, &a, &rules));
        assert_eq!(tree.href(&a).as_deref(), Some("tg://resolve?domain=other"));
    }

    #[test]
    fn non_anchor_elements_are_skipped() {
        let rules = RuleTable::default();
        let mut tree = Tree::new();
        let root = tree.root();
        let area = tree.create_element("area");
        tree.set_attribute(area, "href", "https://t.me/durov");
        tree.append_child(root, area);
        assert!(matches!(
            try_rewrite(&mut tree, &area, &rules),
            Err(RewriteSkip::NotAnchor)
        ));
        assert_eq!(tree.href(&area).as_deref(), Some("https://t.me/durov"));
    }

    #[test]
    fn empty_and_missing_addresses_are_skipped() {
        let rules = RuleTable::default();
        let (mut tree, a) = anchored("");
        assert!(matches!(
            try_rewrite(&mut tree, &a, &rules),
            Err(RewriteSkip::NoAddress)
        ));
        let bare = tree.create_element("a");
        assert!(!rewrite_if_applicable(&mut tree, &bare, &rules));
    }

    #[test]
    fn malformed_and_foreign_addresses_are_skipped() {
        let rules = RuleTable::default();
        let (mut tree, a) = anchored("http://[broken");
        assert!(matches!(
            try_rewrite(&mut tree, &a, &rules),
            Err(RewriteSkip::Malformed(_))
        ));

        let (mut tree, a) = anchored("https://example.com/durov");
        assert!(matches!(
            try_rewrite(&mut tree, &a, &rules),
            Err(RewriteSkip::UnrecognizedHost(_))
        ));
        assert_eq!(tree.href(&a).as_deref(), Some("https://example.com/durov"));
    }

    #[test]
    fn unmappable_paths_are_skipped() {
        let rules = RuleTable::default();
        let (mut tree, a) = anchored("https://t.me/login");
        assert!(matches!(
            try_rewrite(&mut tree, &a, &rules),
            Err(RewriteSkip::NoMapping(TransformError::ReservedPath { .. }))
        ));
        assert_eq!(tree.href(&a).as_deref(), Some("https://t.me/login"));
    }

    #[test]
    fn scheme_relative_address_is_rewritten() {
        let rules = RuleTable::default();
        let mut tree = Tree::with_base(url::Url::parse("https://example.com/page").unwrap());
        let root = tree.root();
        let a = tree.append_anchor(root, "//t.me/durov");
        assert!(rewrite_if_applicable(&mut tree, &a, &rules));
        assert_eq!(tree.attribute(a, "href"), Some("tg://resolve?domain=durov"));
    }

    #[test]
    fn relative_address_on_service_page_is_rewritten() {
        let rules = RuleTable::default();
        let mut tree = Tree::with_base(url::Url::parse("https://t.me/").unwrap());
        let root = tree.root();
        let a = tree.append_anchor(root, "durov");
        let off_site = tree.append_anchor(root, "/login");
        assert!(rewrite_if_applicable(&mut tree, &a, &rules));
        assert_eq!(tree.attribute(a, "href"), Some("tg://resolve?domain=durov"));
        assert!(matches!(
            try_rewrite(&mut tree, &off_site, &rules),
            Err(RewriteSkip::NoMapping(_))
        ));
        assert_eq!(tree.attribute(off_site, "href"), Some("/login"));
    }

    #[test]
    fn relative_address_without_base_is_malformed() {
        let rules = RuleTable::default();
        let (mut tree, a) = anchored("//t.me/durov");
        assert!(matches!(
            try_rewrite(&mut tree, &a, &rules),
            Err(RewriteSkip::Malformed(_))
        ));
        assert_eq!(tree.attribute(a, "href"), Some("//t.me/durov"));
    }

    #[test]
    fn convert_without_dom() {
        let rules = RuleTable::default();
        assert_eq!(
            try_convert(&rules, "https://T.ME/contact/abc123").unwrap(),
            "tg://contact?token=abc123"
        );
        assert!(try_convert(&rules, "").is_err());
        assert!(try_convert(&rules, "TG://resolve?domain=x").is_err());
    }
}
