//! Bulk rewrite of every linked element under a subtree.

use std::collections::HashSet;

use crate::dom::Document;
use crate::rewriter::rewrite_if_applicable;
use crate::rules::RuleTable;

/// Result of scanning one or more subtrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Linked elements handed to the rewriter.
    pub visited: usize,
    /// Elements whose address was rewritten.
    pub rewritten: usize,
}

/// Rewrites every linked element under `root`; returns how many were modified.
///
/// A failing subtree query is logged and counts as zero rewrites.
pub fn scan_subtree<D: Document>(doc: &mut D, root: &D::Node, rules: &RuleTable) -> usize {
    let mut seen = HashSet::new();
    scan_subtree_into(doc, root, rules, &mut seen).rewritten
}

/// Rewrites every linked element in the document.
pub fn scan_document<D: Document>(doc: &mut D, rules: &RuleTable) -> usize {
    let root = doc.root();
    scan_subtree(doc, &root, rules)
}

/// Like [`scan_subtree`], but skips elements already in `seen` and records
/// every element it visits there.
pub fn scan_subtree_into<D: Document>(
    doc: &mut D,
    root: &D::Node,
    rules: &RuleTable,
    seen: &mut HashSet<D::Node>,
) -> ScanStats {
    let mut stats = ScanStats::default();
    let linked = match doc.select_linked(root) {
        Ok(nodes) => nodes,
        Err(e) => {
            tracing::error!("scan of {root:?} aborted: {e}");
            return stats;
        }
    };

    for node in linked {
        if !seen.insert(node.clone()) {
            continue;
        }
        stats.visited += 1;
        if rewrite_if_applicable(doc, &node, rules) {
            stats.rewritten += 1;
        }
    }
    stats
}
