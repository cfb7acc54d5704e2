//! Mutation coalescing: many change notifications, one rescan per window.
//!
//! The coalescer is Idle until the first relevant node is queued, then
//! Scheduled until the caller's timer fires and [`Coalescer::flush`] drains
//! the pending set. Further changes while Scheduled only grow the set; the
//! window is fixed, not extended.

use std::collections::HashSet;
use std::time::Duration;

use crate::dom::{Document, MutationRecord, ADDRESS_ATTRIBUTE};
use crate::rewriter::rewrite_if_applicable;
use crate::rules::RuleTable;
use crate::scanner::scan_subtree_into;

/// Insertion-ordered set of nodes awaiting a rescan.
#[derive(Debug)]
pub struct PendingNodes<N> {
    order: Vec<N>,
    index: HashSet<N>,
}

impl<N> Default for PendingNodes<N> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            index: HashSet::new(),
        }
    }
}

impl<N: Clone + Eq + std::hash::Hash> PendingNodes<N> {
    /// Adds `node` unless already pending. Returns true if it was added.
    pub fn insert(&mut self, node: N) -> bool {
        if !self.index.insert(node.clone()) {
            return false;
        }
        self.order.push(node);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.index.clear();
    }

    /// Takes the current contents in insertion order, leaving the set empty.
    pub fn take(&mut self) -> Vec<N> {
        self.index.clear();
        std::mem::take(&mut self.order)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoalescerState {
    Idle,
    Scheduled,
}

/// Summary of one drained batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Pending nodes taken from the set.
    pub drained: usize,
    /// Pending nodes skipped because they had left the document.
    pub stale: usize,
    /// Linked elements handed to the rewriter.
    pub visited: usize,
    /// Elements whose address was rewritten.
    pub rewritten: usize,
}

/// Debounce buffer between the change watcher and the rewriter.
#[derive(Debug)]
pub struct Coalescer<N> {
    pending: PendingNodes<N>,
    state: CoalescerState,
    debounce: Duration,
}

impl<N: Clone + Eq + std::hash::Hash + std::fmt::Debug> Coalescer<N> {
    pub fn new(debounce: Duration) -> Self {
        Self {
            pending: PendingNodes::default(),
            state: CoalescerState::Idle,
            debounce,
        }
    }

    pub fn state(&self) -> CoalescerState {
        self.state
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Queues the nodes a batch of records makes relevant.
    ///
    /// Returns `Some(delay)` when this call moved the coalescer from Idle to
    /// Scheduled; the caller must then arm a one-shot timer for `delay` and
    /// call [`Coalescer::flush`] when it fires.
    pub fn observe<D>(&mut self, doc: &D, records: &[MutationRecord<N>]) -> Option<Duration>
    where
        D: Document<Node = N>,
    {
        for record in records {
            match record {
                MutationRecord::ChildList { added, .. } => {
                    for node in added.iter().filter(|n| doc.is_element(n)) {
                        self.pending.insert(node.clone());
                    }
                }
                MutationRecord::Attributes {
                    target,
                    attribute_name,
                } => {
                    if attribute_name.eq_ignore_ascii_case(ADDRESS_ATTRIBUTE)
                        && doc.is_anchor(target)
                    {
                        self.pending.insert(target.clone());
                    }
                }
            }
        }
        self.schedule()
    }

    /// Queues a single node directly.
    pub fn enqueue(&mut self, node: N) -> Option<Duration> {
        self.pending.insert(node);
        self.schedule()
    }

    fn schedule(&mut self) -> Option<Duration> {
        if self.state == CoalescerState::Idle && !self.pending.is_empty() {
            self.state = CoalescerState::Scheduled;
            return Some(self.debounce);
        }
        None
    }

    /// Drains the pending set in one pass and returns to Idle.
    ///
    /// Anchors are rewritten directly; any other node is scanned as a subtree
    /// root. Nodes no longer in the document are skipped. Each linked element
    /// is visited at most once per flush.
    pub fn flush<D>(&mut self, doc: &mut D, rules: &RuleTable) -> FlushReport
    where
        D: Document<Node = N>,
    {
        let batch = self.pending.take();
        self.state = CoalescerState::Idle;

        let mut report = FlushReport {
            drained: batch.len(),
            ..Default::default()
        };
        let mut seen = HashSet::new();

        for node in batch {
            if !doc.is_connected(&node) {
                report.stale += 1;
                continue;
            }
            if doc.is_anchor(&node) {
                if seen.insert(node.clone()) {
                    report.visited += 1;
                    if rewrite_if_applicable(doc, &node, rules) {
                        report.rewritten += 1;
                    }
                }
            } else {
                let stats = scan_subtree_into(doc, &node, rules, &mut seen);
                report.visited += stats.visited;
                report.rewritten += stats.rewritten;
            }
        }

        if report.drained > 0 {
            tracing::debug!(
                drained = report.drained,
                stale = report.stale,
                visited = report.visited,
                rewritten = report.rewritten,
                "coalesced rescan finished"
            );
        }
        report
    }

    /// Discards pending nodes and returns to Idle.
    pub fn cancel(&mut self) {
        self.pending.clear();
        self.state = CoalescerState::Idle;
    }
}
