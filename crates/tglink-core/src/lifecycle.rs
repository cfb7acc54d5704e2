//! Page lifecycle: initial scan, change watching, debounced rescans, teardown.
//!
//! [`Controller`] owns all per-page state. [`run_page`] drives one on a
//! single tokio task: mutation batches arrive on a channel, the debounce
//! timer is a `sleep_until` deadline, and an unload signal ends the page.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::coalescer::{Coalescer, FlushReport};
use crate::dom::{ChangeWatcher, Document, MutationRecord, ObserveOptions};
use crate::rules::RuleTable;
use crate::scanner::scan_document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, `start` not yet called.
    Created,
    /// Initial scan done and watcher installed.
    Watching,
    /// Watcher could not be installed; the page keeps its initial rewrites only.
    Inert,
    TornDown,
}

/// Per-page rewriter state.
pub struct Controller<D: Document, W> {
    doc: D,
    watcher: W,
    rules: RuleTable,
    coalescer: Coalescer<D::Node>,
    phase: Phase,
}

impl<D, W> Controller<D, W>
where
    D: Document,
    W: ChangeWatcher<D>,
{
    pub fn new(doc: D, watcher: W, rules: RuleTable) -> Self {
        let coalescer = Coalescer::new(rules.debounce());
        Self {
            doc,
            watcher,
            rules,
            coalescer,
            phase: Phase::Created,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn watcher(&self) -> &W {
        &self.watcher
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn pending_len(&self) -> usize {
        self.coalescer.pending_len()
    }

    /// Rewrites the whole document, then installs the change watcher.
    ///
    /// Returns the number of anchors rewritten by the initial scan. Calling
    /// it again after the first time does nothing.
    pub fn start(&mut self) -> usize {
        if self.phase != Phase::Created {
            return 0;
        }
        let rewritten = scan_document(&mut self.doc, &self.rules);
        tracing::info!("initial scan rewrote {rewritten} links");

        let root = self.doc.root();
        match self
            .watcher
            .observe(&mut self.doc, &root, &ObserveOptions::links())
        {
            Ok(()) => self.phase = Phase::Watching,
            Err(e) => {
                tracing::error!("{e}; later page changes will not be rewritten");
                self.phase = Phase::Inert;
            }
        }
        rewritten
    }

    /// Feeds a batch of change records. Returns the delay for a timer to arm,
    /// if this batch opened a new debounce window.
    pub fn handle_mutations(&mut self, records: &[MutationRecord<D::Node>]) -> Option<Duration> {
        if self.phase != Phase::Watching {
            return None;
        }
        self.coalescer.observe(&self.doc, records)
    }

    /// Timer callback: runs the coalesced rescan.
    pub fn on_timer(&mut self) -> FlushReport {
        if self.phase != Phase::Watching {
            return FlushReport::default();
        }
        self.coalescer.flush(&mut self.doc, &self.rules)
    }

    /// Disconnects the watcher and drops pending work.
    pub fn teardown(&mut self) {
        if self.phase == Phase::TornDown {
            return;
        }
        if self.phase == Phase::Watching {
            self.watcher.disconnect(&mut self.doc);
        }
        self.coalescer.cancel();
        self.phase = Phase::TornDown;
        tracing::debug!("page torn down");
    }
}

/// Drives `controller` until `unload` fires (or its sender is dropped) or
/// the mutation channel closes, then tears it down and hands it back.
///
/// Only one debounce deadline is armed at a time; batches arriving while it
/// is armed join the pending window.
pub async fn run_page<D, W>(
    mut controller: Controller<D, W>,
    mut mutations: mpsc::UnboundedReceiver<Vec<MutationRecord<D::Node>>>,
    mut unload: oneshot::Receiver<()>,
) -> Controller<D, W>
where
    D: Document,
    W: ChangeWatcher<D>,
{
    controller.start();
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            _ = &mut unload => break,
            batch = mutations.recv() => {
                let Some(records) = batch else { break };
                if let Some(delay) = controller.handle_mutations(&records) {
                    deadline = Some(Instant::now() + delay);
                }
            }
            _ = sleep_until_armed(deadline) => {
                deadline = None;
                controller.on_timer();
            }
        }
    }

    controller.teardown();
    controller
}

async fn sleep_until_armed(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
