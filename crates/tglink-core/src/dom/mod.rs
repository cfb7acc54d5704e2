//! Host document interface.
//!
//! The rewriter never owns the page: it reads and writes anchor addresses
//! through [`Document`] and receives change batches from a [`ChangeWatcher`].
//! [`Tree`] is an in-memory implementation, and [`SharedTree`] lets a page
//! driver and the rewriter hold the same one.

mod shared;
mod tree;

pub use shared::SharedTree;
pub use tree::{NodeId, Tree, TreeWatcher};

use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// Attribute holding an element's address.
pub const ADDRESS_ATTRIBUTE: &str = "href";

#[derive(Debug, Error)]
pub enum DomError {
    #[error("subtree query failed: {0}")]
    Query(String),
}

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("change watcher could not be installed: {0}")]
    Install(String),
}

/// Read/write view of a live document.
pub trait Document {
    /// Handle to a node owned by the document.
    type Node: Clone + Eq + Hash + Debug;

    fn root(&self) -> Self::Node;

    /// False once the node has been detached from the document.
    fn is_connected(&self, node: &Self::Node) -> bool;

    fn is_element(&self, node: &Self::Node) -> bool;

    /// True for anchor (`<a>`) elements.
    fn is_anchor(&self, node: &Self::Node) -> bool;

    /// The node's resolved address, if it carries one.
    fn href(&self, node: &Self::Node) -> Option<String>;

    fn set_href(&mut self, node: &Self::Node, href: &str);

    /// Descendants of `root` carrying an address attribute, in document order.
    fn select_linked(&self, root: &Self::Node) -> Result<Vec<Self::Node>, DomError>;
}

/// What a change watcher should report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObserveOptions {
    pub child_list: bool,
    pub subtree: bool,
    pub attributes: bool,
    /// Attribute names to report; empty means all.
    pub attribute_filter: Vec<String>,
}

impl ObserveOptions {
    /// Structural and address-attribute changes anywhere under the root.
    pub fn links() -> Self {
        Self {
            child_list: true,
            subtree: true,
            attributes: true,
            attribute_filter: vec![ADDRESS_ATTRIBUTE.to_string()],
        }
    }

    pub fn reports_attribute(&self, name: &str) -> bool {
        self.attributes
            && (self.attribute_filter.is_empty()
                || self.attribute_filter.iter().any(|a| a.eq_ignore_ascii_case(name)))
    }
}

/// One change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord<N> {
    /// Nodes inserted under `target`. Only the inserted roots are listed.
    ChildList { target: N, added: Vec<N> },
    Attributes { target: N, attribute_name: String },
}

/// Source of change notifications over a document subtree.
pub trait ChangeWatcher<D: Document> {
    fn observe(
        &mut self,
        doc: &mut D,
        root: &D::Node,
        options: &ObserveOptions,
    ) -> Result<(), WatchError>;

    fn disconnect(&mut self, doc: &mut D);
}
