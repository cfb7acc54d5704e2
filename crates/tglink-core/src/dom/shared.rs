//! Shared handle to a [`Tree`], for when the page and the rewriter both hold it.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use super::{ChangeWatcher, Document, DomError, NodeId, ObserveOptions, Tree, TreeWatcher, WatchError};

#[derive(Debug, Clone, Default)]
pub struct SharedTree(Rc<RefCell<Tree>>);

impl SharedTree {
    pub fn new(tree: Tree) -> Self {
        Self(Rc::new(RefCell::new(tree)))
    }

    pub fn borrow(&self) -> Ref<'_, Tree> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Tree> {
        self.0.borrow_mut()
    }
}

impl Document for SharedTree {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        self.borrow().root()
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        self.borrow().is_connected(node)
    }

    fn is_element(&self, node: &NodeId) -> bool {
        self.borrow().is_element(node)
    }

    fn is_anchor(&self, node: &NodeId) -> bool {
        self.borrow().is_anchor(node)
    }

    fn href(&self, node: &NodeId) -> Option<String> {
        self.borrow().href(node)
    }

    fn set_href(&mut self, node: &NodeId, href: &str) {
        self.borrow_mut().set_href(node, href)
    }

    fn select_linked(&self, root: &NodeId) -> Result<Vec<NodeId>, DomError> {
        self.borrow().select_linked(root)
    }
}

impl ChangeWatcher<SharedTree> for TreeWatcher {
    fn observe(
        &mut self,
        doc: &mut SharedTree,
        root: &NodeId,
        options: &ObserveOptions,
    ) -> Result<(), WatchError> {
        ChangeWatcher::<Tree>::observe(self, &mut doc.borrow_mut(), root, options)
    }

    fn disconnect(&mut self, doc: &mut SharedTree) {
        ChangeWatcher::<Tree>::disconnect(self, &mut doc.borrow_mut())
    }
}
