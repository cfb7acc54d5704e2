//! Arena-backed document with mutation recording.

use url::Url;

use super::{
    ChangeWatcher, Document, DomError, MutationRecord, ObserveOptions, WatchError,
    ADDRESS_ATTRIBUTE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
enum NodeKind {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text,
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct Observer {
    root: NodeId,
    options: ObserveOptions,
}

/// In-memory document. Node 0 is the document root.
///
/// Addresses are resolved against the document's base URL (when it has
/// one), the way a browser's `a.href` is. While observed, insertions and
/// attribute writes within the observed scope are queued as [`MutationRecord`]s until [`Tree::take_records`].
#[derive(Debug)]
pub struct Tree {
    base: Option<Url>,
    nodes: Vec<NodeData>,
    observer: Option<Observer>,
    records: Vec<MutationRecord<NodeId>>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Empty document without a base URL; addresses are reported as written.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Empty document with addresses resolved against `base`.
    pub fn with_base(base: Url) -> Self {
        Self::build(Some(base))
    }

    fn build(base: Option<Url>) -> Self {
        Self {
            base,
            nodes: vec![NodeData {
                kind: NodeKind::Element {
                    tag: "#document".to_string(),
                    attributes: Vec::new(),
                },
                parent: None,
                children: Vec::new(),
            }],
            observer: None,
            records: Vec::new(),
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
        })
    }

    /// Creates a detached `<a>` with the given address.
    pub fn create_anchor(&mut self, href: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: "a".to_string(),
            attributes: vec![(ADDRESS_ATTRIBUTE.to_string(), href.to_string())],
        })
    }

    pub fn create_text(&mut self) -> NodeId {
        self.push(NodeKind::Text)
    }

    /// Creates an anchor and appends it under `parent`.
    pub fn append_anchor(&mut self, parent: NodeId, href: &str) -> NodeId {
        let anchor = self.create_anchor(href);
        self.append_child(parent, anchor);
        anchor
    }

    pub fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    /// Moves `child` under `parent` (detaching it from any previous parent).
    ///
    /// Refused, returning false, for unknown nodes and when `child` is
    /// `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent)
            || !self.contains(child)
            || parent == child
            || self.is_descendant(parent, child)
        {
            return false;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);

        if self.observes(parent, |o| o.child_list) {
            self.records.push(MutationRecord::ChildList {
                target: parent,
                added: vec![child],
            });
        }
        true
    }

    /// Detaches `node` (and its subtree) from the document.
    pub fn remove(&mut self, node: NodeId) {
        self.detach(node);
    }

    fn detach(&mut self, node: NodeId) {
        let Some(data) = self.nodes.get_mut(node.0) else {
            return;
        };
        if let Some(parent) = data.parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            NodeKind::Text => None,
        }
    }

    /// Sets an attribute on an element; ignored for text nodes.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(NodeData {
            kind: NodeKind::Element { attributes, .. },
            ..
        }) = self.nodes.get_mut(node.0)
        else {
            return;
        };
        match attributes.iter().position(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(i) => attributes[i].1 = value.to_string(),
            None => attributes.push((name.to_ascii_lowercase(), value.to_string())),
        }

        if self.observes(node, |o| o.reports_attribute(name)) {
            self.records.push(MutationRecord::Attributes {
                target: node,
                attribute_name: name.to_ascii_lowercase(),
            });
        }
    }

    /// Drains queued mutation records.
    pub fn take_records(&mut self) -> Vec<MutationRecord<NodeId>> {
        std::mem::take(&mut self.records)
    }

    pub fn is_observed(&self) -> bool {
        self.observer.is_some()
    }

    fn observes(&self, target: NodeId, wants: impl Fn(&ObserveOptions) -> bool) -> bool {
        let Some(observer) = &self.observer else {
            return false;
        };
        if !wants(&observer.options) {
            return false;
        }
        if target == observer.root {
            return true;
        }
        observer.options.subtree && self.is_descendant(target, observer.root)
    }

    fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cur = self.nodes.get(node.0).and_then(|n| n.parent);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.nodes.get(p.0).and_then(|n| n.parent);
        }
        false
    }

    fn collect_linked(&self, node: NodeId, out: &mut Vec<NodeId>) {
        let Some(data) = self.nodes.get(node.0) else {
            return;
        };
        for &child in &data.children {
            if self.attribute(child, ADDRESS_ATTRIBUTE).is_some() {
                out.push(child);
            }
            self.collect_linked(child, out);
        }
    }
}

impl Document for Tree {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        self.contains(*node) && (*node == self.root() || self.is_descendant(*node, self.root()))
    }

    fn is_element(&self, node: &NodeId) -> bool {
        matches!(
            self.nodes.get(node.0).map(|n| &n.kind),
            Some(NodeKind::Element { .. })
        )
    }

    fn is_anchor(&self, node: &NodeId) -> bool {
        matches!(
            self.nodes.get(node.0).map(|n| &n.kind),
            Some(NodeKind::Element { tag, .. }) if tag == "a"
        )
    }

    /// The address attribute resolved against the base URL. Empty and
    /// unresolvable values are returned as written.
    fn href(&self, node: &NodeId) -> Option<String> {
        let raw = self.attribute(*node, ADDRESS_ATTRIBUTE)?;
        let resolved = match &self.base {
            Some(base) if !raw.is_empty() => base.join(raw).ok(),
            _ => None,
        };
        Some(resolved.map_or_else(|| raw.to_string(), String::from))
    }

    fn set_href(&mut self, node: &NodeId, href: &str) {
        self.set_attribute(*node, ADDRESS_ATTRIBUTE, href);
    }

    fn select_linked(&self, root: &NodeId) -> Result<Vec<NodeId>, DomError> {
        if !self.contains(*root) {
            return Err(DomError::Query(format!("unknown node {}", root.0)));
        }
        let mut out = Vec::new();
        self.collect_linked(*root, &mut out);
        Ok(out)
    }
}

/// Watcher that switches a [`Tree`]'s mutation recording on and off.
#[derive(Debug, Default)]
pub struct TreeWatcher {
    active: bool,
}

impl TreeWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl ChangeWatcher<Tree> for TreeWatcher {
    fn observe(
        &mut self,
        doc: &mut Tree,
        root: &NodeId,
        options: &ObserveOptions,
    ) -> Result<(), WatchError> {
        if !doc.is_connected(root) {
            return Err(WatchError::Install(format!(
                "node {} is not in the document",
                root.0
            )));
        }
        doc.observer = Some(Observer {
            root: *root,
            options: options.clone(),
        });
        self.active = true;
        Ok(())
    }

    fn disconnect(&mut self, doc: &mut Tree) {
        doc.observer = None;
        doc.records.clear();
        self.active = false;
    }
}
