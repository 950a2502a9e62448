//! Host tree contract.
//!
//! The runtime never owns the document it renders into. It reads attributes
//! and text and moves nodes around through [`HostTree`], addressing nodes by
//! [`NodeId`] handles issued by the host.

use que_carton::CompactString;

/// Handle to a node in a host tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    Comment,
}

/// Element attribute, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: CompactString,
    pub value: CompactString,
}

/// The document tree a component is mounted into
pub trait HostTree {
    /// First element matching `selector`, in document order
    fn query_selector(&self, selector: &str) -> Option<NodeId>;

    fn kind(&self, node: NodeId) -> NodeKind;

    /// Lowercase tag name; `None` for non-elements
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    fn attributes(&self, node: NodeId) -> &[Attribute];

    /// Remove an attribute, returning its value
    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Option<CompactString>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn children(&self, node: NodeId) -> &[NodeId];

    /// Data of a text or comment node
    fn text(&self, node: NodeId) -> Option<&str>;

    /// Create a detached text node
    fn create_text_node(&mut self, text: &str) -> NodeId;

    fn set_text(&mut self, node: NodeId, text: &str);

    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Insert `child` before `reference`, or at the end when `reference`
    /// is not a child of `parent`
    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId);

    /// Insert `child` after `reference`, or at the end when `reference`
    /// is not a child of `parent`
    fn insert_after(&mut self, parent: NodeId, child: NodeId, reference: NodeId);

    fn prepend(&mut self, parent: NodeId, child: NodeId);

    /// Detach `child`. Returns `false` if it was not a child of `parent`.
    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool;

    /// Element children of `node`, in order
    fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|child| self.kind(*child) == NodeKind::Element)
            .collect()
    }
}
