//! In-memory host tree.
//!
//! [`Document`] is an arena of element, text and comment nodes parsed from
//! markup with the armature markup scanner. It implements [`HostTree`] and
//! records every insertion, removal and effective text change in a journal,
//! so the runtime's DOM churn can be counted.

use que_armature::markup::{Markup, MarkupScanner, StartTag};
use que_carton::{is_void_tag, CompactString};

use crate::host::{Attribute, HostTree, NodeId, NodeKind};
use crate::selector::Selector;

/// A recorded host tree mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Inserted { parent: NodeId, node: NodeId },
    Removed { parent: NodeId, node: NodeId },
    TextChanged { node: NodeId },
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    tag: CompactString,
    attributes: Vec<Attribute>,
    /// Text or comment data
    data: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn element(tag: &str) -> Self {
        Self::new(NodeKind::Element, tag, String::new())
    }

    fn text(data: String) -> Self {
        Self::new(NodeKind::Text, "", data)
    }

    fn comment(data: String) -> Self {
        Self::new(NodeKind::Comment, "", data)
    }

    fn new(kind: NodeKind, tag: &str, data: String) -> Self {
        Self {
            kind,
            tag: CompactString::from(tag),
            attributes: Vec::new(),
            data,
            parent: None,
            children: Vec::new(),
        }
    }
}

const ROOT: NodeId = NodeId(0);

/// Arena-backed document with a synthetic root node
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    journal: Vec<Mutation>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            nodes: vec![NodeData::element("")],
            journal: Vec::new(),
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse markup. Unclosed elements are closed at end of input; stray
    /// closing tags are ignored. Parsing does not touch the journal.
    pub fn parse(source: &str) -> Self {
        let mut builder = TreeBuilder::new();
        for item in MarkupScanner::new(source) {
            match item {
                Markup::Text(text) => {
                    builder.append(NodeData::text(htmlize::unescape(text).into_owned()));
                }
                Markup::Start(tag) => builder.start(tag),
                Markup::End(name) => builder.end(name),
                Markup::Comment(body) => {
                    builder.append(NodeData::comment(body.to_string()));
                }
            }
        }
        builder.finish()
    }

    /// The synthetic root holding top-level nodes
    pub const fn root(&self) -> NodeId {
        ROOT
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::element(&tag.to_ascii_lowercase()))
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let attributes = &mut self.nodes[node.index()].attributes;
        match attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = CompactString::from(value),
            None => attributes.push(Attribute {
                name: CompactString::from(name),
                value: CompactString::from(value),
            }),
        }
    }

    pub fn journal(&self) -> &[Mutation] {
        &self.journal
    }

    /// Drain the journal
    pub fn take_journal(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.journal)
    }

    /// Whether `node` is reachable from the root
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        while let Some(parent) = self.node(current).parent {
            current = parent;
        }
        current == ROOT
    }

    /// Serialize the whole document
    pub fn to_html(&self) -> String {
        self.inner_html(ROOT)
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in &self.node(node).children {
            self.write_node(*child, &mut out);
        }
        out
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let data = self.node(node);
        match data.kind {
            NodeKind::Text => out.push_str(&data.data),
            NodeKind::Comment => {}
            NodeKind::Element => {
                for child in &data.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        let data = self.node(node);
        match data.kind {
            NodeKind::Text => out.push_str(&htmlize::escape_text(data.data.as_str())),
            NodeKind::Comment => {
                out.push_str("<!--");
                out.push_str(&data.data);
                out.push_str("-->");
            }
            NodeKind::Element => {
                out.push('<');
                out.push_str(&data.tag);
                for attr in &data.attributes {
                    out.push(' ');
                    out.push_str(&attr.name);
                    if !attr.value.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&htmlize::escape_attribute(attr.value.as_str()));
                        out.push('"');
                    }
                }
                out.push('>');
                if is_void_tag(&data.tag) {
                    return;
                }
                for child in &data.children {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(&data.tag);
                out.push('>');
            }
        }
    }

    #[inline]
    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(data);
        id
    }

    /// Append without journaling; used while parsing
    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
    }

    fn position(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.node(parent).children.iter().position(|id| *id == child)
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.node(child).parent {
            self.remove_child(parent, child);
        }
    }

    fn place(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
        let children = &mut self.nodes[parent.index()].children;
        match index {
            Some(index) => children.insert(index, child),
            None => children.push(child),
        }
        self.nodes[child.index()].parent = Some(parent);
        self.journal.push(Mutation::Inserted {
            parent,
            node: child,
        });
    }

    fn find_element(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        for child in &self.node(node).children {
            let data = self.node(*child);
            if data.kind != NodeKind::Element {
                continue;
            }
            if selector.matches(
                &data.tag,
                self.attribute(*child, "id"),
                self.attribute(*child, "class"),
            ) {
                return Some(*child);
            }
            if let Some(found) = self.find_element(*child, selector) {
                return Some(found);
            }
        }
        None
    }
}

impl HostTree for Document {
    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let Some(parsed) = Selector::parse(selector) else {
            tracing::warn!(selector, "unsupported selector");
            return None;
        };
        self.find_element(ROOT, &parsed)
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        self.node(node).kind
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        let data = self.node(node);
        (data.kind == NodeKind::Element && node != ROOT).then_some(data.tag.as_str())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)
            .attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    fn attributes(&self, node: NodeId) -> &[Attribute] {
        &self.node(node).attributes
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Option<CompactString> {
        let attributes = &mut self.nodes[node.index()].attributes;
        let index = attributes.iter().position(|attr| attr.name == name)?;
        Some(attributes.remove(index).value)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        let data = self.node(node);
        (data.kind != NodeKind::Element).then_some(data.data.as_str())
    }

    fn create_text_node(&mut self, text: &str) -> NodeId {
        self.push(NodeData::text(text.to_string()))
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        let data = &mut self.nodes[node.index()].data;
        if data != text {
            text.clone_into(data);
            self.journal.push(Mutation::TextChanged { node });
        }
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.place(parent, child, None);
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.detach(child);
        let index = self.position(parent, reference);
        self.place(parent, child, index);
    }

    fn insert_after(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.detach(child);
        let index = self.position(parent, reference).map(|index| index + 1);
        self.place(parent, child, index);
    }

    fn prepend(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.place(parent, child, Some(0));
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(index) = self.position(parent, child) else {
            return false;
        };
        self.nodes[parent.index()].children.remove(index);
        self.nodes[child.index()].parent = None;
        self.journal.push(Mutation::Removed {
            parent,
            node: child,
        });
        true
    }
}

// ========== Parsing ==========

struct TreeBuilder {
    document: Document,
    /// Open elements; the root is always at the bottom
    stack: Vec<NodeId>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            document: Document::default(),
            stack: vec![ROOT],
        }
    }

    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(ROOT)
    }

    fn append(&mut self, data: NodeData) -> NodeId {
        let id = self.document.push(data);
        let parent = self.current();
        self.document.link(parent, id);
        id
    }

    fn start(&mut self, tag: StartTag<'_>) {
        let name = tag.name.to_ascii_lowercase();
        let mut element = NodeData::element(&name);
        for raw in tag.attributes {
            let name = CompactString::from(raw.name.to_ascii_lowercase());
            // First occurrence wins
            if element.attributes.iter().any(|attr| attr.name == name) {
                continue;
            }
            let value = raw.value.map(htmlize::unescape).unwrap_or_default();
            element.attributes.push(Attribute {
                name,
                value: CompactString::from(value.as_ref()),
            });
        }
        let id = self.append(element);
        if !tag.self_closing && !is_void_tag(&name) {
            self.stack.push(id);
        }
    }

    fn end(&mut self, name: &str) {
        let name = name.to_ascii_lowercase();
        if is_void_tag(&name) {
            return;
        }
        let document = &self.document;
        match self
            .stack
            .iter()
            .skip(1)
            .rposition(|id| document.node(*id).tag == name)
        {
            Some(index) => self.stack.truncate(index + 1),
            None => tracing::debug!(tag = %name, "ignoring stray closing tag"),
        }
    }

    fn finish(self) -> Document {
        if self.stack.len() > 1 {
            tracing::debug!(unclosed = self.stack.len() - 1, "closing elements at end of input");
        }
        self.document
    }
}
