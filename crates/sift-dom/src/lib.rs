//! Node tree model for the sift HTML query toolkit.
//!
//! This crate provides an arena-based tree of markup elements and text runs,
//! plus the traversal primitives the selector engine is built on.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships.
//! Every node is owned by the arena; the parent link is a plain index used only
//! for upward traversal, so there are no reference cycles and no `Rc`/`Weak`.
//!
//! Nodes are append-only: [`DomTree::create_child`] and
//! [`DomTree::create_text`] are the only ways to grow the tree, and nothing
//! reorders or removes children once they are attached.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the tree arena.
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The synthetic root every tree starts with is always at index 0.
    pub const SYNTHETIC_ROOT: Self = Self(0);
}

/// One markup element or one run of text.
///
/// Element nodes have a non-empty `tag` and empty `text`; text nodes have an
/// empty `tag` and carry their own decoded `text` (never their descendants').
#[derive(Debug, Clone, Default)]
pub struct Node {
    /// Element name, empty for text nodes.
    pub tag: String,

    /// The node's own text. Non-empty only for text nodes.
    pub text: String,

    /// Attribute name to value. Unique keys, unordered.
    pub attributes: AttributesMap,

    /// The `class` attribute split on single spaces, in written order.
    pub classes: Vec<String>,

    /// Mirrors the `id` attribute, or empty when absent.
    pub id: String,

    parent: Option<NodeId>,
    children: Vec<NodeId>,
    next_sibling: Option<NodeId>,
    prev_sibling: Option<NodeId>,
}

impl Node {
    fn with_tag(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    /// The containing node, or `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in document order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns true if this node has at least one child.
    #[must_use]
    pub const fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns true for text runs (nodes with an empty tag).
    #[must_use]
    pub const fn is_text(&self) -> bool {
        self.tag.is_empty()
    }

    /// Returns true if `class` is one of this node's classes.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Look up an attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Renders a compact label such as `div.main.test[id=main]`.
///
/// Attributes are listed in name order so the label is stable across runs.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        let mut attrs: Vec<(&String, &String)> = self.attributes.iter().collect();
        attrs.sort();
        for (key, value) in attrs {
            write!(f, "[{key}={value}]")?;
        }
        Ok(())
    }
}

/// Arena-based node tree with O(1) node access and parent/sibling navigation.
///
/// A fresh tree holds a single synthetic root ([`NodeId::SYNTHETIC_ROOT`]) with
/// an empty tag. Builders attach content under it and may later promote a
/// child to be the tree's root with [`DomTree::promote_to_root`].
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    nodes: Vec<Node>,

    /// The node traversals from the top of the document start at.
    root: NodeId,
}

impl DomTree {
    /// Create a tree holding only the synthetic root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            root: NodeId::SYNTHETIC_ROOT,
        }
    }

    /// Create a tree whose root is a single element named `tag`.
    ///
    /// Handy for building small trees by hand.
    #[must_use]
    pub fn with_root(tag: &str) -> Self {
        Self {
            nodes: vec![Node::with_tag(tag)],
            root: NodeId::SYNTHETIC_ROOT,
        }
    }

    /// The current root of the tree.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Make `id` the tree root and clear its parent link.
    ///
    /// The former parent keeps `id` in its child list but is no longer
    /// reachable from the root; it is only ever the synthetic root in practice.
    pub fn promote_to_root(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.parent = None;
            node.prev_sibling = None;
            node.next_sibling = None;
            self.root = id;
        }
    }

    /// Returns true if `id` is the invisible root a fresh tree starts with,
    /// as opposed to an element that was given index 0 by
    /// [`DomTree::with_root`].
    #[must_use]
    pub fn is_synthetic_root(&self, id: NodeId) -> bool {
        id == NodeId::SYNTHETIC_ROOT
            && self
                .get(id)
                .is_some_and(|n| n.tag.is_empty() && n.text.is_empty())
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get the number of nodes in the arena (including detached ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty (never true: there is always a root).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Appends `child` as the last child of `parent`, updating all relationships.
    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let prev_last_child = self.nodes[parent.0].children.last().copied();

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev_id);
        }
    }

    /// Append a new element named `tag` under `parent` and return it.
    ///
    /// Tags and ids carry no uniqueness constraint.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a node of this tree.
    pub fn create_child(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let child = self.alloc(Node::with_tag(tag));
        self.append_child(parent, child);
        child
    }

    /// Append a new text run under `parent` and return it.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a node of this tree.
    pub fn create_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let child = self.alloc(Node {
            text: text.to_string(),
            ..Node::default()
        });
        self.append_child(parent, child);
        child
    }

    /// Replace a node's attributes, deriving `classes` and `id` from them.
    ///
    /// `classes` is the `class` value split on single spaces (empty when the
    /// attribute is absent); `id` mirrors the `id` attribute.
    pub fn set_attributes(&mut self, id: NodeId, attributes: AttributesMap) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };
        node.classes = attributes
            .get("class")
            .map(|classes| classes.split(' ').map(str::to_string).collect())
            .unwrap_or_default();
        node.id = attributes.get("id").cloned().unwrap_or_default();
        node.attributes = attributes;
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Returns true if the node has at least one child.
    #[must_use]
    pub fn has_children(&self, id: NodeId) -> bool {
        !self.children(id).is_empty()
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// The parent's full child list, including `id` itself.
    ///
    /// A node without a parent is its own sibling set.
    #[must_use]
    pub fn siblings(&self, id: NodeId) -> Cow<'_, [NodeId]> {
        match self.parent(id) {
            Some(parent) => Cow::Borrowed(self.children(parent)),
            None => Cow::Owned(vec![id]),
        }
    }

    /// The sibling immediately before this node, if any.
    #[must_use]
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// The sibling immediately after this node, if any.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// All siblings strictly before this node, in document order.
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> &[NodeId] {
        let Some(parent) = self.parent(id) else {
            return &[];
        };
        let siblings = self.children(parent);
        let position = siblings.iter().position(|&s| s == id).unwrap_or(0);
        &siblings[..position]
    }

    /// Ancestors ordered from the root down to the immediate parent.
    ///
    /// The root's ancestor list is empty.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors: Vec<NodeId> = self.iter_ancestors(id).collect();
        ancestors.reverse();
        ancestors
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn iter_ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Number of ancestors above this node.
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.iter_ancestors(id).count()
    }

    /// Pre-order, depth-first walk over `id` and all of its descendants.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.get(id).is_some() {
            vec![id]
        } else {
            Vec::new()
        };
        Descendants { tree: self, stack }
    }

    /// This node's own text followed by the text of every descendant, in
    /// document order, with no separators.
    #[must_use]
    pub fn inner_text(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|d| self.get(d))
            .map(|n| n.text.as_str())
            .collect()
    }

    /// Visit `id` and then every descendant, pre-order.
    pub fn for_each<F>(&self, id: NodeId, f: F)
    where
        F: FnMut(NodeId),
    {
        self.descendants(id).for_each(f);
    }

    /// First node in pre-order (starting with `id` itself) for which
    /// `predicate` holds. Stops walking as soon as it is found.
    pub fn find<P>(&self, id: NodeId, mut predicate: P) -> Option<NodeId>
    where
        P: FnMut(NodeId) -> bool,
    {
        self.descendants(id).find(|&d| predicate(d))
    }

    /// Every node in the subtree rooted at `id` for which `predicate` holds,
    /// in document order.
    pub fn filter<P>(&self, id: NodeId, mut predicate: P) -> Vec<NodeId>
    where
        P: FnMut(NodeId) -> bool,
    {
        self.descendants(id).filter(|&d| predicate(d)).collect()
    }

    /// First node in the subtree whose tag equals `tag`.
    #[must_use]
    pub fn find_by_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.find(id, |d| self.get(d).is_some_and(|n| n.tag == tag))
    }

    /// Every node in the subtree whose tag equals `tag`.
    #[must_use]
    pub fn filter_by_tag(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
        self.filter(id, |d| self.get(d).is_some_and(|n| n.tag == tag))
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node, nearest first.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over a subtree.
///
/// Uses an explicit stack, so deep documents do not grow the call stack.
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        // Push children in reverse order so they're visited left-to-right
        self.stack.extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
