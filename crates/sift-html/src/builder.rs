//! Tag-stream tree construction.
//!
//! The builder keeps a single "current node" cursor, starting at the tree's
//! synthetic root. Start tags create a child and descend into it, end tags
//! climb back out one level, and text runs are attached where the cursor is.
//! There is no name matching on end tags: nesting is trusted to be balanced.

use sift_common::text::normalize_whitespace;
use sift_common::warning::warn_once;
use sift_dom::{AttributesMap, DomTree, NodeId};

use crate::tokenizer::{Attribute, Token, tokenize};

/// Elements that never have children. A start tag for one of these is
/// treated exactly like a self-closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link", "meta",
    "param", "source", "track", "wbr",
];

/// Returns true if `tag` is in [`VOID_ELEMENTS`].
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Incremental builder fed one token at a time.
///
/// ```
/// use sift_html::{Token, TreeBuilder};
///
/// let mut builder = TreeBuilder::new();
/// builder.process(&Token::start_tag("p", vec![]));
/// builder.process(&Token::text("  hello \n world "));
/// builder.process(&Token::end_tag("p"));
/// let tree = builder.finish();
///
/// let root = tree.root();
/// assert_eq!(tree.get(root).map(|n| n.tag.as_str()), Some("p"));
/// assert_eq!(tree.inner_text(root), "hello world");
/// ```
pub struct TreeBuilder {
    tree: DomTree,
    current: NodeId,
}

impl TreeBuilder {
    /// Create a builder whose cursor sits on a fresh synthetic root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: DomTree::new(),
            current: NodeId::SYNTHETIC_ROOT,
        }
    }

    /// The node new content is currently attached to.
    #[must_use]
    pub const fn current_node(&self) -> NodeId {
        self.current
    }

    /// Apply one token to the tree.
    ///
    /// Comments, doctypes and the end-of-file marker leave the tree unchanged.
    pub fn process(&mut self, token: &Token) {
        match token {
            Token::StartTag { name, attributes } => {
                let child = self.insert_element(name, attributes);
                if !is_void_element(name) {
                    self.current = child;
                }
            }
            Token::SelfClosingTag { name, attributes } => {
                let _ = self.insert_element(name, attributes);
            }
            Token::EndTag { name } => self.close_element(name),
            Token::Text { data } => {
                let text = normalize_whitespace(data);
                if !text.is_empty() {
                    let _ = self.tree.create_text(self.current, &text);
                }
            }
            Token::Comment { .. } | Token::Doctype { .. } | Token::EndOfFile => {}
        }
    }

    fn insert_element(&mut self, name: &str, attributes: &[Attribute]) -> NodeId {
        let child = self.tree.create_child(self.current, name);
        self.tree
            .set_attributes(child, Self::attributes_to_map(attributes));
        child
    }

    /// Climb one level, except out of `body` or past the synthetic root.
    fn close_element(&mut self, name: &str) {
        let current_tag = self.tree.get(self.current).map(|n| n.tag.as_str());
        if current_tag == Some("body") {
            return;
        }
        match self.tree.parent(self.current) {
            Some(parent) => self.current = parent,
            None => warn_once(
                "Builder",
                &format!("end tag </{name}> with no open element, ignored"),
            ),
        }
    }

    /// The tokenizer already drops duplicate names, keeping the first; the
    /// map is filled in reverse so that holds for hand-built tokens too.
    fn attributes_to_map(attributes: &[Attribute]) -> AttributesMap {
        attributes
            .iter()
            .rev()
            .map(|attr| (attr.name.clone(), attr.value.clone()))
            .collect()
    }

    /// Finish construction.
    ///
    /// When the synthetic root has exactly one child, that child becomes the
    /// root and its parent link is cleared. Otherwise the synthetic root stays
    /// on top so that fragments with several top-level nodes are kept whole.
    #[must_use]
    pub fn finish(self) -> DomTree {
        let mut tree = self.tree;
        if let &[only] = tree.children(NodeId::SYNTHETIC_ROOT) {
            tree.promote_to_root(only);
        }
        tree
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a tree from a complete token stream.
#[must_use]
pub fn build_tree<'a, I>(tokens: I) -> DomTree
where
    I: IntoIterator<Item = &'a Token>,
{
    let mut builder = TreeBuilder::new();
    for token in tokens {
        builder.process(token);
    }
    builder.finish()
}

/// Tokenize and build in one call.
///
/// ```
/// let tree = sift_html::parse_html("<ul><li>a</li><li>b</li></ul>");
/// assert_eq!(tree.filter_by_tag(tree.root(), "li").len(), 2);
/// ```
#[must_use]
pub fn parse_html(input: &str) -> DomTree {
    build_tree(&tokenize(input))
}

/// Print the subtree at `id` to stdout, one node per line, for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let prefix = "  ".repeat(indent);
    if let Some(node) = tree.get(id) {
        if node.tag.is_empty() && node.text.is_empty() {
            println!("{prefix}#root");
        } else if node.is_text() {
            println!("{prefix}\"{}\"", node.text);
        } else {
            println!("{prefix}<{node}>");
        }
        for &child_id in tree.children(id) {
            print_tree(tree, child_id, indent + 1);
        }
    }
}
