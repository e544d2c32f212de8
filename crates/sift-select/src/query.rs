//! One-shot queries. Each call compiles its selector once and then walks the
//! subtree; hold on to a [`Selector`](crate::Selector) to reuse it instead.

use sift_dom::{DomTree, NodeId};

use crate::compiler::compile;

/// Every node in the subtree at `root` (root included) matching `selector`,
/// in document order.
///
/// ```
/// let tree = sift_html::parse_html("<div><p>a</p><p>b</p></div>");
/// assert_eq!(sift_select::select(&tree, tree.root(), "p").len(), 2);
/// assert!(sift_select::select(&tree, tree.root(), "span").is_empty());
/// ```
#[must_use]
pub fn select(tree: &DomTree, root: NodeId, selector: &str) -> Vec<NodeId> {
    let checker = compile(selector);
    tree.filter(root, |id| checker.matches(tree, id))
}

/// The first node in the subtree at `root` (root included) matching
/// `selector`, in document order.
#[must_use]
pub fn select_one(tree: &DomTree, root: NodeId, selector: &str) -> Option<NodeId> {
    let checker = compile(selector);
    tree.find(root, |id| checker.matches(tree, id))
}
