use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use sift_dom::{DomTree, NodeId};

use crate::checker::Checker;
use crate::compiler::compile;

/// A selector compiled once and matched many times.
///
/// ```
/// use sift_select::Selector;
///
/// let tree = sift_html::parse_html(r#"<ul><li class="a">1</li><li>2</li></ul>"#);
/// let selector = Selector::compile("li.a");
/// let hits = selector.select(&tree, tree.root());
/// assert_eq!(hits.len(), 1);
/// assert_eq!(tree.inner_text(hits[0]), "1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    checker: Checker,
}

impl Selector {
    /// Compile `source`. Never fails; see [`compile`].
    #[must_use]
    pub fn compile(source: &str) -> Self {
        Self {
            source: source.to_string(),
            checker: compile(source),
        }
    }

    /// The text this selector was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compiled predicate.
    #[must_use]
    pub const fn checker(&self) -> &Checker {
        &self.checker
    }

    /// Does `node_id` match?
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node_id: NodeId) -> bool {
        self.checker.matches(tree, node_id)
    }

    /// Every match in the subtree at `root` (root included), in document order.
    #[must_use]
    pub fn select(&self, tree: &DomTree, root: NodeId) -> Vec<NodeId> {
        tree.filter(root, |id| self.matches(tree, id))
    }

    /// The first match in the subtree at `root` (root included), in document order.
    #[must_use]
    pub fn select_one(&self, tree: &DomTree, root: NodeId) -> Option<NodeId> {
        tree.find(root, |id| self.matches(tree, id))
    }
}

impl FromStr for Selector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::compile(s))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
