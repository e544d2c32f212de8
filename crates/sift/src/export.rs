//! JSON export of subtrees.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use sift_dom::{DomTree, NodeId};

/// A serializable snapshot of one node and everything below it.
///
/// Attributes are sorted by name so output is stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    /// Element name, empty for text.
    pub tag: String,
    /// Own text, empty for elements.
    pub text: String,
    /// The `id` attribute, or empty.
    pub id: String,
    /// Class list in written order.
    pub classes: Vec<String>,
    /// All attributes.
    pub attrs: BTreeMap<String, String>,
    /// Child summaries in document order.
    pub children: Vec<NodeSummary>,
}

impl NodeSummary {
    /// Snapshot the subtree at `id`, or `None` if `id` is not in `tree`.
    #[must_use]
    pub fn new(tree: &DomTree, id: NodeId) -> Option<Self> {
        let node = tree.get(id)?;
        Some(Self {
            tag: node.tag.clone(),
            text: node.text.clone(),
            id: node.id.clone(),
            classes: node.classes.clone(),
            attrs: node
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            children: node
                .children()
                .iter()
                .filter_map(|&child| Self::new(tree, child))
                .collect(),
        })
    }
}

/// The subtree at `id` as a JSON object with `tag`, `text`, `id`, `classes`,
/// `attrs` and `children` keys. `null` for an unknown id.
#[must_use]
pub fn to_json_value(tree: &DomTree, id: NodeId) -> Value {
    NodeSummary::new(tree, id)
        .and_then(|summary| serde_json::to_value(summary).ok())
        .unwrap_or(Value::Null)
}
