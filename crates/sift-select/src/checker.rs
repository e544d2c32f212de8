use sift_dom::{DomTree, Node, NodeId};
use strum_macros::{Display, EnumString};

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// Each variant carries the attribute name first, then the compared value.
/// Values are unquoted at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    /// `[attr]`: the attribute is present, with any value.
    Exists(String),

    /// `[attr=value]`: exact match.
    Equals(String, String),

    /// `[attr~=value]`: the value split on single spaces contains `value`.
    ///
    /// Example: `[class~="active"]` matches `<div class="btn active">`
    Includes(String, String),

    /// `[attr|=value]`: exactly `value`, or `value` followed by `-`.
    ///
    /// Example: `[lang|="en"]` matches `lang="en"` and `lang="en-US"`
    DashMatch(String, String),

    /// `[attr^=value]`: starts with `value`.
    PrefixMatch(String, String),

    /// `[attr$=value]`: ends with `value`.
    SuffixMatch(String, String),

    /// `[attr*=value]`: contains `value` as a substring.
    SubstringMatch(String, String),

    /// `[attr!=value]`: present and not exactly `value`.
    NotEquals(String, String),
}

impl AttributeSelector {
    /// The attribute this selector inspects.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Exists(name)
            | Self::Equals(name, _)
            | Self::Includes(name, _)
            | Self::DashMatch(name, _)
            | Self::PrefixMatch(name, _)
            | Self::SuffixMatch(name, _)
            | Self::SubstringMatch(name, _)
            | Self::NotEquals(name, _) => name,
        }
    }

    /// Check the selector against a node's attributes. An absent attribute
    /// never matches, whatever the operator.
    #[must_use]
    pub fn matches(&self, node: &Node) -> bool {
        let Some(actual) = node.attribute(self.name()) else {
            return false;
        };
        match self {
            Self::Exists(_) => true,
            Self::Equals(_, val) => actual == val,
            Self::Includes(_, val) => actual.split(' ').any(|word| word == val),
            Self::DashMatch(_, val) => actual
                .strip_prefix(val.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('-')),
            Self::PrefixMatch(_, val) => actual.starts_with(val.as_str()),
            Self::SuffixMatch(_, val) => actual.ends_with(val.as_str()),
            Self::SubstringMatch(_, val) => actual.contains(val.as_str()),
            Self::NotEquals(_, val) => actual != val,
        }
    }
}

/// Argument-free pseudo-classes.
///
/// These look at every child, text runs included, so `<p>x</p>` is not
/// `:empty` and a text run can be the `:first-child`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum PseudoClass {
    /// `:empty`: no children at all.
    Empty,
    /// `:first-child`: the first of its parent's children.
    FirstChild,
    /// `:last-child`: the last of its parent's children.
    LastChild,
    /// `:only-child`: its parent has exactly one child.
    OnlyChild,
}

impl PseudoClass {
    /// Evaluate against `node_id`. Structural pseudo-classes are false for a
    /// node whose only parent is the synthetic root, or that has none.
    #[must_use]
    pub fn matches(self, tree: &DomTree, node_id: NodeId) -> bool {
        match self {
            Self::Empty => !tree.has_children(node_id),
            Self::FirstChild => element_parent(tree, node_id)
                .is_some_and(|parent| tree.first_child(parent) == Some(node_id)),
            Self::LastChild => element_parent(tree, node_id)
                .is_some_and(|parent| tree.last_child(parent) == Some(node_id)),
            Self::OnlyChild => element_parent(tree, node_id)
                .is_some_and(|parent| tree.children(parent).len() == 1),
        }
    }
}

/// The parent of `node_id`, skipping the synthetic root that holds the
/// top-level nodes of a fragment.
fn element_parent(tree: &DomTree, node_id: NodeId) -> Option<NodeId> {
    tree.parent(node_id).filter(|&parent| !tree.is_synthetic_root(parent))
}

/// A compiled selector: a pure predicate over one node of a tree.
///
/// Compound selectors become [`Checker::All`], selector lists
/// [`Checker::Any`], and each combinator wraps the checker accumulated to
/// its left so that it is evaluated against a related node instead. For
/// `A > B C` the result is `C AND Ancestor(B AND Parent(A))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checker {
    /// `*`, and the empty compound.
    Always,
    /// Unknown pseudo-classes, empty selectors and combinators with nothing
    /// on one side.
    Never,
    /// Tag name equals exactly.
    Tag(String),
    /// Class list contains.
    Class(String),
    /// Id equals exactly.
    Id(String),
    /// Attribute test.
    Attribute(AttributeSelector),
    /// Structural pseudo-class.
    Pseudo(PseudoClass),
    /// `:has(S)`: some direct child has a descendant-or-self matching `S`.
    Has(Box<Checker>),
    /// `:contains(T)`: the node's inner text contains `T`.
    Contains(String),
    /// Every checker holds.
    All(Vec<Checker>),
    /// At least one checker holds.
    Any(Vec<Checker>),
    /// The parent exists and matches.
    Parent(Box<Checker>),
    /// Some ancestor matches.
    Ancestor(Box<Checker>),
    /// The immediately preceding sibling exists and matches.
    PreviousSibling(Box<Checker>),
    /// Some strictly preceding sibling matches.
    PrecedingSibling(Box<Checker>),
}

impl Checker {
    /// Conjunction, flattening nested `All`s and dropping `Always`.
    #[must_use]
    pub fn all(checkers: Vec<Self>) -> Self {
        let mut flat = Vec::with_capacity(checkers.len());
        for checker in checkers {
            match checker {
                Self::Always => {}
                Self::All(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Self::Always,
            1 => flat.pop().unwrap_or(Self::Always),
            _ => Self::All(flat),
        }
    }

    /// Disjunction. An empty list never matches.
    #[must_use]
    pub fn any(mut checkers: Vec<Self>) -> Self {
        match checkers.len() {
            0 => Self::Never,
            1 => checkers.pop().unwrap_or(Self::Never),
            _ => Self::Any(checkers),
        }
    }

    /// Evaluate this checker against `node_id`.
    ///
    /// Relations that do not exist (no parent, no previous sibling) make the
    /// wrapping checker false rather than failing. A `node_id` not in `tree`
    /// matches only [`Checker::Always`]. The synthetic root left on top of a
    /// fragment matches nothing, so no relation can reach it either.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node_id: NodeId) -> bool {
        if tree.is_synthetic_root(node_id) {
            return false;
        }
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Tag(tag) => tree.get(node_id).is_some_and(|n| n.tag == *tag),
            Self::Class(class) => tree.get(node_id).is_some_and(|n| n.has_class(class)),
            Self::Id(id) => tree.get(node_id).is_some_and(|n| n.id == *id),
            Self::Attribute(selector) => tree.get(node_id).is_some_and(|n| selector.matches(n)),
            Self::Pseudo(pseudo) => pseudo.matches(tree, node_id),
            Self::Has(inner) => tree
                .children(node_id)
                .iter()
                .any(|&child| tree.find(child, |d| inner.matches(tree, d)).is_some()),
            Self::Contains(text) => tree.inner_text(node_id).contains(text.as_str()),
            Self::All(checkers) => checkers.iter().all(|c| c.matches(tree, node_id)),
            Self::Any(checkers) => checkers.iter().any(|c| c.matches(tree, node_id)),
            Self::Parent(inner) => element_parent(tree, node_id)
                .is_some_and(|parent| inner.matches(tree, parent)),
            Self::Ancestor(inner) => tree
                .iter_ancestors(node_id)
                .any(|ancestor| inner.matches(tree, ancestor)),
            Self::PreviousSibling(inner) => tree
                .previous_sibling(node_id)
                .is_some_and(|sibling| inner.matches(tree, sibling)),
            Self::PrecedingSibling(inner) => tree
                .preceding_siblings(node_id)
                .iter()
                .any(|&sibling| inner.matches(tree, sibling)),
        }
    }
}
