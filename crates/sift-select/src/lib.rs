//! Selector compiler and matcher for the sift HTML query toolkit.
//!
//! A selector string is compiled once into a [`Checker`], a closed tree of
//! predicate variants, and then evaluated against any number of nodes.
//!
//! # Supported syntax
//!
//! - Type, universal, class and id selectors: `div`, `*`, `.cls`, `#id`
//! - Attribute selectors: `[a]`, `[a=v]`, `[a~=v]`, `[a|=v]`, `[a^=v]`,
//!   `[a$=v]`, `[a*=v]`, `[a!=v]`, values optionally quoted
//! - Pseudo-classes: `:empty`, `:first-child`, `:last-child`, `:only-child`,
//!   `:has(S)`, `:contains(T)`. Anything else never matches.
//! - Combinators: descendant (space), child `>`, next-sibling `+`,
//!   subsequent-sibling `~`
//! - Selector lists separated by commas
//!
//! # Not Implemented
//!
//! - `:nth-child(an+b)` and the other functional pseudo-classes
//! - Specificity, namespaces, pseudo-elements

/// Compiled predicate tree and its evaluation.
pub mod checker;
/// Selector string to [`Checker`] compilation.
pub mod compiler;
/// Structural checks on selector text.
pub mod diagnostics;
/// Splitting selector text into compounds and combinators.
pub mod lexer;
/// `select` / `select_one` over a subtree.
pub mod query;
/// Reusable compiled selector.
pub mod selector;

pub use checker::{AttributeSelector, Checker, PseudoClass};
pub use compiler::compile;
pub use diagnostics::{SelectorIssue, diagnose};
pub use lexer::Combinator;
pub use query::{select, select_one};
pub use selector::Selector;
