//! Markup tokenizer and tree builder for the sift HTML query toolkit.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** - turns raw markup into a flat stream of start tags,
//!   self-closing tags, end tags, text, comments and doctypes
//!   - Quoted, unquoted and valueless attributes
//!   - Character reference decoding in text and attribute values
//!   - Raw-text elements (`script`, `style`, ...) passed through verbatim
//!
//! - **Tree Builder** - consumes that stream with a single "current node"
//!   cursor and produces a [`sift_dom::DomTree`]
//!
//! # Not Implemented
//!
//! - The HTML5 tree construction algorithm (implied tags, foster parenting,
//!   adoption agency). End tags pop one level regardless of their name.

/// Tag-stream tree construction.
pub mod builder;
/// Markup tokenizer.
pub mod tokenizer;

pub use builder::{TreeBuilder, VOID_ELEMENTS, build_tree, is_void_element, parse_html, print_tree};
pub use tokenizer::{Attribute, MarkupTokenizer, Token, tokenize};
