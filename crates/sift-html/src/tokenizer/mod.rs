//! Markup tokenizer module.
//!
//! A compact state machine in the shape of the WHATWG tokenizer, reduced to
//! the token kinds the tree builder consumes.

/// Tokenizer state machine.
pub mod machine;
/// Named and numeric character reference decoding.
pub mod named_character_references;
/// Token types produced by the tokenizer.
pub mod token;

pub use machine::{MarkupTokenizer, TokenizerState, tokenize};
pub use token::{Attribute, Token};
