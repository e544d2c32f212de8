//! Common utilities for the sift HTML query toolkit.
//!
//! This crate provides shared infrastructure used by all sift components:
//! - **Warning System** - colored terminal output for input we degrade on
//! - **Text Normalization** - whitespace collapsing for text runs

pub mod text;
pub mod warning;
