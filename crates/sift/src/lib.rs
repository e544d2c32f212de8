//! High-level API for the sift HTML query toolkit.
//!
//! # Scope
//!
//! This crate provides:
//! - **Parsing** - markup text to a [`DomTree`] via [`parse`]
//! - **Loading** - reading documents from a path or any [`Read`] source
//! - **Documents** - [`Document`], a `head`/`body` view with body-scoped queries
//! - **Export** - JSON summaries of nodes for scripting and debugging
//!
//! ```
//! let tree = sift::parse("<html><body><p class='x'>hi</p></body></html>");
//! let doc = sift::Document::new(&tree);
//! let p = doc.select_one("p.x").expect("one paragraph");
//! assert_eq!(tree.inner_text(p), "hi");
//! ```

pub mod export;

pub use sift_dom as dom;
pub use sift_html as html;
pub use sift_select as selector;

pub use export::{NodeSummary, to_json_value};
pub use sift_common::warning::clear_warnings;
pub use sift_dom::{DomTree, Node, NodeId};
pub use sift_html::parse_html;
pub use sift_select::{Selector, select, select_one};

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::string::FromUtf8Error;

use thiserror::Error;

/// Tokenize `input` and build its tree.
#[must_use]
pub fn parse(input: &str) -> DomTree {
    parse_html(input)
}

/// Error type for document loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read a file.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: io::Error,
    },

    /// Failed to read from a stream.
    #[error("failed to read input: {0}")]
    Read(#[from] io::Error),

    /// The bytes read were not UTF-8.
    #[error("input is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

/// Read and parse the file at `path`.
///
/// # Errors
///
/// [`LoadError::Io`] if the file cannot be read, [`LoadError::InvalidUtf8`]
/// if its contents are not UTF-8.
pub fn load_path(path: impl AsRef<Path>) -> Result<DomTree, LoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let html = String::from_utf8(bytes)?;
    Ok(parse(&html))
}

/// Read `reader` to the end and parse what it produced.
///
/// # Errors
///
/// [`LoadError::Read`] if reading fails, [`LoadError::InvalidUtf8`] if the
/// input is not UTF-8.
pub fn load_reader(mut reader: impl Read) -> Result<DomTree, LoadError> {
    let mut bytes = Vec::new();
    let _ = reader.read_to_end(&mut bytes)?;
    let html = String::from_utf8(bytes)?;
    Ok(parse(&html))
}

/// A read-only view of a built tree with its `head` and `body` located.
///
/// The document owns no nodes; it borrows the tree, which must outlive it.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    tree: &'a DomTree,
    head: Option<NodeId>,
    body: Option<NodeId>,
}

impl<'a> Document<'a> {
    /// Locate the first `head` and first `body` in document order.
    #[must_use]
    pub fn new(tree: &'a DomTree) -> Self {
        let root = tree.root();
        Self {
            tree,
            head: tree.find_by_tag(root, "head"),
            body: tree.find_by_tag(root, "body"),
        }
    }

    /// The underlying tree.
    #[must_use]
    pub const fn tree(&self) -> &'a DomTree {
        self.tree
    }

    /// The first `head` element, if any.
    #[must_use]
    pub const fn head(&self) -> Option<NodeId> {
        self.head
    }

    /// The first `body` element, if any.
    #[must_use]
    pub const fn body(&self) -> Option<NodeId> {
        self.body
    }

    /// Where queries start: the body, or the tree root for markup without one.
    ///
    /// For a fragment the tree root is the synthetic root, which selectors
    /// never match.
    #[must_use]
    pub fn scope(&self) -> NodeId {
        self.body.unwrap_or_else(|| self.tree.root())
    }

    /// Every node under [`Document::scope`] matching `selector`.
    #[must_use]
    pub fn select(&self, selector: &str) -> Vec<NodeId> {
        select(self.tree, self.scope(), selector)
    }

    /// The first node under [`Document::scope`] matching `selector`.
    #[must_use]
    pub fn select_one(&self, selector: &str) -> Option<NodeId> {
        select_one(self.tree, self.scope(), selector)
    }

    /// Like [`Document::select`], with a precompiled selector.
    #[must_use]
    pub fn select_compiled(&self, selector: &Selector) -> Vec<NodeId> {
        selector.select(self.tree, self.scope())
    }
}
