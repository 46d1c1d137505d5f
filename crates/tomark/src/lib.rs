//! # tomark
//!
//! Convert HTML document trees to Markdown, in either the basic (CommonMark)
//! dialect or GitHub Flavored Markdown.
//!
//! ## Design
//!
//! Conversion runs in three steps:
//!
//! - **Walk**: a [`DomRunner`] cursor visits the tree in document order while a
//!   recursive walker descends it, so each node is rendered after its children.
//! - **Render**: a [`Renderer`] turns one node plus its children's Markdown into
//!   a fragment. [`Rules::basic`] and [`Rules::gfm`] are the built-in tables;
//!   custom rules or whole custom renderers can replace them.
//! - **Finalize**: a fixed sequence of whitespace passes removes the blank-line
//!   and hard-break artifacts left by concatenating block fragments.
//!
//! ## Example (HTML string)
//!
//! ```rust
//! use tomark::{to_mark, ToMarkOptions, ToMarkService};
//!
//! assert_eq!(to_mark("<h1>hello world</h1>").unwrap(), "# hello world");
//! assert_eq!(to_mark("<del>strike</del>").unwrap(), "~~strike~~");
//!
//! let basic = ToMarkService::with_options(ToMarkOptions { gfm: false, ..Default::default() });
//! assert_eq!(basic.convert("<del>strike</del>").unwrap(), "strike");
//! ```
//!
//! ## Example (Node-based)
//!
//! ```rust
//! use tomark::{Node, ToMarkService};
//!
//! let h1 = Node::element("h1").with_child(Node::text("Hello World"));
//! let markdown = ToMarkService::new().convert_node(&h1).unwrap();
//! assert_eq!(markdown, "# Hello World");
//! ```

mod finalize;
#[cfg(feature = "html")]
pub mod html;
pub mod node;
mod rules;
pub mod runner;
mod service;
mod utilities;
pub mod walker;

pub use finalize::finalize;
#[cfg(feature = "html")]
pub use html::parse_html;
pub use node::{Node, NodeRef, NodeType};
pub use rules::{
    basic_renderer, basic_rules, gfm_renderer, gfm_rules, Filter, Renderer, ReplacementFn, Rule,
    Rules,
};
pub use runner::DomRunner;
#[cfg(feature = "html")]
pub use service::to_mark;
pub use service::{ToMarkOptions, ToMarkService, DEFAULT_MAX_DEPTH};
pub use utilities::*;

/// Error type for tomark operations
#[derive(Debug, thiserror::Error)]
pub enum ToMarkError {
    /// The cursor and the recursive walk disagreed about the current node
    #[error("Traversal error: {0}")]
    Traversal(String),

    #[error("Document nesting exceeds the limit of {limit} levels")]
    DepthLimitExceeded { limit: usize },
}

pub type Result<T> = std::result::Result<T, ToMarkError>;
