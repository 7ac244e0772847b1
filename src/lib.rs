//! xmlnest - Lightweight XML-to-tree parser with optional namespace expansion
//!
//! Licensed under AGPL-3.0

mod attributes;
mod declaration;
pub mod model;
pub mod namespace;
pub mod parser;
mod preprocess;
mod scanner;
pub mod serialize;

pub use attributes::parse_attributes;
pub use model::{Attributes, Declaration, Document, Element};
pub use parser::{ParseFlags, Parser};
pub use serialize::SerializeOptions;

/// Parses `xml` into a [`Document`] with the default parser settings.
///
/// When `apply_namespaces` is set, element names are rewritten to their
/// namespace-expanded form after the tree is built.
pub fn parse(xml: &str, apply_namespaces: bool) -> Result<Document> {
    Parser::new().with_namespaces(apply_namespaces).parse_str(xml)
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("XML document has more than one root element")]
    MultipleRoots { count: usize },

    #[error("Element nesting exceeds the limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid UTF-8 input: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
