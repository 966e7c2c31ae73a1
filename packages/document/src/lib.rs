//! # apistudio document model
//!
//! Comment-preserving YAML documents addressed by paths.
//!
//! Parsing yields a lossless annotated tree ([`Document`]) plus a plain
//! [`serde_json::Value`] projection. Reads and edits address nodes with a
//! [`NodePath`]; serializing reproduces every byte that no edit touched.

pub mod ast;
pub mod edit;
pub mod error;
pub mod lexer;
pub mod lookup;
pub mod parser;
pub mod pointer;
pub mod projection;
pub mod scalar;

pub use ast::{Document, Mapping, Member, Node, NodeKind, NodeRef, Scalar, Sequence, Style};
pub use edit::{add_map_entry, delete_at_path, set_at_path};
pub use error::{EditError, EditResult, ParseError, ParseResult, Position};
pub use lookup::{get_at_path, nearest_position};
pub use pointer::{path_to_pointer, pointer_to_path, NodePath};
pub use projection::to_projection;
pub use scalar::ScalarStyle;

use serde_json::Value;

/// A freshly parsed document and its projection
#[derive(Debug, Clone)]
pub struct Parsed {
    pub document: Document,
    pub projection: Value,
}

/// Parse YAML text into a document and its projection
pub fn parse(text: &str) -> ParseResult<Parsed> {
    let document = parser::parse_document(text)?;
    let projection = to_projection(&document);
    Ok(Parsed {
        document,
        projection,
    })
}

/// Render a document back to text
pub fn serialize(document: &Document) -> String {
    document.serialize()
}
