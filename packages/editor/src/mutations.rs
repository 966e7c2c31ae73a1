//! # Document Mutations
//!
//! Serialisable edit commands over an OpenAPI document.
//!
//! ## Design Principles
//!
//! 1. **Path-addressed**: every mutation names its target with a [`NodePath`]
//! 2. **All or nothing**: a rejected mutation leaves the document untouched
//! 3. **Absent is explicit**: `UpdateField` with no value deletes the field
//!
//! ## Mutation Semantics
//!
//! ### UpdateField
//! - Replaces the value at the path, creating missing parent mappings
//! - `value: None` removes the field; a missing field is a no-op
//!
//! ### AddElement
//! - Inserts a new key into the mapping at the path
//! - Fails if the key already exists
//!
//! ### RemoveElement
//! - Removes the node at the path
//! - A missing path is a no-op

use apistudio_document::{
    add_map_entry, delete_at_path, set_at_path, Document, EditResult, NodePath,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Mutation {
    /// Set or delete the value at a path
    UpdateField {
        path: NodePath,
        value: Option<Value>,
    },

    /// Insert a new key into a mapping
    AddElement {
        path: NodePath,
        key: String,
        value: Value,
    },

    /// Delete the node at a path
    RemoveElement { path: NodePath },
}

impl Mutation {
    /// Apply to `document`, returning whether anything changed
    pub fn apply(&self, document: &mut Document) -> EditResult<bool> {
        match self {
            Mutation::UpdateField {
                path,
                value: Some(value),
            } => {
                set_at_path(document, path, value.clone())?;
                Ok(true)
            }
            Mutation::UpdateField { path, value: None } | Mutation::RemoveElement { path } => {
                Ok(delete_at_path(document, path))
            }
            Mutation::AddElement { path, key, value } => {
                add_map_entry(document, path, key, value.clone())?;
                Ok(true)
            }
        }
    }

    /// The path this mutation targets
    pub fn path(&self) -> &NodePath {
        match self {
            Mutation::UpdateField { path, .. }
            | Mutation::AddElement { path, .. }
            | Mutation::RemoveElement { path } => path,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::UpdateField { .. } => "update_field",
            Mutation::AddElement { .. } => "add_element",
            Mutation::RemoveElement { .. } => "remove_element",
        }
    }
}
