//! Error types for the editor

use apistudio_document::{EditError, ParseError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Failed to load document: {0}")]
    Load(#[from] ParseError),

    #[error("Unsupported OpenAPI version {found:?}, expected {expected}x")]
    UnsupportedVersion {
        found: Option<String>,
        expected: String,
    },

    #[error("Edit rejected: {0}")]
    Edit(#[from] EditError),

    #[error("Invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
