//! # apistudio editor
//!
//! Editing engine for OpenAPI documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: YAML text → lossless tree + JSON  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - Open/create/paste documents              │
//! │  - Apply path-addressed mutations           │
//! │  - Snapshot undo/redo                       │
//! │  - Schedule debounced validation            │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ linter: projection → located diagnostics    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Text is source of truth**: the projection is always derived from the document
//! 2. **Copy on edit**: edits apply to a clone, then both views swap in together
//! 3. **Untouched bytes survive**: comments and formatting outside an edit are kept
//!
//! ## Usage
//!
//! ```rust,ignore
//! use apistudio_editor::{EditSession, NodePath};
//! use serde_json::json;
//!
//! let mut session = EditSession::new();
//! session.open("petstore.yaml", &text)?;
//!
//! session.update_field(&NodePath::from(["info", "title"]), Some(json!("Pets")))?;
//! session.undo();
//!
//! let diagnostics = session.next_validation().await;
//! let text = session.serialize_for_save();
//! ```

mod config;
mod errors;
mod mutations;
mod pipeline;
mod session;
mod template;
mod undo_stack;

pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use errors::EditorError;
pub use mutations::Mutation;
pub use pipeline::{rule_validator, ValidationScheduler, Validator, DEFAULT_VALIDATION_DELAY};
pub use session::EditSession;
pub use template::NEW_DOCUMENT_TEMPLATE;
pub use undo_stack::{Snapshot, UndoStack, DEFAULT_HISTORY_LIMIT};

pub use apistudio_document::NodePath;
pub use apistudio_linter::{Severity, ValidationError, ValidationResult};
