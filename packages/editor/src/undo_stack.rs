//! # Undo/Redo Stack
//!
//! Snapshot history for the edit session.
//!
//! ## Design
//!
//! - Each entry is a full snapshot: projection, document and dirty flag
//! - Snapshots share structure through `Arc`, so recording one is cheap
//! - A transition is recorded only when the projection is a new allocation
//! - Undo moves the current snapshot to the redo stack and restores the previous one
//! - New transitions clear the redo stack
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//!
//! // Record the state being replaced
//! stack.record(current, &next.projection);
//!
//! // Undo hands back the snapshot to restore
//! let previous = stack.undo(next).unwrap();
//! ```

use apistudio_document::Document;
use serde_json::Value;
use std::sync::Arc;

/// Default number of undo levels kept
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// The tracked part of the session state
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub projection: Arc<Value>,
    pub document: Arc<Document>,
    pub is_dirty: bool,
}

impl Snapshot {
    /// Whether both snapshots hold the same projection allocation
    pub fn same_projection(&self, other: &Arc<Value>) -> bool {
        Arc::ptr_eq(&self.projection, other)
    }
}

/// Undo/redo stack of session snapshots
#[derive(Debug)]
pub struct UndoStack {
    /// Snapshots before each recorded transition (most recent last)
    undo_stack: Vec<Snapshot>,

    /// Snapshots that were undone (most recent last)
    redo_stack: Vec<Snapshot>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    /// Create a new undo stack with the default limit
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_HISTORY_LIMIT)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record `previous` as an undo step if `next` changes the projection.
    ///
    /// Returns whether an entry was pushed.
    pub fn record(&mut self, previous: Snapshot, next: &Arc<Value>) -> bool {
        if previous.same_projection(next) {
            return false;
        }

        self.undo_stack.push(previous);
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        self.redo_stack.clear();
        true
    }

    /// Pop the newest undo step, parking `current` on the redo stack
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Pop the newest redo step, parking `current` on the undo stack
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
