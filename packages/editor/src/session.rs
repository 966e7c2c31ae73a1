//! # Edit Session
//!
//! Owns the one live document and everything derived from it.
//!
//! An EditSession holds the lossless document and its projection side by
//! side, the file identity, the dirty flag, the user's selection and the
//! newest validation result. Every edit clones the document, applies the
//! change to the clone and swaps both representations in at once, so a
//! rejected edit never leaves them out of step.

use crate::config::EditorConfig;
use crate::pipeline::{rule_validator, ValidationScheduler};
use crate::template::NEW_DOCUMENT_TEMPLATE;
use crate::undo_stack::{Snapshot, UndoStack};
use crate::{EditorError, Mutation};
use apistudio_document::{parse, to_projection, Document, NodePath};
use apistudio_linter::ValidationResult;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Single-user editing session over one OpenAPI document
#[derive(Debug)]
pub struct EditSession {
    /// Plain-data view of the document; `None` until something is loaded
    projection: Option<Arc<Value>>,

    /// Comment-preserving document
    document: Option<Arc<Document>>,

    /// Where the document was loaded from or last saved to
    file_path: Option<PathBuf>,

    /// Unsaved changes since the last load or save
    is_dirty: bool,

    selected_path: Option<NodePath>,

    validation_result: Option<ValidationResult>,

    history: UndoStack,

    scheduler: ValidationScheduler,

    config: EditorConfig,
}

impl EditSession {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        let scheduler = ValidationScheduler::with_validator(
            config.validation_delay(),
            rule_validator(config.disabled_rules.clone()),
        );
        Self::with_scheduler(config, scheduler)
    }

    /// Session using a caller-provided validation scheduler
    pub fn with_scheduler(config: EditorConfig, scheduler: ValidationScheduler) -> Self {
        Self {
            projection: None,
            document: None,
            file_path: None,
            is_dirty: false,
            selected_path: None,
            validation_result: None,
            history: UndoStack::with_max_levels(config.history_limit),
            scheduler,
            config,
        }
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Load `text` as the document stored at `path`.
    ///
    /// On failure the previous state is left untouched.
    pub fn open(&mut self, path: impl Into<PathBuf>, text: &str) -> Result<(), EditorError> {
        self.load(Some(path.into()), text)
    }

    /// Load the built-in starter document, with no file identity
    pub fn create_from_template(&mut self) -> Result<(), EditorError> {
        self.load(None, NEW_DOCUMENT_TEMPLATE)
    }

    /// Load text from the clipboard, with no file identity
    pub fn paste(&mut self, text: &str) -> Result<(), EditorError> {
        self.load(None, text)
    }

    /// Read and open a file
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> Result<(), EditorError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        self.open(path, &text)
    }

    fn load(&mut self, path: Option<PathBuf>, text: &str) -> Result<(), EditorError> {
        let parsed = parse(text).map_err(|err| {
            warn!(error = %err, "rejected document");
            EditorError::Load(err)
        })?;
        self.check_version(&parsed.projection)?;

        self.history.clear();
        self.restore(Snapshot {
            projection: Arc::new(parsed.projection),
            document: Arc::new(parsed.document),
            is_dirty: false,
        });
        self.file_path = path;
        self.selected_path = None;
        self.validation_result = None;
        info!(path = ?self.file_path, "opened document");

        self.scheduler.schedule(text.to_string());
        Ok(())
    }

    fn check_version(&self, projection: &Value) -> Result<(), EditorError> {
        let found = match projection.get("openapi") {
            Some(Value::String(version)) => Some(version.clone()),
            Some(Value::Number(version)) => Some(version.to_string()),
            _ => None,
        };
        let prefix = &self.config.supported_version_prefix;
        match found {
            Some(version) if version.starts_with(prefix.as_str()) => Ok(()),
            found => {
                warn!(?found, "unsupported openapi version");
                Err(EditorError::UnsupportedVersion {
                    found,
                    expected: prefix.clone(),
                })
            }
        }
    }

    /// Back to the empty state
    pub fn reset(&mut self) {
        self.scheduler.cancel();
        self.history.clear();
        self.projection = None;
        self.document = None;
        self.file_path = None;
        self.is_dirty = false;
        self.selected_path = None;
        self.validation_result = None;
        info!("session reset");
    }

    // ========================================================================
    // Edits
    // ========================================================================

    /// Set the value at `path`, or delete it when `value` is `None`.
    ///
    /// Returns `Ok(false)` when nothing is loaded or nothing changed.
    pub fn update_field(
        &mut self,
        path: &NodePath,
        value: Option<Value>,
    ) -> Result<bool, EditorError> {
        self.apply(Mutation::UpdateField {
            path: path.clone(),
            value,
        })
    }

    /// Insert `key` into the mapping at `path`
    pub fn add_element(
        &mut self,
        path: &NodePath,
        key: &str,
        value: Value,
    ) -> Result<bool, EditorError> {
        self.apply(Mutation::AddElement {
            path: path.clone(),
            key: key.to_string(),
            value,
        })
    }

    /// Delete the node at `path`; a missing path changes nothing
    pub fn remove_element(&mut self, path: &NodePath) -> bool {
        matches!(
            self.apply(Mutation::RemoveElement { path: path.clone() }),
            Ok(true)
        )
    }

    /// Apply a mutation to a copy of the document and commit the copy
    pub fn apply(&mut self, mutation: Mutation) -> Result<bool, EditorError> {
        let Some(current) = self.document.as_deref() else {
            debug!(kind = mutation.kind(), "no document loaded");
            return Ok(false);
        };

        let mut document = current.clone();
        if !mutation.apply(&mut document)? {
            debug!(kind = mutation.kind(), path = %mutation.path(), "mutation changed nothing");
            return Ok(false);
        }

        debug!(kind = mutation.kind(), path = %mutation.path(), "applied mutation");
        self.commit(document);
        Ok(true)
    }

    fn commit(&mut self, document: Document) {
        let projection = Arc::new(to_projection(&document));
        self.transition(Snapshot {
            projection,
            document: Arc::new(document),
            is_dirty: true,
        });
        self.schedule_validation();
    }

    // ========================================================================
    // Tracked state
    // ========================================================================

    fn snapshot(&self) -> Option<Snapshot> {
        Some(Snapshot {
            projection: Arc::clone(self.projection.as_ref()?),
            document: Arc::clone(self.document.as_ref()?),
            is_dirty: self.is_dirty,
        })
    }

    /// Move to `next`, recording the current state when the projection changes
    fn transition(&mut self, next: Snapshot) {
        if let Some(current) = self.snapshot() {
            if self.history.record(current, &next.projection) {
                debug!(levels = self.history.undo_levels(), "recorded undo step");
            }
        }
        self.restore(next);
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.projection = Some(snapshot.projection);
        self.document = Some(snapshot.document);
        self.is_dirty = snapshot.is_dirty;
    }

    pub fn undo(&mut self) -> bool {
        let Some(current) = self.snapshot() else {
            return false;
        };
        let Some(previous) = self.history.undo(current) else {
            return false;
        };
        self.restore(previous);
        debug!(
            undo = self.history.undo_levels(),
            redo = self.history.redo_levels(),
            "undo"
        );
        self.schedule_validation();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(current) = self.snapshot() else {
            return false;
        };
        let Some(next) = self.history.redo(current) else {
            return false;
        };
        self.restore(next);
        debug!(
            undo = self.history.undo_levels(),
            redo = self.history.redo_levels(),
            "redo"
        );
        self.schedule_validation();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Clear the dirty flag without recording an undo step
    pub fn mark_clean(&mut self) {
        if let Some(current) = self.snapshot() {
            self.transition(Snapshot {
                is_dirty: false,
                ..current
            });
        }
    }

    /// Adopt `path` as the file identity after a save
    pub fn mark_saved(&mut self, path: impl Into<PathBuf>) {
        self.file_path = Some(path.into());
        self.mark_clean();
    }

    /// Write the document to `path` and adopt it as the file identity
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> Result<bool, EditorError> {
        let Some(text) = self.serialize_for_save() else {
            return Ok(false);
        };
        std::fs::write(path.as_ref(), text)?;
        self.mark_saved(path.as_ref());
        Ok(true)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    fn schedule_validation(&mut self) {
        if let Some(text) = self.serialize_for_save() {
            self.scheduler.schedule(text);
        }
    }

    /// Take the newest delivered validation result, if any
    pub fn apply_validation_results(&mut self) -> bool {
        match self.scheduler.try_latest() {
            Some(result) if self.is_loaded() => {
                self.set_validation_result(result);
                true
            }
            _ => false,
        }
    }

    /// Wait for the next validation run and apply its result
    pub async fn next_validation(&mut self) -> Option<&ValidationResult> {
        let result = self.scheduler.next().await?;
        if self.is_loaded() {
            self.set_validation_result(result);
        }
        self.validation_result.as_ref()
    }

    pub fn set_validation_result(&mut self, result: ValidationResult) {
        debug!(
            errors = result.counts.errors,
            warnings = result.counts.warnings,
            infos = result.counts.infos,
            "validation result"
        );
        self.validation_result = Some(result);
    }

    // ========================================================================
    // Read API
    // ========================================================================

    pub fn serialize_for_save(&self) -> Option<String> {
        self.document.as_ref().map(|document| document.serialize())
    }

    pub fn serialize_for_clipboard(&self) -> Option<String> {
        self.serialize_for_save()
    }

    pub fn set_selected_path(&mut self, path: Option<NodePath>) {
        self.selected_path = path;
    }

    pub fn projection(&self) -> Option<&Arc<Value>> {
        self.projection.as_ref()
    }

    pub fn document(&self) -> Option<&Arc<Document>> {
        self.document.as_ref()
    }

    pub fn selected_path(&self) -> Option<&NodePath> {
        self.selected_path.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn validation_result(&self) -> Option<&ValidationResult> {
        self.validation_result.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}
