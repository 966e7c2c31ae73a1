pub mod edit;
pub mod get;
pub mod new;
pub mod validate;

pub use edit::{add, remove, set, AddArgs, RemoveArgs, SetArgs};
pub use get::{get, GetArgs};
pub use new::{new, NewArgs};
pub use validate::{validate, ValidateArgs};

use anyhow::{Context, Result};
use apistudio_editor::{EditSession, EditorConfig};
use serde_json::Value;
use std::path::Path;

/// Open `file` in a fresh session
pub(crate) fn open_session(file: &Path, config: &EditorConfig) -> Result<EditSession> {
    let mut session = EditSession::with_config(config.clone());
    session
        .open_file(file)
        .with_context(|| format!("Failed to open {}", file.display()))?;
    Ok(session)
}

/// Read a command-line value as JSON, falling back to a plain string
pub(crate) fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
