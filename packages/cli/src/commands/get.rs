use super::open_session;
use anyhow::{anyhow, Result};
use apistudio_document::{get_at_path, pointer_to_path};
use apistudio_editor::EditorConfig;
use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// OpenAPI document
    pub file: PathBuf,

    /// Pointer to the node, e.g. /info/title; the whole document when omitted
    pub pointer: Option<String>,
}

pub fn get(args: GetArgs, config: &EditorConfig) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&read_value(&args, config)?)?);
    Ok(())
}

fn read_value(args: &GetArgs, config: &EditorConfig) -> Result<Value> {
    let session = open_session(&args.file, config)?;
    let document = session
        .document()
        .ok_or_else(|| anyhow!("No document loaded"))?;
    let pointer = args.pointer.as_deref().unwrap_or_default();
    let node = get_at_path(document, &pointer_to_path(pointer))
        .ok_or_else(|| anyhow!("Nothing at {pointer}"))?;
    Ok(node.to_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_read_value() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("api.yaml");
        fs::write(&file, "openapi: 3.0.3\ninfo:\n  title: Pets # name\n").unwrap();

        let args = |pointer: &str| GetArgs {
            file: file.clone(),
            pointer: Some(pointer.to_string()),
        };
        let config = EditorConfig::default();
        assert_eq!(read_value(&args("/info/title"), &config).unwrap(), json!("Pets"));
        assert_eq!(read_value(&args("/info"), &config).unwrap(), json!({"title": "Pets"}));
        let whole = GetArgs {
            file: file.clone(),
            pointer: None,
        };
        assert!(read_value(&whole, &config).unwrap().is_object());
        assert!(read_value(&args("/info/version"), &config).is_err());
    }
}
