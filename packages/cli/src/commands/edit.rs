use super::{open_session, parse_value};
use anyhow::{Context, Result};
use apistudio_document::pointer_to_path;
use apistudio_editor::{EditSession, EditorConfig, Mutation};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Args, Debug)]
pub struct SetArgs {
    /// OpenAPI document to edit in place
    pub file: PathBuf,

    /// Pointer to the field, e.g. /info/title
    pub pointer: String,

    /// New value as JSON; anything else is taken as a string
    pub value: String,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// OpenAPI document to edit in place
    pub file: PathBuf,

    /// Pointer to the mapping receiving the key
    pub pointer: String,

    /// Key to insert
    pub key: String,

    /// Value as JSON; anything else is taken as a string
    #[arg(default_value = "{}")]
    pub value: String,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// OpenAPI document to edit in place
    pub file: PathBuf,

    /// Pointer to the node to delete
    pub pointer: String,
}

pub fn set(args: SetArgs, config: &EditorConfig) -> Result<()> {
    let mutation = Mutation::UpdateField {
        path: pointer_to_path(&args.pointer),
        value: Some(parse_value(&args.value)),
    };
    if apply_in_place(&args.file, mutation, config)? {
        println!("{} Updated {}", "✓".green(), args.pointer.bright_white());
    }
    Ok(())
}

pub fn add(args: AddArgs, config: &EditorConfig) -> Result<()> {
    let mutation = Mutation::AddElement {
        path: pointer_to_path(&args.pointer),
        key: args.key.clone(),
        value: parse_value(&args.value),
    };
    if apply_in_place(&args.file, mutation, config)? {
        println!(
            "{} Added {} to {}",
            "✓".green(),
            args.key.bright_white(),
            display_pointer(&args.pointer)
        );
    }
    Ok(())
}

pub fn remove(args: RemoveArgs, config: &EditorConfig) -> Result<()> {
    let mutation = Mutation::RemoveElement {
        path: pointer_to_path(&args.pointer),
    };
    if apply_in_place(&args.file, mutation, config)? {
        println!("{} Removed {}", "✓".green(), args.pointer.bright_white());
    } else {
        println!("{} Nothing at {}", "⚠️".yellow(), display_pointer(&args.pointer));
    }
    Ok(())
}

/// Apply one mutation and write the file back when it changed
pub(crate) fn apply_in_place(
    file: &Path,
    mutation: Mutation,
    config: &EditorConfig,
) -> Result<bool> {
    let mut session = open_session(file, config)?;
    let changed = apply_to(&mut session, mutation)?;
    if changed {
        session
            .save_to(file)
            .with_context(|| format!("Failed to write {}", file.display()))?;
    }
    Ok(changed)
}

fn apply_to(session: &mut EditSession, mutation: Mutation) -> Result<bool> {
    let description = format!("{} {}", mutation.kind(), mutation.path());
    let changed = session.apply(mutation).context("Edit rejected")?;
    debug!(%description, changed, "applied");
    Ok(changed)
}

fn display_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "the document root".to_string()
    } else {
        pointer.to_string()
    }
}
