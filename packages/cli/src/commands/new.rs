use anyhow::{anyhow, Result};
use apistudio_editor::{EditSession, EditorConfig};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Where to write the new document
    pub file: PathBuf,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

pub fn new(args: NewArgs, config: &EditorConfig) -> Result<()> {
    create(&args.file, args.force, config)?;
    println!("{} Created {}", "✓".green(), args.file.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}", args.file.display());
    println!("  2. Run: apistudio validate {}", args.file.display());
    Ok(())
}

fn create(file: &Path, force: bool, config: &EditorConfig) -> Result<()> {
    if file.exists() && !force {
        return Err(anyhow!(
            "{} already exists, use --force to overwrite",
            file.display()
        ));
    }

    let mut session = EditSession::with_config(config.clone());
    session.create_from_template()?;
    session.save_to(file)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use apistudio_editor::NEW_DOCUMENT_TEMPLATE;
    use std::fs;

    #[test]
    fn test_create_writes_template() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("api.yaml");
        let config = EditorConfig::default();

        create(&file, false, &config).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), NEW_DOCUMENT_TEMPLATE);

        assert!(create(&file, false, &config).is_err());
        fs::write(&file, "changed").unwrap();
        create(&file, true, &config).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), NEW_DOCUMENT_TEMPLATE);
    }
}
