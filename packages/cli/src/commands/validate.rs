use anyhow::Result;
use apistudio_editor::{rule_validator, EditorConfig, Severity, ValidationResult};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// OpenAPI file or directory to validate
    pub input: PathBuf,

    /// Show info-level diagnostics too
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Skip a rule (repeatable)
    #[arg(long = "disable", value_name = "RULE")]
    pub disabled_rules: Vec<String>,
}

pub fn validate(args: ValidateArgs, config: &EditorConfig) -> Result<()> {
    let mut disabled = config.disabled_rules.clone();
    disabled.extend(args.disabled_rules.iter().cloned());
    let validator = rule_validator(disabled);

    let files = if args.input.is_file() {
        vec![args.input.clone()]
    } else if args.input.is_dir() {
        find_api_files(&args.input)
    } else {
        return Err(anyhow::anyhow!(
            "Input path does not exist: {}",
            args.input.display()
        ));
    };

    let mut total_errors = 0;
    let mut total_warnings = 0;
    for file in &files {
        let result = validator(&fs::read_to_string(file)?);
        total_errors += result.counts.errors;
        total_warnings += result.counts.warnings;

        if args.format == "json" {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_result(file, &result, args.all);
        }
    }

    if args.format != "json" {
        print_summary(files.len(), total_errors, total_warnings);
    }

    // Exit with error code if there are errors
    if total_errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn print_result(file: &Path, result: &ValidationResult, all: bool) {
    if result.is_clean() {
        println!("{} {}", "✓".green(), file.display());
        return;
    }

    println!("{}", file.display().to_string().bold());
    for error in &result.errors {
        if !all && error.severity == Severity::Info {
            continue;
        }

        let level = match error.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue().bold(),
        };
        let location = error
            .source_location
            .map(|loc| format!("{}:{}", loc.line, loc.column))
            .unwrap_or_default();
        let rule = error.rule.as_deref().unwrap_or("-");

        println!("  {:>7} {} [{}] {}", location.dimmed(), level, rule, error.message);
        if let Some(suggestion) = &error.suggestion {
            println!("          {} {}", "help:".dimmed(), suggestion.dimmed());
        }
    }
    println!();
}

fn print_summary(files: usize, errors: usize, warnings: usize) {
    println!(
        "{} {} file(s) checked",
        if errors > 0 {
            "Done".red().bold()
        } else {
            "Done".green().bold()
        },
        files
    );
    if errors > 0 {
        println!("   {} {}", "Errors:".red(), errors);
    }
    if warnings > 0 {
        println!("   {} {}", "Warnings:".yellow(), warnings);
    }
}

fn find_api_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| EXTENSIONS.contains(&ext))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_api_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.yaml"), "openapi: 3.0.3\n").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("nested/c.yml"), "openapi: 3.0.3\n").unwrap();

        let names: Vec<String> = find_api_files(dir.path())
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.yaml", "c.yml"]);
    }
}
