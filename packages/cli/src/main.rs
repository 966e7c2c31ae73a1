mod commands;

use apistudio_editor::EditorConfig;
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    add, get, new, remove, set, validate, AddArgs, GetArgs, NewArgs, RemoveArgs, SetArgs,
    ValidateArgs,
};
use tracing_subscriber::EnvFilter;

/// apistudio - edit and validate OpenAPI documents without losing comments
#[derive(Parser, Debug)]
#[command(name = "apistudio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Undo levels kept by the editor (overrides the config file)
    #[arg(long, global = true)]
    history_limit: Option<usize>,

    /// Required prefix of the `openapi` field (overrides the config file)
    #[arg(long, global = true)]
    version_prefix: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a document or every document in a directory
    Validate(ValidateArgs),

    /// Print the value at a pointer as JSON
    Get(GetArgs),

    /// Set the value at a pointer
    Set(SetArgs),

    /// Add a key to a mapping
    Add(AddArgs),

    /// Remove the node at a pointer
    Remove(RemoveArgs),

    /// Create a new document from the built-in template
    New(NewArgs),
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<EditorConfig> {
    let cwd = std::env::current_dir()?;
    let mut config = EditorConfig::load(&cwd)?;
    if let Some(limit) = cli.history_limit {
        config.history_limit = limit;
    }
    if let Some(prefix) = &cli.version_prefix {
        config.supported_version_prefix = prefix.clone();
    }
    Ok(config)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_config(&cli).and_then(|config| match cli.command {
        Command::Validate(args) => validate(args, &config),
        Command::Get(args) => get(args, &config),
        Command::Set(args) => set(args, &config),
        Command::Add(args) => add(args, &config),
        Command::Remove(args) => remove(args, &config),
        Command::New(args) => new(args, &config),
    });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
