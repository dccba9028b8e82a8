//! tocgen CLI - Navigation files for Markdown documentation trees.
//!
//! Provides commands for:
//! - `build`: Write a navigation file into every directory that lacks one
//! - `check`: Report directories whose navigation file is absent or stale
//! - `scaffold`: Create placeholder pages for planned content
//! - `fix-links`: Rewrite link targets after content moves
//! - `fix-code-blocks`: Split fenced code blocks collapsed onto one line

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CheckArgs, FixCodeBlocksArgs, FixLinksArgs, ScaffoldArgs};
use output::Output;

/// tocgen - Navigation file generator for documentation sites.
#[derive(Parser)]
#[command(name = "tocgen", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover tocgen.toml).
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output (show INFO logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create missing navigation files.
    Build(BuildArgs),
    /// Verify navigation files against the directory contents.
    Check(CheckArgs),
    /// Create placeholder pages and directories.
    Scaffold(ScaffoldArgs),
    /// Rewrite link targets in Markdown files.
    FixLinks(FixLinksArgs),
    /// Repair collapsed fenced code blocks.
    FixCodeBlocks(FixCodeBlocksArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Build(args) => args.execute(config),
        Commands::Check(args) => args.execute(config),
        Commands::Scaffold(args) => args.execute(config),
        Commands::FixLinks(args) => args.execute(config),
        Commands::FixCodeBlocks(args) => args.execute(config),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
