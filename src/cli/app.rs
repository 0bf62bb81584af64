//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::sync_cmd;
use crate::pipeline::Mode;

#[derive(Parser)]
#[command(name = "mdquote")]
#[command(author, version, about = "Keeps quoted excerpts in markdown documents in sync")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to mdquote.toml in the scanned directory)
    #[arg(long, global = true, env = "MDQUOTE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite quote blocks in every document under a directory
    Sync {
        /// Directory to scan, or a single document
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Report documents whose quote blocks are out of date, without writing
    Check {
        /// Directory to scan, or a single document
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show the order documents would be rewritten in
    Order {
        /// Directory to scan, or a single document
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);
    let config = cli.config.as_deref();

    output.verbose("mdquote starting");

    match cli.command {
        Commands::Sync { path } => {
            output.verbose_ctx("sync", &format!("Scanning: {}", path.display()));
            sync_cmd::sync(&output, &path, config, Mode::Write)?
        }
        Commands::Check { path } => {
            output.verbose_ctx("check", &format!("Scanning: {}", path.display()));
            sync_cmd::sync(&output, &path, config, Mode::Check)?
        }
        Commands::Order { path } => {
            output.verbose_ctx("order", &format!("Scanning: {}", path.display()));
            sync_cmd::order(&output, &path, config)?
        }
    }

    Ok(())
}
