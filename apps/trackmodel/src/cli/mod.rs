//! # trackmodel CLI Module
//!
//! ## Available Commands
//!
//! - `print` - List the nodes and sections of a layout
//! - `check` - Report completeness and correctness
//! - `convert` - Re-encode a layout as JSON or snapshot

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trackmodel_core::TrackError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// trackmodel - rail network layout tool
///
/// Reads layouts from JSON documents or binary snapshots. The format is
/// detected from the file contents.
#[derive(Parser, Debug)]
#[command(name = "trackmodel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print only the essential result
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List nodes and sections
    Print {
        /// Layout file (JSON document or snapshot)
        file: PathBuf,
    },

    /// Check completeness and correctness; fails when the layout is not correct
    Check {
        /// Layout file (JSON document or snapshot)
        file: PathBuf,
    },

    /// Convert a layout between formats
    Convert {
        /// Input file path
        input: PathBuf,

        /// Output file path
        output: PathBuf,

        /// Output format (json, snapshot)
        #[arg(short = 't', long, default_value = "json")]
        to: String,
    },
}

/// Output switches shared by every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputMode {
    pub verbose: bool,
    pub quiet: bool,
    pub json: bool,
}

impl From<&Cli> for OutputMode {
    fn from(cli: &Cli) -> Self {
        Self {
            verbose: cli.verbose,
            quiet: cli.quiet,
            json: cli.json_mode,
        }
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
///
/// `Ok(false)` means the command ran but its verdict was negative.
pub fn execute(cli: Cli) -> Result<bool, TrackError> {
    let mode = OutputMode::from(&cli);

    match cli.command {
        Commands::Print { file } => cmd_print(&file, mode).map(|()| true),
        Commands::Check { file } => cmd_check(&file, mode),
        Commands::Convert { input, output, to } => {
            cmd_convert(&input, &output, &to, mode).map(|()| true)
        }
    }
}
