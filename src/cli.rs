//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Page discovery and entry mapping for multi-page site builds
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: pagemap.toml)
    #[arg(short = 'C', long, default_value = "pagemap.toml")]
    pub config: PathBuf,

    /// Pages directory path (relative to project root)
    #[arg(short, long)]
    pub pages: Option<PathBuf>,

    /// Build mode, selects `.env.<mode>` files
    #[arg(short, long)]
    pub mode: Option<String>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared output arguments for the JSON-producing commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Write JSON to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print JSON (overrides [output.pretty])
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub pretty: Option<bool>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default pagemap.toml
    Init,

    /// Print discovered page names, one per line
    Discover,

    /// Print the bundler input map (slug -> template) as JSON
    Inputs {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print per-page template injection descriptors as JSON
    Pages {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the input map and page descriptors as one JSON document
    Plan {
        #[command(flatten)]
        output: OutputArgs,
    },
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init)
    }
}
