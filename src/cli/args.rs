//! CLI argument definitions using clap
//!
//! Commands:
//! - schemaform describe --schema <file|dir>
//! - schemaform check --schema <file> --fields a,b [--model <file>] [--response <file>] [--config <file>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// schemaform - reactive form models bound to declarative schemas
#[derive(Parser, Debug)]
#[command(name = "schemaform")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the fields, rules and defaults a schema produces
    Describe {
        /// Schema file, or a directory of schema files
        #[arg(long)]
        schema: PathBuf,
    },

    /// Bind a model, validate it and report its state
    Check {
        /// Schema file
        #[arg(long)]
        schema: PathBuf,

        /// Comma-separated property names to bind
        #[arg(long, value_delimiter = ',', required = true)]
        fields: Vec<String>,

        /// Source model (JSON object)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Server error response to apply after validation
        #[arg(long)]
        response: Option<PathBuf>,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
