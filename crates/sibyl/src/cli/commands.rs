//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use sibyl_pipeline::QueryMode;
use std::path::PathBuf;

/// Sibyl - ask your PostgreSQL database questions in plain language
#[derive(Parser, Debug)]
#[command(name = "sibyl")]
#[command(about = "Natural-language database querying", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer a natural-language question against the database
    Ask {
        /// The question to answer
        question: String,

        /// Query dialect: "raw" SQL or "structured" store calls
        #[arg(long)]
        mode: Option<QueryMode>,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Print the schema summary the query generator sees
    Schema {
        /// Schema file to introspect, overriding the configured path
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Markdown tables and plain text
    Human,
    /// The classified envelope as JSON
    Json,
}
