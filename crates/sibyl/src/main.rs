//! Sibyl CLI binary.
//!
//! Command-line access to the natural-language query pipeline:
//! - Ask a question and print the classified answer
//! - Dump the schema summary the generator prompts with

use clap::Parser;
use sibyl::cli::{Cli, Commands, run_ask, run_schema};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Ask {
            question,
            mode,
            format,
        } => {
            run_ask(&question, mode, &format).await?;
        }

        Commands::Schema { path } => {
            run_schema(path.as_deref())?;
        }
    }

    Ok(())
}
