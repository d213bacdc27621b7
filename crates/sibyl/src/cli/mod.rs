//! Command-line interface.

mod ask;
mod commands;

pub use ask::{run_ask, run_schema};
pub use commands::{Cli, Commands, OutputFormat};
