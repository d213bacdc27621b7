//! Sibyl - natural-language database querying.
//!
//! Sibyl turns plain-language questions into database queries and
//! presentation-ready answers. A question flows through four stages:
//!
//! 1. **Schema introspection** - a declarative schema file is summarized
//!    into JSON the model can read
//! 2. **Query generation** - an LLM produces either raw PostgreSQL or a
//!    `store.<model>.<method>({...})` call
//! 3. **Guarded execution** - generated queries are validated against the
//!    schema before touching PostgreSQL
//! 4. **Result classification** - a second model call decides whether the
//!    answer reads best as a table or a raw value
//!
//! An empty result short-circuits to a fixed no-data message without the
//! classification call.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sibyl::{OpenRouterClient, QueryPipeline, SibylConfig};
//! use sibyl::{EntityRegistry, QueryExecutor, establish_connection};
//! use std::sync::{Arc, Mutex};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SibylConfig::load()?;
//!     let driver = Arc::new(OpenRouterClient::new(config.model_config()?)?);
//!
//!     let connection = establish_connection(&config.database_url()?)?;
//!     let snapshot = sibyl::describe_schema(&config.schema_path())?;
//!     let executor = Arc::new(QueryExecutor::new(
//!         Arc::new(Mutex::new(connection)),
//!         EntityRegistry::from_snapshot(&snapshot),
//!     ));
//!
//!     let pipeline = QueryPipeline::new(driver, executor, config.schema_path());
//!     let output = pipeline.run("how many users signed up this week?").await?;
//!     println!("{}", output);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Sibyl is organized as a workspace with focused crates:
//!
//! - `sibyl_core` - provider-neutral request/response types
//! - `sibyl_error` - error types
//! - `sibyl_interface` - driver and dispatch traits
//! - `sibyl_models` - LLM provider implementations
//! - `sibyl_schema` - schema introspection
//! - `sibyl_database` - guarded PostgreSQL execution
//! - `sibyl_pipeline` - generation, classification, orchestration
//!
//! This crate (`sibyl`) re-exports everything and ships the CLI.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod render;

pub use config::{ModelConfig, SibylConfig};
pub use render::{render_envelope, render_output};

pub use sibyl_core::*;
pub use sibyl_database::*;
pub use sibyl_error::*;
pub use sibyl_interface::*;
pub use sibyl_models::*;
pub use sibyl_pipeline::*;
pub use sibyl_schema::*;
