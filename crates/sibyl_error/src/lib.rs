//! Error types for the Sibyl query pipeline.
//!
//! This crate provides the foundation error types used throughout the Sibyl
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use sibyl_error::{SibylResult, SchemaError, SchemaErrorKind};
//!
//! fn read_schema() -> SibylResult<String> {
//!     Err(SchemaError::new(SchemaErrorKind::Read(
//!         "schema.prisma not found".to_string(),
//!     )))?
//! }
//!
//! match read_schema() {
//!     Ok(text) => println!("Got: {}", text),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classifier;
mod config;
mod error;
mod models;
mod query;
mod schema;

pub use classifier::{ClassifierError, ClassifierErrorKind};
pub use config::ConfigError;
pub use error::{SibylError, SibylErrorKind, SibylResult};
pub use models::{ModelsError, ModelsErrorKind};
pub use query::{QueryError, QueryErrorKind};
pub use schema::{SchemaError, SchemaErrorKind};
