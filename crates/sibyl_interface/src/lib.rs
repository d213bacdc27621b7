//! Trait seams between the Sibyl pipeline, LLM drivers, and the data store.
//!
//! The pipeline crate depends only on these traits, never on a concrete
//! provider client or database backend. Implementations live in
//! `sibyl_models` and `sibyl_database`; tests substitute mocks.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{QueryDispatch, SibylDriver};
pub use types::{ExecutionResult, ToolDefinition};
