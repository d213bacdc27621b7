//! Schema introspection for the Sibyl query pipeline.
//!
//! Reads a declarative data-model description (Prisma-style `model` blocks)
//! and produces a normalized schema summary the query generator can embed in
//! prompts. The parse is a deliberate lightweight pattern scan, not a
//! validating grammar: the contract is "best-effort structural summary".

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod descriptor;
mod introspect;

pub use descriptor::{FieldDescriptor, ModelDescriptor, SchemaSnapshot};
pub use introspect::{describe_schema, parse_schema};
