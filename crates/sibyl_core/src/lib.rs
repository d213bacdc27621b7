//! Core data types for the Sibyl query pipeline.
//!
//! Provider-neutral request and response types shared between the LLM
//! drivers and the pipeline stages that prompt them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod message;
mod output;
mod request;
mod role;
mod text;

pub use message::Message;
pub use output::Output;
pub use request::{GenerateRequest, GenerateResponse};
pub use role::Role;
pub use text::strip_code_fences;
