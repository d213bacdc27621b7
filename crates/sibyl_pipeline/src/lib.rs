//! Natural-language query pipeline for the Sibyl data store.
//!
//! Wires four stages together: schema introspection, query generation,
//! guarded execution, and result classification. The pipeline is generic
//! over [`sibyl_interface::SibylDriver`] and
//! [`sibyl_interface::QueryDispatch`], so every stage runs against mocks in
//! tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classifier;
mod envelope;
mod generator;
mod pipeline;

pub use classifier::{DEFAULT_CLASSIFIER_ATTEMPTS, ResultClassifier};
pub use envelope::{ResultEnvelope, TableData};
pub use generator::{GeneratedQuery, QueryGenerator, QueryMode};
pub use pipeline::{NO_DATA_MESSAGE, PipelineOutput, QueryPipeline, ToolInput, tool_definition};
