//! PostgreSQL query execution for the Sibyl pipeline.
//!
//! This crate is the enforcement point for model-generated query text. The
//! generator hands over an opaque blob; everything here defends against it:
//!
//! - structured calls are matched against a fixed `store.<model>.<method>(...)`
//!   shape, resolved through a closed entity registry, and their argument
//!   objects parsed as data literals, never evaluated;
//! - raw SQL passes through [`RawStatementGuard`] before touching the
//!   connection.
//!
//! Results come back as JSON rows via PostgreSQL's `row_to_json`, so the
//! executor needs no compile-time knowledge of the user's tables.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod arguments;
mod call;
mod connection;
mod executor;
mod guard;
mod method;
mod registry;
mod sql;

pub use arguments::QueryArguments;
pub use call::{ResolvedCall, StructuredCall};
pub use connection::establish_connection;
pub use executor::QueryExecutor;
pub use guard::RawStatementGuard;
pub use method::QueryMethod;
pub use registry::{EntityHandle, EntityRegistry};

pub use sibyl_error::{QueryError, QueryErrorKind};

/// Result type for query operations.
pub type QueryResult<T> = std::result::Result<T, QueryError>;
