//! Query execution error types.

/// Query execution error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum QueryErrorKind {
    /// Generated text did not match the structured call shape
    #[display("Invalid query format: {}", _0)]
    InvalidFormat(String),
    /// Entity name not present in the registry
    #[display("Model '{}' not found", _0)]
    UnknownModel(String),
    /// Method name not in the supported method set
    #[display("Method '{}' not supported", _0)]
    UnknownMethod(String),
    /// Argument object could not be parsed as a literal
    #[display("Invalid argument format: {}", _0)]
    ArgumentParse(String),
    /// Raw statement rejected by the safety guard
    #[display("Unsafe statement rejected: {}", _0)]
    UnsafeStatement(String),
    /// Connection failed
    #[display("Database connection error: {}", _0)]
    Connection(String),
    /// Query execution failed
    #[display("Database query error: {}", _0)]
    Execution(String),
    /// Serialization/deserialization error
    #[display("Serialization error: {}", _0)]
    Serialization(String),
}

/// Query error with source location tracking.
///
/// # Examples
///
/// ```
/// use sibyl_error::{QueryError, QueryErrorKind};
///
/// let err = QueryError::new(QueryErrorKind::UnknownModel("ghost".to_string()));
/// assert!(format!("{}", err).contains("ghost"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Query Error: {} at line {} in {}", kind, line, file)]
pub struct QueryError {
    /// The kind of error that occurred
    pub kind: QueryErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl QueryError {
    /// Create a new QueryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: QueryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

// Diesel error conversions (only available with database feature)
#[cfg(feature = "database")]
impl From<diesel::result::Error> for QueryError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        QueryError::new(QueryErrorKind::Execution(err.to_string()))
    }
}

#[cfg(feature = "database")]
impl From<diesel::ConnectionError> for QueryError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        QueryError::new(QueryErrorKind::Connection(err.to_string()))
    }
}

#[cfg(feature = "database")]
impl From<serde_json::Error> for QueryError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        QueryError::new(QueryErrorKind::Serialization(err.to_string()))
    }
}
