//! Schema introspection error types.

/// Schema introspection error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SchemaErrorKind {
    /// Schema source file missing or unreadable
    #[display("Failed to read schema source: {}", _0)]
    Read(String),
}

/// Schema error with source location tracking.
///
/// # Examples
///
/// ```
/// use sibyl_error::{SchemaError, SchemaErrorKind};
///
/// let err = SchemaError::new(SchemaErrorKind::Read("no such file".to_string()));
/// assert!(format!("{}", err).contains("no such file"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Schema Error: {} at line {} in {}", kind, line, file)]
pub struct SchemaError {
    /// The kind of error that occurred
    pub kind: SchemaErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SchemaError {
    /// Create a new SchemaError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SchemaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<std::io::Error> for SchemaError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        SchemaError::new(SchemaErrorKind::Read(err.to_string()))
    }
}
