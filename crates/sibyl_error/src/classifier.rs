//! Result classifier error types.

/// Result classifier error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ClassifierErrorKind {
    /// Model output failed envelope schema validation
    #[display("Envelope validation failed: {}", _0)]
    Validation(String),
    /// All classification attempts failed validation
    #[display("Classification failed after {} attempts: {}", attempts, last_error)]
    AttemptsExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Validation failure from the final attempt
        last_error: String,
    },
}

/// Classifier error with source location tracking.
///
/// # Examples
///
/// ```
/// use sibyl_error::{ClassifierError, ClassifierErrorKind};
///
/// let err = ClassifierError::new(ClassifierErrorKind::Validation(
///     "missing field `type`".to_string(),
/// ));
/// assert!(format!("{}", err).contains("missing field"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Classifier Error: {} at line {} in {}", kind, line, file)]
pub struct ClassifierError {
    /// The kind of error that occurred
    pub kind: ClassifierErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ClassifierError {
    /// Create a new ClassifierError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ClassifierErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
