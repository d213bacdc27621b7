//! LLM provider error types.

/// LLM provider error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ModelsErrorKind {
    /// Request transport failure
    #[display("HTTP error: {}", _0)]
    Http(String),
    /// Provider returned a non-success status
    #[display("API error {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
    /// Response body could not be decoded
    #[display("Response parse error: {}", _0)]
    Parse(String),
    /// API key not configured
    #[display("API key not set: {}", _0)]
    MissingApiKey(String),
    /// Remote call exceeded the configured deadline
    #[display("Model call timed out after {}s", _0)]
    Timeout(u64),
    /// Response contained no usable text output
    #[display("Model returned no text output")]
    EmptyResponse,
    /// Request construction failed
    #[display("Builder error: {}", _0)]
    Builder(String),
}

/// Models error with source location tracking.
///
/// # Examples
///
/// ```
/// use sibyl_error::{ModelsError, ModelsErrorKind};
///
/// let err = ModelsError::new(ModelsErrorKind::Timeout(30));
/// assert!(format!("{}", err).contains("30s"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Models Error: {} at line {} in {}", kind, line, file)]
pub struct ModelsError {
    /// The kind of error that occurred
    pub kind: ModelsErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ModelsError {
    /// Create a new ModelsError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ModelsErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
