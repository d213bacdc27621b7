//! Top-level error wrapper types.

use crate::{ClassifierError, ConfigError, ModelsError, QueryError, SchemaError};

/// The foundation error enum, one variant per pipeline domain.
///
/// # Examples
///
/// ```
/// use sibyl_error::{SibylError, ConfigError};
///
/// let cfg_err = ConfigError::new("Missing database_url");
/// let err: SibylError = cfg_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum SibylErrorKind {
    /// Schema introspection error
    #[from(SchemaError)]
    Schema(SchemaError),
    /// Query parsing/execution error
    #[from(QueryError)]
    Query(QueryError),
    /// Result classification error
    #[from(ClassifierError)]
    Classifier(ClassifierError),
    /// LLM provider error
    #[from(ModelsError)]
    Models(ModelsError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Sibyl error with kind discrimination.
///
/// # Examples
///
/// ```
/// use sibyl_error::{SibylResult, QueryError, QueryErrorKind};
///
/// fn might_fail() -> SibylResult<()> {
///     Err(QueryError::new(QueryErrorKind::InvalidFormat("empty".to_string())))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Sibyl Error: {}", _0)]
pub struct SibylError(Box<SibylErrorKind>);

impl SibylError {
    /// Create a new error from a kind.
    pub fn new(kind: SibylErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SibylErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to SibylErrorKind
impl<T> From<T> for SibylError
where
    T: Into<SibylErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Sibyl operations.
///
/// # Examples
///
/// ```
/// use sibyl_error::{SibylResult, ConfigError};
///
/// fn load() -> SibylResult<String> {
///     Err(ConfigError::new("OPENROUTER_API_KEY not set"))?
/// }
/// ```
pub type SibylResult<T> = std::result::Result<T, SibylError>;
