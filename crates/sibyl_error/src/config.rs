//! Configuration error types.

/// Configuration error with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use sibyl_error::ConfigError;
    ///
    /// let err = ConfigError::new("mode must be \"raw\" or \"structured\"");
    /// assert!(err.message.contains("raw"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Error for a setting with no configured value and no env fallback.
    ///
    /// # Examples
    ///
    /// ```
    /// use sibyl_error::ConfigError;
    ///
    /// let err = ConfigError::missing("database_url", "DATABASE_URL");
    /// assert!(err.message.contains("DATABASE_URL"));
    /// ```
    #[track_caller]
    pub fn missing(setting: &str, env_var: &str) -> Self {
        Self::new(format!(
            "{} not configured and {} not set",
            setting, env_var
        ))
    }
}
