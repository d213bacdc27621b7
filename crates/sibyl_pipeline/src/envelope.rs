//! Presentation envelope for classified query results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use sibyl_error::{ClassifierError, ClassifierErrorKind};

/// Tabular payload: column names plus one JSON object per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    /// Column names, in display order
    pub columns: Vec<String>,
    /// Records keyed by column name
    pub rows: Vec<Map<String, JsonValue>>,
}

impl TableData {
    /// Checks that every row's keys are exactly the declared columns.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending row.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        for (index, row) in self.rows.iter().enumerate() {
            if row.len() != self.columns.len() {
                return Err(ClassifierError::new(ClassifierErrorKind::Validation(
                    format!(
                        "row {} has {} fields but {} columns are declared",
                        index,
                        row.len(),
                        self.columns.len()
                    ),
                )));
            }
            if let Some(stray) = row.keys().find(|key| !self.columns.contains(key)) {
                return Err(ClassifierError::new(ClassifierErrorKind::Validation(
                    format!("row {} has field {:?} not listed in columns", index, stray),
                )));
            }
        }
        Ok(())
    }
}

/// The classifier's verdict on how to present a result.
///
/// Serializes as `{"type": "table", "data": {...}}` or
/// `{"type": "raw", "data": ...}`.
///
/// # Examples
///
/// ```
/// use sibyl_pipeline::ResultEnvelope;
///
/// let envelope: ResultEnvelope =
///     serde_json::from_str(r#"{"type": "raw", "data": {"count": 5}}"#).unwrap();
/// assert!(matches!(envelope, ResultEnvelope::Raw(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ResultEnvelope {
    /// Multi-record data to render as a table
    Table(TableData),
    /// Scalar, aggregate, or acknowledgement data to narrate as-is
    Raw(JsonValue),
}

impl ResultEnvelope {
    /// Parses classifier output into a validated envelope.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the text is not an envelope or a
    /// table payload's rows disagree with its columns.
    pub fn decode(text: &str) -> Result<Self, ClassifierError> {
        let envelope: ResultEnvelope = serde_json::from_str(text)
            .map_err(|e| ClassifierError::new(ClassifierErrorKind::Validation(e.to_string())))?;
        if let ResultEnvelope::Table(data) = &envelope {
            data.validate()?;
        }
        Ok(envelope)
    }
}
