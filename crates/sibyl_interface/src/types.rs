//! Shared types crossing the pipeline/store and pipeline/agent boundaries.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// The untyped result of executing a generated query.
///
/// Row sets come back from multi-row lookups; everything else (counts,
/// single records, mutation acknowledgements) is an opaque JSON value.
///
/// # Examples
///
/// ```
/// use sibyl_interface::ExecutionResult;
/// use serde_json::json;
///
/// assert!(ExecutionResult::Rows(vec![]).is_empty());
/// assert!(ExecutionResult::Value(json!(null)).is_empty());
/// assert!(!ExecutionResult::Value(json!({"count": 0})).is_empty());
/// assert!(!ExecutionResult::Value(json!(0)).is_empty());
/// assert!(!ExecutionResult::Value(json!("")).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecutionResult {
    /// Zero or more records, one JSON object per row.
    Rows(Vec<JsonValue>),
    /// A single scalar, record, or mutation acknowledgement.
    Value(JsonValue),
}

impl ExecutionResult {
    /// True when the result carries no data: an empty row set, JSON null,
    /// or `false`.
    ///
    /// Deliberately narrower than a truthiness check: `0` and `""` are
    /// real answers (a zero count, an empty string column) and go to the
    /// classifier, as do empty objects.
    pub fn is_empty(&self) -> bool {
        match self {
            ExecutionResult::Rows(rows) => rows.is_empty(),
            ExecutionResult::Value(value) => {
                value.is_null() || matches!(value, JsonValue::Bool(false))
            }
        }
    }

    /// Renders the result as a single JSON value for prompt embedding.
    pub fn to_json(&self) -> JsonValue {
        match self {
            ExecutionResult::Rows(rows) => JsonValue::Array(rows.clone()),
            ExecutionResult::Value(value) => value.clone(),
        }
    }
}

/// Definition of a tool/function the chat agent can expose to a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name of the tool/function
    pub name: String,
    /// Human-readable description of what the tool does
    pub description: String,
    /// JSON Schema defining the parameters this tool accepts
    pub parameters: JsonValue,
}
