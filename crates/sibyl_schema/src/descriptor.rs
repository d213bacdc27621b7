//! Normalized schema summary types.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A single declared field on an entity.
///
/// Relation-typed fields never appear in a snapshot; they are filtered out
/// during parsing so generated queries cannot traverse relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as declared
    pub name: String,
    /// Declared type token, punctuation included (e.g. `String?`, `Int[]`)
    #[serde(rename = "type")]
    pub field_type: String,
    /// True iff the type token carries the `[]` list marker
    #[serde(rename = "isList")]
    pub is_list: bool,
    /// True iff the type token carries no `?` nullability marker
    #[serde(rename = "isRequired")]
    pub is_required: bool,
    /// Always `None`; serialized as `null` for prompt-format stability
    pub relation: Option<String>,
}

/// One declared entity type and its scalar fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Entity name as declared
    pub name: String,
    /// Scalar fields, relation lines excluded
    pub fields: Vec<FieldDescriptor>,
}

/// Ordered summary of every entity block in a schema source.
///
/// Produced fresh on each pipeline invocation and consumed read-only by the
/// query generator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// Entity descriptors in declaration order
    pub models: Vec<ModelDescriptor>,
}

impl SchemaSnapshot {
    /// Renders the snapshot as pretty JSON for prompt embedding.
    ///
    /// The shape matches the descriptor serde layout: an array of
    /// `{name, fields: [{name, type, isList, isRequired, relation}]}`.
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(&self.models).unwrap_or_else(|_| "[]".to_string())
    }

    /// Entity names in declaration order.
    pub fn model_names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name.as_str()).collect()
    }

    /// Looks up a model by case-insensitive name.
    pub fn find_model(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }
}

impl From<&SchemaSnapshot> for JsonValue {
    fn from(snapshot: &SchemaSnapshot) -> Self {
        serde_json::to_value(&snapshot.models).unwrap_or(JsonValue::Array(vec![]))
    }
}
