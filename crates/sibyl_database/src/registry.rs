//! Closed entity registry for structured dispatch.
//!
//! Generated call expressions name entities as free-form strings. Instead of
//! reflecting over an open store object, lookups go through a registry built
//! once from the schema snapshot; unknown names fail with a typed error
//! before any connection is touched.

use crate::QueryResult;
use sibyl_error::{QueryError, QueryErrorKind};
use sibyl_schema::SchemaSnapshot;
use std::collections::BTreeMap;

/// Capability handle for one known entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityHandle {
    /// Entity name with its declared casing (e.g. `User`)
    model_name: String,
    /// Scalar column names from the schema snapshot
    columns: Vec<String>,
}

impl EntityHandle {
    /// Entity name as declared in the schema.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// The SQL table identifier, double-quoted to preserve casing.
    pub fn table(&self) -> String {
        format!("\"{}\"", self.model_name)
    }

    /// Scalar column names known for this entity.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether the given column is declared on this entity.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

/// Registry mapping lower-cased entity names to capability handles.
///
/// # Examples
///
/// ```
/// use sibyl_database::EntityRegistry;
/// use sibyl_schema::parse_schema;
///
/// let snapshot = parse_schema("model User { id Int name String? }");
/// let registry = EntityRegistry::from_snapshot(&snapshot);
///
/// assert!(registry.resolve("user").is_ok());
/// assert!(registry.resolve("ghost").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: BTreeMap<String, EntityHandle>,
}

impl EntityRegistry {
    /// Builds a registry from a schema snapshot.
    pub fn from_snapshot(snapshot: &SchemaSnapshot) -> Self {
        let entities = snapshot
            .models
            .iter()
            .map(|model| {
                let handle = EntityHandle {
                    model_name: model.name.clone(),
                    columns: model.fields.iter().map(|f| f.name.clone()).collect(),
                };
                (model.name.to_lowercase(), handle)
            })
            .collect();

        Self { entities }
    }

    /// Resolves a lower-cased entity name to its handle.
    ///
    /// # Errors
    ///
    /// Returns `UnknownModel` when the name is not in the registry.
    pub fn resolve(&self, name: &str) -> QueryResult<&EntityHandle> {
        self.entities.get(&name.to_lowercase()).ok_or_else(|| {
            QueryError::new(QueryErrorKind::UnknownModel(name.to_string()))
        })
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
