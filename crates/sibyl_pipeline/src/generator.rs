//! Query generation from natural-language input.

use serde::{Deserialize, Serialize};
use sibyl_core::{GenerateRequest, Message};
use sibyl_error::{ModelsError, ModelsErrorKind, SibylResult};
use sibyl_interface::SibylDriver;
use sibyl_schema::SchemaSnapshot;
use std::sync::Arc;
use std::time::Duration;
use strum::{Display, EnumString};
use tracing::{debug, instrument};

/// Which query dialect the generator asks the model for.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Raw PostgreSQL text
    Raw,
    /// A `store.<model>.<method>({...})` access expression
    #[default]
    Structured,
}

/// Generated query text, still fenced and untrimmed beyond the driver's
/// own trimming. Stripping and validation belong to the executor.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{}", _0)]
pub struct GeneratedQuery(String);

impl GeneratedQuery {
    /// Borrows the generated text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper, yielding the text.
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Prompts a model to turn a user question into a query against a known
/// schema.
pub struct QueryGenerator {
    driver: Arc<dyn SibylDriver>,
    timeout: Duration,
}

impl QueryGenerator {
    /// Creates a generator over the given driver with the given per-call
    /// deadline.
    pub fn new(driver: Arc<dyn SibylDriver>, timeout: Duration) -> Self {
        Self { driver, timeout }
    }

    /// Generates a query for `user_input` in the requested mode.
    ///
    /// # Errors
    ///
    /// Returns an error when the model call fails or exceeds the deadline.
    #[instrument(skip(self, snapshot), fields(mode = %mode))]
    pub async fn generate(
        &self,
        user_input: &str,
        snapshot: &SchemaSnapshot,
        mode: QueryMode,
    ) -> SibylResult<GeneratedQuery> {
        let prompt = match mode {
            QueryMode::Raw => sql_prompt(user_input, snapshot),
            QueryMode::Structured => structured_prompt(user_input, snapshot),
        };
        debug!(chars = prompt.len(), "Built generation prompt");

        let request = GenerateRequest::new(vec![Message::user(prompt)]);
        let response = tokio::time::timeout(self.timeout, self.driver.generate(&request))
            .await
            .map_err(|_| {
                ModelsError::new(ModelsErrorKind::Timeout(self.timeout.as_secs()))
            })??;

        Ok(GeneratedQuery(response.text()))
    }
}

fn sql_prompt(user_input: &str, snapshot: &SchemaSnapshot) -> String {
    format!(
        "You are a SQL generator for PostgreSQL.\n\
         Schema:\n{schema}\n\n\
         User request: \"{user_input}\"\n\
         Generate the most accurate SQL query to fulfill the request.\n\
         Output only the SQL.",
        schema = snapshot.to_prompt_json(),
    )
}

fn structured_prompt(user_input: &str, snapshot: &SchemaSnapshot) -> String {
    format!(
        "You are a query generator for a typed data store.\n\
         Schema:\n{schema}\n\n\
         User request: \"{user_input}\"\n\
         Generate a single valid call of the form \"store.<model>.<method>({{...}})\".\n\
         Supported methods: findMany, findUnique, findFirst, count, create, update, delete.\n\
         Output only the executable code.",
        schema = snapshot.to_prompt_json(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sibyl_schema::parse_schema;
    use std::str::FromStr;

    const SCHEMA: &str = r#"
        model User {
            id    Int     @id
            email String  @unique
        }
    "#;

    #[test]
    fn sql_prompt_embeds_schema_and_question() {
        let snapshot = parse_schema(SCHEMA);
        let prompt = sql_prompt("how many users are there", &snapshot);
        assert!(prompt.contains("PostgreSQL"));
        assert!(prompt.contains("\"email\""));
        assert!(prompt.contains("how many users are there"));
        assert!(prompt.contains("Output only the SQL."));
    }

    #[test]
    fn structured_prompt_names_the_call_shape() {
        let snapshot = parse_schema(SCHEMA);
        let prompt = structured_prompt("list all users", &snapshot);
        assert!(prompt.contains("store.<model>.<method>"));
        assert!(prompt.contains("findMany"));
        assert!(prompt.contains("Output only the executable code."));
    }

    #[test]
    fn mode_parses_from_config_strings() {
        assert_eq!(QueryMode::from_str("raw").unwrap(), QueryMode::Raw);
        assert_eq!(
            QueryMode::from_str("structured").unwrap(),
            QueryMode::Structured
        );
        assert!(QueryMode::from_str("orm").is_err());
    }
}
