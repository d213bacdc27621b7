//! End-to-end pipeline: question in, presentation envelope out.

use crate::classifier::{DEFAULT_CLASSIFIER_ATTEMPTS, ResultClassifier};
use crate::envelope::ResultEnvelope;
use crate::generator::{QueryGenerator, QueryMode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sibyl_error::SibylResult;
use sibyl_interface::{QueryDispatch, SibylDriver, ToolDefinition};
use sibyl_schema::{SchemaSnapshot, describe_schema};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Fixed reply when a query legitimately matches nothing.
pub const NO_DATA_MESSAGE: &str = "No data found for the given query.";

const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;

/// Input accepted by the text-to-query tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInput {
    /// The natural-language question
    #[serde(rename = "userInput")]
    pub user_input: String,
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutput {
    /// A classified result ready for presentation
    Envelope(ResultEnvelope),
    /// The query executed but matched no data
    NoData,
}

impl PipelineOutput {
    /// True for the no-data short circuit.
    pub fn is_no_data(&self) -> bool {
        matches!(self, PipelineOutput::NoData)
    }
}

impl std::fmt::Display for PipelineOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineOutput::NoData => f.write_str(NO_DATA_MESSAGE),
            PipelineOutput::Envelope(envelope) => {
                let body = serde_json::to_string_pretty(envelope).map_err(|_| std::fmt::Error)?;
                f.write_str(&body)
            }
        }
    }
}

/// Orchestrates schema introspection, query generation, execution, and
/// result classification.
///
/// The schema is re-read on every run so edits to the data model take
/// effect without a restart.
pub struct QueryPipeline {
    driver: Arc<dyn SibylDriver>,
    dispatch: Arc<dyn QueryDispatch>,
    schema_path: PathBuf,
    mode: QueryMode,
    model_timeout: Duration,
    classifier_attempts: u32,
}

impl QueryPipeline {
    /// Creates a pipeline with default mode, timeout, and attempt bound.
    pub fn new(
        driver: Arc<dyn SibylDriver>,
        dispatch: Arc<dyn QueryDispatch>,
        schema_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            driver,
            dispatch,
            schema_path: schema_path.into(),
            mode: QueryMode::default(),
            model_timeout: Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS),
            classifier_attempts: DEFAULT_CLASSIFIER_ATTEMPTS,
        }
    }

    /// Sets the query dialect.
    pub fn with_mode(mut self, mode: QueryMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the deadline applied to each model call.
    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }

    /// Sets the classifier attempt bound.
    pub fn with_classifier_attempts(mut self, attempts: u32) -> Self {
        self.classifier_attempts = attempts;
        self
    }

    /// Runs the full pipeline for one question.
    ///
    /// An empty execution result short-circuits to [`PipelineOutput::NoData`]
    /// without consulting the classifier.
    ///
    /// # Errors
    ///
    /// Propagates schema, generation, execution, and classification errors.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub async fn run(&self, user_input: &str) -> SibylResult<PipelineOutput> {
        let snapshot = describe_schema(&self.schema_path)?;
        debug!(models = snapshot.models.len(), "Loaded schema snapshot");

        let generator = QueryGenerator::new(self.driver.clone(), self.model_timeout);
        let query = generator.generate(user_input, &snapshot, self.mode).await?;
        info!(query = %query, "Generated query");

        let result = match self.mode {
            QueryMode::Raw => self.dispatch.execute_raw(query.as_str()).await?,
            QueryMode::Structured => self.dispatch.execute_structured(query.as_str()).await?,
        };

        if result.is_empty() {
            info!("Query matched no data");
            return Ok(PipelineOutput::NoData);
        }

        let classifier = ResultClassifier::new(self.driver.clone(), self.model_timeout)
            .with_max_attempts(self.classifier_attempts);
        let envelope = classifier.classify(user_input, &result).await?;
        Ok(PipelineOutput::Envelope(envelope))
    }
}

/// Builds the tool definition advertising this pipeline to a chat agent.
pub fn tool_definition(snapshot: &SchemaSnapshot) -> ToolDefinition {
    ToolDefinition {
        name: "textToSql".to_string(),
        description: format!(
            "Convert natural language into database queries and execute them. \
             Schema of the system:\n{}\n\
             Use this tool when the user asks about database content, data \
             analysis, or information retrieval from the system. This tool \
             automatically formats the response for optimal display.",
            snapshot.to_prompt_json(),
        ),
        parameters: json!({
            "type": "object",
            "properties": {
                "userInput": {
                    "type": "string",
                    "description": "The natural language query of the user"
                }
            },
            "required": ["userInput"]
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sibyl_schema::parse_schema;

    #[test]
    fn no_data_output_renders_the_fixed_message() {
        assert_eq!(
            format!("{}", PipelineOutput::NoData),
            "No data found for the given query."
        );
    }

    #[test]
    fn tool_definition_embeds_schema_and_input_parameter() {
        let snapshot = parse_schema("model User { id Int @id }");
        let tool = tool_definition(&snapshot);
        assert_eq!(tool.name, "textToSql");
        assert!(tool.description.contains("\"User\""));
        assert_eq!(tool.parameters["required"][0], "userInput");
    }

    #[test]
    fn tool_input_uses_camel_case_on_the_wire() {
        let input: ToolInput =
            serde_json::from_str(r#"{"userInput": "list users"}"#).unwrap();
        assert_eq!(input.user_input, "list users");
    }
}
