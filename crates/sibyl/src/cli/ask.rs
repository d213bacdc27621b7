//! Command handlers.

use crate::cli::commands::OutputFormat;
use crate::config::SibylConfig;
use crate::render::render_output;
use sibyl_database::{EntityRegistry, QueryExecutor, establish_connection};
use sibyl_error::SibylResult;
use sibyl_interface::SibylDriver;
use sibyl_models::OpenRouterClient;
use sibyl_pipeline::{QueryMode, QueryPipeline};
use sibyl_schema::describe_schema;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;

/// Runs one question through the full pipeline and prints the answer.
pub async fn run_ask(
    question: &str,
    mode: Option<QueryMode>,
    format: &OutputFormat,
) -> SibylResult<()> {
    let config = SibylConfig::load()?;
    let mode = mode.unwrap_or(config.mode);
    let schema_path = config.schema_path();

    let model_config = config.model_config()?;
    let timeout = Duration::from_secs(model_config.timeout_secs);
    let driver = Arc::new(OpenRouterClient::new(model_config)?);
    info!(model = %driver.model_name(), %mode, "Answering question");

    let connection = establish_connection(&config.database_url()?)?;
    let snapshot = describe_schema(&schema_path)?;
    let registry = EntityRegistry::from_snapshot(&snapshot);
    let executor = Arc::new(QueryExecutor::new(
        Arc::new(Mutex::new(connection)),
        registry,
    ));

    let pipeline = QueryPipeline::new(driver, executor, schema_path)
        .with_mode(mode)
        .with_model_timeout(timeout)
        .with_classifier_attempts(config.classifier_attempts());

    let output = pipeline.run(question).await?;
    match format {
        OutputFormat::Human => println!("{}", render_output(&output)),
        OutputFormat::Json => println!("{}", output),
    }
    Ok(())
}

/// Prints the schema summary as prompt-ready JSON.
pub fn run_schema(path: Option<&Path>) -> SibylResult<()> {
    let resolved = match path {
        Some(path) => path.to_path_buf(),
        None => SibylConfig::load()?.schema_path(),
    };
    let snapshot = describe_schema(&resolved)?;
    println!("{}", snapshot.to_prompt_json());
    Ok(())
}
