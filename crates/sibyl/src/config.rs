//! Application configuration.
//!
//! Precedence, later sources overriding earlier: `sibyl.toml` in the current
//! directory (optional), then `SIBYL_`-prefixed environment variables.
//! Provider credentials fall back to the conventional `OPENROUTER_API_KEY`,
//! `OPENROUTER_CHAT_MODEL`, and `DATABASE_URL` variables so a plain `.env`
//! file is enough to run.

use config::{Config, Environment, File};
use serde::Deserialize;
use sibyl_error::{ConfigError, SibylResult};
use sibyl_models::OpenRouterConfig;
use sibyl_pipeline::{DEFAULT_CLASSIFIER_ATTEMPTS, QueryMode};
use std::path::PathBuf;
use tracing::{debug, instrument};

const DEFAULT_SCHEMA_PATH: &str = "prisma/schema.prisma";

/// Model provider settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelConfig {
    /// API key; falls back to `OPENROUTER_API_KEY`
    pub api_key: Option<String>,
    /// Model identifier; falls back to `OPENROUTER_CHAT_MODEL`
    pub model: Option<String>,
    /// Endpoint override for OpenAI-compatible providers
    pub base_url: Option<String>,
    /// Per-request deadline in seconds
    pub timeout_secs: Option<u64>,
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SibylConfig {
    /// PostgreSQL connection string; falls back to `DATABASE_URL`
    pub database_url: Option<String>,
    /// Path to the declarative schema file
    pub schema_path: Option<PathBuf>,
    /// Query dialect: "raw" or "structured"
    #[serde(default)]
    pub mode: QueryMode,
    /// Classifier attempt bound
    pub classifier_attempts: Option<u32>,
    /// Model provider settings
    #[serde(default)]
    pub model: ModelConfig,
}

impl SibylConfig {
    /// Loads configuration from `sibyl.toml` and the environment.
    ///
    /// `.env` is read first so both fallbacks and `SIBYL_` overrides can
    /// live there. The TOML file is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be read or parsed.
    #[instrument]
    pub fn load() -> SibylResult<Self> {
        dotenvy::dotenv().ok();
        debug!("Loading configuration: sibyl.toml then SIBYL_ environment overrides");

        Config::builder()
            .add_source(File::with_name("sibyl").required(false))
            .add_source(Environment::with_prefix("SIBYL").separator("__"))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| {
                ConfigError::new(format!("Failed to parse configuration: {}", e)).into()
            })
    }

    /// Resolves the database connection string.
    ///
    /// # Errors
    ///
    /// Returns an error when neither the config nor `DATABASE_URL` provides
    /// one.
    pub fn database_url(&self) -> SibylResult<String> {
        self.database_url
            .clone()
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .ok_or_else(|| ConfigError::missing("database_url", "DATABASE_URL").into())
    }

    /// Resolves the schema file path.
    pub fn schema_path(&self) -> PathBuf {
        self.schema_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_PATH))
    }

    /// Resolves the classifier attempt bound.
    pub fn classifier_attempts(&self) -> u32 {
        self.classifier_attempts
            .unwrap_or(DEFAULT_CLASSIFIER_ATTEMPTS)
    }

    /// Builds the OpenRouter client config, env variables filling any gaps.
    ///
    /// # Errors
    ///
    /// Returns an error when no API key or model name can be resolved.
    pub fn model_config(&self) -> SibylResult<OpenRouterConfig> {
        let mut resolved = match (&self.model.api_key, &self.model.model) {
            (Some(api_key), Some(model)) => OpenRouterConfig::new(api_key.clone(), model.clone()),
            _ => {
                let fallback = OpenRouterConfig::from_env()?;
                OpenRouterConfig::new(
                    self.model.api_key.clone().unwrap_or(fallback.api_key),
                    self.model.model.clone().unwrap_or(fallback.model),
                )
            }
        };
        if let Some(base_url) = &self.model.base_url {
            resolved.base_url = base_url.clone();
        }
        if let Some(timeout_secs) = self.model.timeout_secs {
            resolved.timeout_secs = timeout_secs;
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_unset_fields() {
        let config = SibylConfig::default();
        assert_eq!(config.schema_path(), PathBuf::from("prisma/schema.prisma"));
        assert_eq!(config.classifier_attempts(), DEFAULT_CLASSIFIER_ATTEMPTS);
        assert_eq!(config.mode, QueryMode::Structured);
    }

    #[test]
    fn toml_fields_deserialize() {
        let config: SibylConfig = toml::from_str(
            r#"
                database_url = "postgres://localhost/sibyl"
                schema_path = "schema.prisma"
                mode = "raw"
                classifier_attempts = 5

                [model]
                api_key = "sk-test"
                model = "openai/gpt-4o-mini"
                timeout_secs = 15
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, QueryMode::Raw);
        assert_eq!(config.classifier_attempts(), 5);
        assert_eq!(config.database_url().unwrap(), "postgres://localhost/sibyl");
        let model = config.model_config().unwrap();
        assert_eq!(model.model, "openai/gpt-4o-mini");
        assert_eq!(model.timeout_secs, 15);
    }
}
