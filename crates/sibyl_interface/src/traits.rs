//! Trait definitions for LLM backends and query dispatch.

use crate::ExecutionResult;
use async_trait::async_trait;
use sibyl_core::{GenerateRequest, GenerateResponse};
use sibyl_error::SibylResult;

/// Core trait that all LLM backends must implement.
///
/// This provides the minimal interface for synchronous text generation.
#[async_trait]
pub trait SibylDriver: Send + Sync {
    /// Generate model output given a prompt request.
    async fn generate(&self, req: &GenerateRequest) -> SibylResult<GenerateResponse>;

    /// Provider name (e.g., "openrouter").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "openai/gpt-4o-mini").
    fn model_name(&self) -> &str;
}

/// Dispatch seam between the pipeline and the data store.
///
/// Defined here rather than in `sibyl_database` so the pipeline can run
/// against mock stores in tests without a live PostgreSQL instance.
#[async_trait]
pub trait QueryDispatch: Send + Sync {
    /// Execute generated SQL text after guard validation.
    async fn execute_raw(&self, query_text: &str) -> SibylResult<ExecutionResult>;

    /// Parse and execute a structured `store.<model>.<method>(...)` call.
    async fn execute_structured(&self, expr_text: &str) -> SibylResult<ExecutionResult>;
}
