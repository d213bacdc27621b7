//! OpenRouter API client.

use super::dto::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use sibyl_core::{GenerateRequest, GenerateResponse, Output};
use sibyl_error::{ModelsError, ModelsErrorKind, SibylResult};
use sibyl_interface::SibylDriver;
use std::time::Duration;
use tokio_retry2::{
    Retry, RetryError,
    strategy::{ExponentialBackoff, jitter},
};
use tracing::{debug, error, instrument, warn};

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_TRANSIENT_RETRIES: usize = 2;

/// Configuration for the OpenRouter client.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// API key for the `Authorization: Bearer` header
    pub api_key: String,
    /// Model identifier (e.g. "openai/gpt-4o-mini")
    pub model: String,
    /// Endpoint URL; defaults to the public OpenRouter endpoint
    pub base_url: String,
    /// Per-request deadline in seconds
    pub timeout_secs: u64,
}

impl OpenRouterConfig {
    /// Creates a config with the default endpoint and timeout.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENROUTER_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Reads the API key from `OPENROUTER_API_KEY` and the model from
    /// `OPENROUTER_CHAT_MODEL`.
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is unset.
    pub fn from_env() -> Result<Self, ModelsError> {
        let api_key = std::env::var("OPENROUTER_API_KEY").map_err(|_| {
            ModelsError::new(ModelsErrorKind::MissingApiKey(
                "OPENROUTER_API_KEY".to_string(),
            ))
        })?;
        let model = std::env::var("OPENROUTER_CHAT_MODEL").map_err(|_| {
            ModelsError::new(ModelsErrorKind::MissingApiKey(
                "OPENROUTER_CHAT_MODEL".to_string(),
            ))
        })?;
        Ok(Self::new(api_key, model))
    }
}

/// OpenRouter API client.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client,
    config: OpenRouterConfig,
}

impl OpenRouterClient {
    /// Creates a new OpenRouter client.
    ///
    /// The per-request timeout from the config is installed on the
    /// underlying HTTP client, bounding every remote call.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: OpenRouterConfig) -> Result<Self, ModelsError> {
        debug!(model = %config.model, "Creating new OpenRouter client");
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelsError::new(ModelsErrorKind::Builder(e.to_string())))?;

        Ok(Self { client, config })
    }

    /// Sends a chat-completion request, retrying transient failures.
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ModelsError> {
        let retry_strategy = ExponentialBackoff::from_millis(250)
            .factor(2)
            .max_delay(Duration::from_secs(5))
            .map(jitter)
            .take(MAX_TRANSIENT_RETRIES);

        Retry::spawn(retry_strategy, || async {
            match self.complete_once(request).await {
                Ok(response) => Ok(response),
                Err(e) if is_transient(&e) => {
                    warn!(error = %e, "Transient OpenRouter failure, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => Err(RetryError::Permanent(e)),
            }
        })
        .await
    }

    async fn complete_once(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ModelsError> {
        debug!("Sending request to OpenRouter API");

        let response = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!(error = ?e, "OpenRouter request timed out");
                    ModelsError::new(ModelsErrorKind::Timeout(self.config.timeout_secs))
                } else {
                    error!(error = ?e, "Failed to send request to OpenRouter API");
                    ModelsError::new(ModelsErrorKind::Http(format!("Request failed: {}", e)))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "OpenRouter API returned error");
            return Err(ModelsError::new(ModelsErrorKind::Api {
                status: status.as_u16(),
                message: body,
            }));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse OpenRouter response");
            ModelsError::new(ModelsErrorKind::Parse(format!(
                "Failed to parse response: {}",
                e
            )))
        })?;

        debug!(response_id = %completion.id, "Received response from OpenRouter");
        Ok(completion)
    }

    /// Converts a generic GenerateRequest to the wire request.
    fn convert_request(&self, request: &GenerateRequest) -> Result<ChatCompletionRequest, ModelsError> {
        let messages: Vec<ChatMessage> = request
            .messages
            .iter()
            .map(|msg| ChatMessage {
                role: msg.role.as_wire_str().to_string(),
                content: msg.content.clone(),
            })
            .collect();

        let mut builder = ChatCompletionRequest::builder();
        builder
            .model(request.model.clone().unwrap_or_else(|| self.config.model.clone()))
            .messages(messages);
        if let Some(max_tokens) = request.max_tokens {
            builder.max_tokens(max_tokens);
        }
        if let Some(temperature) = request.temperature {
            builder.temperature(temperature);
        }

        builder
            .build()
            .map_err(|e| ModelsError::new(ModelsErrorKind::Builder(e.to_string())))
    }

    /// Converts a wire response to a generic GenerateResponse.
    fn convert_response(response: &ChatCompletionResponse) -> Result<GenerateResponse, ModelsError> {
        let choice = response
            .choices
            .first()
            .ok_or_else(|| ModelsError::new(ModelsErrorKind::EmptyResponse))?;

        if choice.message.content.trim().is_empty() {
            return Err(ModelsError::new(ModelsErrorKind::EmptyResponse));
        }

        Ok(GenerateResponse {
            outputs: vec![Output::Text(choice.message.content.clone())],
        })
    }
}

/// Whether an error is worth retrying: timeouts, transport failures, rate
/// limits, and server-side errors.
fn is_transient(error: &ModelsError) -> bool {
    match &error.kind {
        ModelsErrorKind::Timeout(_) | ModelsErrorKind::Http(_) => true,
        ModelsErrorKind::Api { status, .. } => {
            *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
        }
        _ => false,
    }
}

#[async_trait]
impl SibylDriver for OpenRouterClient {
    #[instrument(skip(self, req), fields(provider = "openrouter", model = %self.config.model))]
    async fn generate(&self, req: &GenerateRequest) -> SibylResult<GenerateResponse> {
        let request = self.convert_request(req)?;
        let response = self.complete(&request).await?;
        Ok(Self::convert_response(&response)?)
    }

    fn provider_name(&self) -> &'static str {
        "openrouter"
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sibyl_core::Message;

    fn client() -> OpenRouterClient {
        OpenRouterClient::new(OpenRouterConfig::new("test-key", "openai/gpt-4o-mini")).unwrap()
    }

    #[test]
    fn convert_request_maps_roles_and_model_default() {
        let request = GenerateRequest {
            messages: vec![Message::system("rules"), Message::user("question")],
            max_tokens: Some(256),
            temperature: None,
            model: None,
        };
        let wire = client().convert_request(&request).unwrap();
        assert_eq!(wire.model, "openai/gpt-4o-mini");
        assert_eq!(wire.messages[0].role, "system");
        assert_eq!(wire.messages[1].role, "user");
        assert_eq!(wire.max_tokens, Some(256));
    }

    #[test]
    fn convert_response_takes_first_choice() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [
                {"message": {"role": "assistant", "content": "store.user.findMany()"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]}"#,
        )
        .unwrap();
        let generated = OpenRouterClient::convert_response(&response).unwrap();
        assert_eq!(generated.text(), "store.user.findMany()");
    }

    #[test]
    fn empty_choices_are_an_error() {
        let response: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let err = OpenRouterClient::convert_response(&response).unwrap_err();
        assert!(matches!(err.kind, ModelsErrorKind::EmptyResponse));
    }

    #[test]
    fn transient_classification() {
        assert!(is_transient(&ModelsError::new(ModelsErrorKind::Api {
            status: 429,
            message: String::new(),
        })));
        assert!(is_transient(&ModelsError::new(ModelsErrorKind::Timeout(30))));
        assert!(!is_transient(&ModelsError::new(ModelsErrorKind::Api {
            status: 401,
            message: String::new(),
        })));
    }
}
