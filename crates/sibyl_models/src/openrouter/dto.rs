//! Wire types for the OpenAI-compatible chat-completions endpoint.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// A chat message on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role: "system", "user", or "assistant"
    pub role: String,
    /// Text content
    pub content: String,
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
#[builder(setter(into, strip_option))]
pub struct ChatCompletionRequest {
    /// Model identifier (e.g. "openai/gpt-4o-mini")
    pub model: String,
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub temperature: Option<f32>,
}

impl ChatCompletionRequest {
    /// Creates a new request builder.
    pub fn builder() -> ChatCompletionRequestBuilder {
        ChatCompletionRequestBuilder::default()
    }
}

/// One generated choice in a completion response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatChoice {
    /// The generated message
    pub message: ChatMessage,
    /// Why generation stopped, when reported
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Response body from `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatCompletionResponse {
    /// Provider-assigned response id
    #[serde(default)]
    pub id: String,
    /// Generated choices; the first is used
    pub choices: Vec<ChatChoice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_unset_sampling_fields() {
        let request = ChatCompletionRequest::builder()
            .model("openai/gpt-4o-mini")
            .messages(vec![ChatMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            }])
            .build()
            .unwrap();

        let body = serde_json::to_string(&request).unwrap();
        assert!(!body.contains("max_tokens"));
        assert!(!body.contains("temperature"));
    }

    #[test]
    fn response_decodes_minimal_payload() {
        let body = r#"{
            "id": "gen-123",
            "choices": [{"message": {"role": "assistant", "content": "SELECT 1"}}]
        }"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.choices[0].message.content, "SELECT 1");
        assert_eq!(response.choices[0].finish_reason, None);
    }
}
