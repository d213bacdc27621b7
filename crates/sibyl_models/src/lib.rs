//! LLM provider integration for the Sibyl pipeline.
//!
//! Provides the OpenRouter client used for both query generation and result
//! classification. OpenRouter speaks the OpenAI-compatible chat-completions
//! wire format, so the same client would serve any compatible provider by
//! swapping the base URL.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod openrouter;

pub use openrouter::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, OpenRouterClient,
    OpenRouterConfig,
};
