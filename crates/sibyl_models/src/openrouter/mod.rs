//! OpenRouter chat-completions driver.

mod client;
mod dto;

pub use client::{OpenRouterClient, OpenRouterConfig};
pub use dto::{ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
