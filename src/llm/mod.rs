//! LLM provider module
//!
//! Single-turn chat completions with tool definitions.

pub mod openai;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;
use types::{ChatCompletionRequest, ChatCompletionResponse};

/// A chat completions backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Model used when building requests
    fn model_name(&self) -> &str;

    /// Run one chat completion
    async fn complete(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse>;
}
