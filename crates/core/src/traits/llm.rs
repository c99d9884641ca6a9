//! Model Gateway traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::Result;

/// LLM client interface.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Identifier of the model behind this client (for logs and metrics).
    fn model(&self) -> &str;

    /// Generate a completion for a fully rendered prompt.
    async fn complete(&self, prompt: &str) -> Result<LlmResponse>;
}

/// Response from an LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Generated content.
    pub content: String,
    /// Finish reason.
    pub finish_reason: String,
    /// Token usage.
    pub usage: LlmUsage,
}

impl LlmResponse {
    /// A finished response with estimated usage (about four bytes per token).
    pub fn estimated(prompt: &str, content: String) -> Self {
        let usage = LlmUsage {
            prompt_tokens: (prompt.len() / 4) as u64,
            completion_tokens: (content.len() / 4) as u64,
            total_tokens: ((prompt.len() + content.len()) / 4) as u64,
        };
        Self {
            content,
            finish_reason: "stop".to_string(),
            usage,
        }
    }
}

/// Token usage from LLM call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmUsage {
    /// Prompt tokens.
    pub prompt_tokens: u64,
    /// Completion tokens.
    pub completion_tokens: u64,
    /// Total tokens.
    pub total_tokens: u64,
}
