//! Offline LLM provider.

use async_trait::async_trait;

use shopdesk_core::{
    traits::{LlmClient, LlmResponse},
    Result,
};

const OFFLINE_REPLY: &str = "I'm running in offline demo mode without a language model, so I can't look that up right now. Please try again once the assistant is fully online.";

/// Provider that answers every prompt directly with a fixed reply.
///
/// Selected with `model.provider = "mock"` to exercise the HTTP surface
/// without a model server.
pub struct MockLlmClient {
    response: String,
}

impl MockLlmClient {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new(OFFLINE_REPLY)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn model(&self) -> &str {
        "mock"
    }

    async fn complete(&self, prompt: &str) -> Result<LlmResponse> {
        Ok(LlmResponse::estimated(
            prompt,
            format!("Thought: I can answer directly.\nFinal Answer: {}", self.response),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client_answers_in_react_grammar() {
        let client = MockLlmClient::new("Hello there");

        let response = client.complete("Question: hi").await.unwrap();
        assert!(response.content.ends_with("Final Answer: Hello there"));
        assert!(response.usage.total_tokens > 0);
    }
}
