//! Rig LLM client adapter.
//!
//! Wraps Rig's Agent for the hosted providers, so `model.provider = "openai"`
//! or `"anthropic"` can stand in for the local Ollama server.

use async_trait::async_trait;

use shopdesk_core::{
    traits::{LlmClient, LlmResponse},
    Error, Result,
};

use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;

/// Provider type for Rig clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigProvider {
    OpenAI,
    Anthropic,
}

impl RigProvider {
    fn key_var(&self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

/// Configuration for Rig client.
#[derive(Debug, Clone)]
pub struct RigConfig {
    pub provider: RigProvider,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl RigConfig {
    /// Create config for OpenAI.
    pub fn openai(model: impl Into<String>) -> Self {
        Self {
            provider: RigProvider::OpenAI,
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Create config for Anthropic.
    pub fn anthropic(model: impl Into<String>) -> Self {
        Self {
            provider: RigProvider::Anthropic,
            ..Self::openai(model)
        }
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set max tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Rig-based LLM client.
pub struct RigLlmClient {
    config: RigConfig,
}

impl RigLlmClient {
    pub fn new(config: RigConfig) -> Self {
        Self { config }
    }

    fn ensure_key(&self) -> Result<()> {
        let var = self.config.provider.key_var();
        // from_env panics without the key
        if std::env::var(var).is_err() {
            return Err(Error::ModelProvider(format!("{} not set", var)));
        }
        Ok(())
    }

    async fn call_openai(&self, prompt: &str) -> Result<String> {
        use rig::providers::openai;

        let client = openai::Client::from_env();
        let mut builder = client.agent(&self.config.model);
        if let Some(temp) = self.config.temperature {
            builder = builder.temperature(f64::from(temp));
        }
        if let Some(max) = self.config.max_tokens {
            builder = builder.max_tokens(u64::from(max));
        }

        builder
            .build()
            .prompt(prompt)
            .await
            .map_err(|e| Error::ModelProvider(format!("OpenAI error: {}", e)))
    }

    async fn call_anthropic(&self, prompt: &str) -> Result<String> {
        use rig::providers::anthropic;

        let client = anthropic::Client::from_env();
        let mut builder = client.agent(&self.config.model);
        if let Some(temp) = self.config.temperature {
            builder = builder.temperature(f64::from(temp));
        }
        if let Some(max) = self.config.max_tokens {
            builder = builder.max_tokens(u64::from(max));
        }

        builder
            .build()
            .prompt(prompt)
            .await
            .map_err(|e| Error::ModelProvider(format!("Anthropic error: {}", e)))
    }
}

#[async_trait]
impl LlmClient for RigLlmClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str) -> Result<LlmResponse> {
        tracing::debug!(
            provider = ?self.config.provider,
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Calling LLM"
        );
        self.ensure_key()?;

        let content = match self.config.provider {
            RigProvider::OpenAI => self.call_openai(prompt).await?,
            RigProvider::Anthropic => self.call_anthropic(prompt).await?,
        };
        Ok(LlmResponse::estimated(prompt, content))
    }
}
