#![deny(unused)]
//! Model Gateway for ShopDesk.
//!
//! This crate provides:
//! - Ollama client for a locally served model (the default)
//! - Rig LLM client adapter for hosted OpenAI and Anthropic models
//! - An offline mock provider for demos without a model server

pub mod ollama;
pub mod providers;
pub mod rig_client;

use std::sync::Arc;

use shopdesk_core::{config::ModelConfig, traits::LlmClient, Error, Result};

pub use ollama::{GenerateOptions, OllamaClient};
pub use providers::MockLlmClient;
pub use rig_client::{RigConfig, RigLlmClient, RigProvider};

/// Create the LLM client named by `model.provider`.
pub fn create_client_from_config(config: &ModelConfig) -> Result<Arc<dyn LlmClient>> {
    let client: Arc<dyn LlmClient> = match config.provider.to_lowercase().as_str() {
        "ollama" => Arc::new(OllamaClient::from_config(config)),
        "openai" => Arc::new(RigLlmClient::new(
            RigConfig::openai(&config.model)
                .with_temperature(config.temperature)
                .with_max_tokens(config.max_tokens),
        )),
        "anthropic" => Arc::new(RigLlmClient::new(
            RigConfig::anthropic(&config.model)
                .with_temperature(config.temperature)
                .with_max_tokens(config.max_tokens),
        )),
        "mock" => Arc::new(MockLlmClient::default()),
        other => {
            return Err(Error::ModelProvider(format!(
                "Unsupported model provider '{}'. Use ollama, openai, anthropic or mock.",
                other
            )))
        }
    };

    tracing::info!(provider = %config.provider, model = %client.model(), "Model client created");
    Ok(client)
}
