//! Builder for ReActController.

use shopdesk_core::{
    template::PromptTemplate,
    traits::{LlmClient, ToolRegistry},
    Error, Result,
};
use std::sync::Arc;

use crate::executor::ToolExecutor;
use crate::memory::SessionMemories;
use crate::parser::ActionParser;
use crate::prompt::{PromptVars, DEFAULT_PROMPT};
use crate::react::{ReActConfig, ReActController};

/// Builder for constructing a ReActController.
pub struct ReActBuilder {
    config: ReActConfig,
    llm: Option<Arc<dyn LlmClient>>,
    tools: Option<Arc<dyn ToolRegistry>>,
    prompt: Option<PromptTemplate>,
}

impl ReActBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: ReActConfig::default(),
            llm: None,
            tools: None,
            prompt: None,
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: ReActConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the LLM client.
    pub fn with_llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Set the tool registry.
    pub fn with_tools(mut self, tools: Arc<dyn ToolRegistry>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Replace the built-in prompt template.
    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Build the ReActController.
    ///
    /// The template is rendered once here so a broken override fails at
    /// startup instead of on the first customer message.
    pub fn build(self) -> Result<ReActController> {
        let llm = self
            .llm
            .ok_or_else(|| Error::controller("LLM client not configured"))?;
        let registry = self
            .tools
            .ok_or_else(|| Error::controller("Tool registry not configured"))?;
        let prompt = match self.prompt {
            Some(prompt) => prompt,
            None => PromptTemplate::new(DEFAULT_PROMPT)?,
        };

        let executor = ToolExecutor::new(registry);
        let tools = executor.definitions();
        prompt.render(&PromptVars::new(&tools, String::new(), String::new()))?;

        tracing::debug!(
            model = %llm.model(),
            tools = tools.len(),
            max_iterations = self.config.max_iterations,
            "ReAct controller built"
        );

        Ok(ReActController {
            memories: SessionMemories::new(self.config.memory_capacity),
            config: self.config,
            llm,
            executor,
            tools,
            prompt,
            parser: ActionParser::new(),
        })
    }
}

impl Default for ReActBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopdesk_core::mocks::{MockLlm, MockToolRegistry};

    #[test]
    fn test_build_requires_llm() {
        let result = ReActBuilder::new()
            .with_tools(Arc::new(MockToolRegistry::new()))
            .build();
        match result {
            Err(Error::Controller(msg)) => assert!(msg.contains("LLM")),
            _ => panic!("Expected Controller error"),
        }
    }

    #[test]
    fn test_broken_prompt_override_is_rejected() {
        let prompt = PromptTemplate::new("Question: {{ question }}").unwrap();
        let result = ReActBuilder::new()
            .with_llm(Arc::new(MockLlm::constant("Final Answer: ok")))
            .with_tools(Arc::new(MockToolRegistry::new()))
            .with_prompt(prompt)
            .build();
        assert!(matches!(result, Err(Error::Template(_))));
    }
}
