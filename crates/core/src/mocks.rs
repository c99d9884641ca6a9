//! Mock implementations of core traits for testing.
//!
//! Shared by the controller, gateway and system tests so that no test needs a
//! running model server.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    traits::{LlmClient, LlmResponse, Tool, ToolRegistry},
    types::{ToolDefinition, ToolOutput},
    Error, Result,
};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

// =============================================================================
// Mock LLM Client
// =============================================================================

/// Scripted mock LLM that returns predefined responses in order, cycling
/// once the script is exhausted.
pub struct MockLlm {
    responses: Vec<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    /// Create a new mock LLM with a queue of responses.
    pub fn new<S: Into<String>>(responses: impl IntoIterator<Item = S>) -> Self {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always returns the same response.
    pub fn constant(response: &str) -> Self {
        Self::new([response])
    }

    /// Get the number of calls made to this mock.
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Every prompt received so far.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// The most recent prompt, if any.
    pub fn last_prompt(&self) -> Option<String> {
        lock(&self.prompts).last().cloned()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    fn model(&self) -> &str {
        "mock"
    }

    async fn complete(&self, prompt: &str) -> Result<LlmResponse> {
        let idx = {
            let mut prompts = lock(&self.prompts);
            prompts.push(prompt.to_string());
            prompts.len() - 1
        };

        let content = if self.responses.is_empty() {
            "Final Answer: Done".to_string()
        } else {
            self.responses[idx % self.responses.len()].clone()
        };
        Ok(LlmResponse::estimated(prompt, content))
    }
}

/// LLM that fails every call, as an unreachable model server would.
pub struct FailingLlm {
    message: String,
}

impl FailingLlm {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl LlmClient for FailingLlm {
    fn model(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _prompt: &str) -> Result<LlmResponse> {
        Err(Error::model_provider(self.message.clone()))
    }
}

// =============================================================================
// Mock Tool Registry
// =============================================================================

/// Mock tool that records calls and answers with a fixed payload.
pub struct RecordingTool {
    name: String,
    description: String,
    response: String,
    calls: Mutex<Vec<Value>>,
}

impl RecordingTool {
    pub fn new(name: &str, description: &str, response: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            response: response.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Value> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl Tool for RecordingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": { "input": { "type": "string" } }
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        lock(&self.calls).push(args);
        Ok(ToolOutput::result(&self.response))
    }
}

/// Simple mock tool registry keyed by name.
#[derive(Default)]
pub struct MockToolRegistry {
    order: Vec<String>,
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl MockToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with predefined tools.
    pub fn with_tools(tools: Vec<Arc<dyn Tool>>) -> Self {
        let mut registry = Self::new();
        for tool in tools {
            let name = tool.name().to_string();
            if registry.tools.insert(name.clone(), tool).is_none() {
                registry.order.push(name);
            }
        }
        registry
    }

    fn definition(tool: &Arc<dyn Tool>) -> ToolDefinition {
        ToolDefinition {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: tool.parameters(),
        }
    }
}

#[async_trait]
impl ToolRegistry for MockToolRegistry {
    fn list(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(Self::definition)
            .collect()
    }

    fn get(&self, name: &str) -> Option<ToolDefinition> {
        self.tools.get(name).map(Self::definition)
    }

    async fn execute(&self, name: &str, args: Value) -> Result<ToolOutput> {
        match self.tools.get(name) {
            Some(tool) => tool.execute(args).await,
            None => Err(Error::tool_not_found(name)),
        }
    }
}
