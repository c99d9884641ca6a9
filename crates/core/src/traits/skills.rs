//! Skills traits.

use async_trait::async_trait;
use serde_json::Value;
use crate::error::Result;
use crate::types::{ToolDefinition, ToolOutput};

/// Tool interface for atomic operations.
///
/// `execute` returns `Err` only when the arguments do not match the declared
/// schema; every domain outcome (miss, rejection) is a `ToolOutput`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the unique name of the tool.
    fn name(&self) -> &str;

    /// Get the usage hint shown to the model.
    fn description(&self) -> &str;

    /// Get the JSON Schema for parameters.
    fn parameters(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: Value) -> Result<ToolOutput>;
}

/// Read-only view over a fixed set of tools.
#[async_trait]
pub trait ToolRegistry: Send + Sync {
    /// All tool definitions, in registration order.
    fn list(&self) -> Vec<ToolDefinition>;

    /// Definition of a single tool.
    fn get(&self, name: &str) -> Option<ToolDefinition>;

    /// Execute a tool by name with arguments.
    async fn execute(&self, name: &str, args: Value) -> Result<ToolOutput>;
}
