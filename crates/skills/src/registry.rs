//! Tool registry implementation.
//!
//! Tools are indexed by [`ToolKind`]; a name the model sends is resolved
//! through `ToolKind::from_str` before any lookup.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use shopdesk_core::{
    traits::{Tool, ToolRegistry},
    types::{ToolDefinition, ToolOutput},
    Error, Result,
};

use crate::kind::ToolKind;

/// Collects tools before the registry is frozen.
#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<ToolKind, usize>,
}

impl ToolRegistryBuilder {
    /// Add a tool. Its name must be a [`ToolKind`] not yet registered.
    pub fn register(mut self, tool: Arc<dyn Tool>) -> Result<Self> {
        let kind: ToolKind = tool
            .name()
            .parse()
            .map_err(|_| Error::UnknownToolKind(tool.name().to_string()))?;
        if self.index.contains_key(&kind) {
            return Err(Error::DuplicateTool(kind.to_string()));
        }
        tracing::debug!(tool = %kind, "Registering tool");
        self.index.insert(kind, self.tools.len());
        self.tools.push(tool);
        Ok(self)
    }

    pub fn build(self) -> DefaultToolRegistry {
        let definitions = self
            .tools
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters(),
            })
            .collect();

        DefaultToolRegistry {
            tools: self.tools,
            definitions,
            index: self.index,
        }
    }
}

/// Immutable, ordered tool registry.
///
/// Descriptors are computed once at build time; lookups never lock.
pub struct DefaultToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    definitions: Vec<ToolDefinition>,
    index: HashMap<ToolKind, usize>,
}

impl DefaultToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Get the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    fn position(&self, name: &str) -> Option<(ToolKind, usize)> {
        let kind = name.parse::<ToolKind>().ok()?;
        self.index.get(&kind).map(|&i| (kind, i))
    }
}

#[async_trait]
impl ToolRegistry for DefaultToolRegistry {
    fn list(&self) -> Vec<ToolDefinition> {
        self.definitions.clone()
    }

    fn get(&self, name: &str) -> Option<ToolDefinition> {
        self.position(name).map(|(_, i)| self.definitions[i].clone())
    }

    async fn execute(&self, name: &str, args: serde_json::Value) -> Result<ToolOutput> {
        let (kind, i) = self
            .position(name)
            .ok_or_else(|| Error::tool_not_found(name))?;

        tracing::debug!(tool = %kind, mutating = kind.is_mutating(), "Executing tool");

        self.tools[i].execute(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopdesk_core::mocks::RecordingTool;

    fn lookup() -> Arc<dyn Tool> {
        Arc::new(RecordingTool::new("order_status", "Look up an order", "found"))
    }

    #[test]
    fn test_register_and_list() {
        let registry = DefaultToolRegistry::builder()
            .register(lookup())
            .unwrap()
            .build();

        let tools = registry.list();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "order_status");
        assert!(registry.get("order_status").is_some());
        assert!(registry.get("cancel_order").is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = DefaultToolRegistry::builder()
            .register(lookup())
            .and_then(|b| b.register(lookup()));

        assert!(matches!(result, Err(Error::DuplicateTool(name)) if name == "order_status"));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let tool: Arc<dyn Tool> = Arc::new(RecordingTool::new("teleport", "Not a tool", "no"));
        let result = DefaultToolRegistry::builder().register(tool);

        assert!(matches!(result, Err(Error::UnknownToolKind(name)) if name == "teleport"));
    }

    #[tokio::test]
    async fn test_execute() {
        let registry = DefaultToolRegistry::builder()
            .register(lookup())
            .unwrap()
            .build();

        let result = registry
            .execute("order_status", serde_json::json!({"input": "ORD001"}))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.content, "RESULT: found");
    }

    #[tokio::test]
    async fn test_execute_not_found() {
        let registry = DefaultToolRegistry::builder().build();

        let result = registry.execute("nonexistent", serde_json::json!({})).await;

        assert!(matches!(result, Err(Error::ToolNotFound(_))));
    }
}
