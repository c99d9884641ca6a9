//! Tool executor for the ReAct controller.
//!
//! Validates a parsed invocation against the registry and turns every
//! outcome, including failures, into observation text for the model.

use serde_json::{Map, Value};
use shopdesk_core::{traits::ToolRegistry, types::ToolDefinition};
use shopdesk_governance::track_tool_call;
use std::sync::Arc;

use crate::parser::{ActionInput, ToolInvocation};

/// Tool executor that wraps registry access and observation formatting.
pub struct ToolExecutor {
    tools: Arc<dyn ToolRegistry>,
}

impl ToolExecutor {
    /// Create a new tool executor.
    pub fn new(tools: Arc<dyn ToolRegistry>) -> Self {
        Self { tools }
    }

    /// Definitions of all registered tools, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.list()
    }

    /// Execute an invocation and return the observation text.
    pub async fn execute(&self, invocation: &ToolInvocation) -> String {
        let name = invocation.tool.as_str();

        let Some(definition) = self.tools.get(name) else {
            tracing::warn!(tool = %name, "Model requested an unknown tool");
            track_tool_call(name, "unknown");
            let available: Vec<String> = self.tools.list().into_iter().map(|d| d.name).collect();
            return format!(
                "Tool '{}' not found. Available tools: {}",
                name,
                available.join(", ")
            );
        };

        let args = match resolve_arguments(&definition, &invocation.input) {
            Ok(args) => args,
            Err(reason) => {
                tracing::warn!(tool = %name, reason = %reason, "Rejected tool input");
                track_tool_call(name, "invalid");
                return format!("Invalid input for tool '{}': {}", name, reason);
            }
        };

        tracing::info!(tool = %name, "Executing tool call");
        match self.tools.execute(name, args).await {
            Ok(output) => {
                track_tool_call(name, if output.success { "ok" } else { "rejected" });
                tracing::debug!(tool = %name, success = output.success, "Tool finished");
                output.content
            }
            Err(e) if e.is_invocation_error() => {
                tracing::warn!(tool = %name, error = %e, "Tool arguments did not match schema");
                track_tool_call(name, "invalid");
                format!("Invalid input for tool '{}': {}", name, e)
            }
            Err(e) => {
                tracing::error!(tool = %name, error = %e, "Tool execution failed");
                track_tool_call(name, "error");
                format!("Tool '{}' failed: {}", name, e)
            }
        }
    }
}

/// Build the argument object for a tool.
///
/// A bare value binds to the single required parameter, or to the only
/// parameter when the tool declares just one.
fn resolve_arguments(
    definition: &ToolDefinition,
    input: &ActionInput,
) -> std::result::Result<Value, String> {
    match input {
        ActionInput::Empty => Ok(Value::Object(Map::new())),
        ActionInput::Json(value @ Value::Object(_)) => Ok(value.clone()),
        ActionInput::Json(_) => Err("expected a JSON object of arguments".to_string()),
        ActionInput::Text(text) => {
            let params = definition.parameter_names();
            if params.is_empty() {
                return Ok(Value::Object(Map::new()));
            }
            let required = definition.required_parameters();
            let target = match (required.as_slice(), params.as_slice()) {
                ([only], _) | ([], [only]) => only.clone(),
                _ => {
                    return Err(format!(
                        "expected a JSON object with the fields {}",
                        params.join(", ")
                    ))
                }
            };
            let mut args = Map::new();
            args.insert(target, Value::String(text.clone()));
            Ok(Value::Object(args))
        }
    }
}
