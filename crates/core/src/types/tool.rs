use serde::{Deserialize, Serialize};

// =============================================================================
// Tool Types
// =============================================================================

/// Marker that opens every structured tool result.
pub const RESULT_PREFIX: &str = "RESULT:";

/// Output from a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Whether the tool reached its intended outcome (a lookup hit, an
    /// accepted mutation). Rejections and misses are still valid output.
    pub success: bool,

    /// Text payload handed back to the model as the observation.
    pub content: String,

    /// Optional structured data.
    pub data: Option<serde_json::Value>,
}

impl ToolOutput {
    /// A successful `RESULT:` payload.
    pub fn result(body: impl AsRef<str>) -> Self {
        Self {
            success: true,
            content: format!("{} {}", RESULT_PREFIX, body.as_ref()),
            data: None,
        }
    }

    /// A `RESULT:` payload describing a miss or a rejected request.
    pub fn rejected(body: impl AsRef<str>) -> Self {
        Self {
            success: false,
            ..Self::result(body)
        }
    }

    /// Attach structured data.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Whether the payload follows the `RESULT:` convention.
    pub fn is_structured(&self) -> bool {
        self.content.starts_with(RESULT_PREFIX)
    }
}

/// Tool definition exposed by the tool registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,

    /// Usage hint shown to the model.
    pub description: String,

    /// JSON Schema for tool arguments.
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Names of the declared parameters.
    pub fn parameter_names(&self) -> Vec<String> {
        self.parameters
            .get("properties")
            .and_then(|p| p.as_object())
            .map(|props| props.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Names listed in the schema's `required` array.
    pub fn required_parameters(&self) -> Vec<String> {
        self.parameters
            .get("required")
            .and_then(|r| r.as_array())
            .map(|names| {
                names
                    .iter()
                    .filter_map(|n| n.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The `name: description` line used in the prompt.
    pub fn prompt_line(&self) -> String {
        let params = self.parameter_names();
        if params.is_empty() {
            format!("{}: {}", self.name, self.description)
        } else {
            format!(
                "{}: {} Arguments: {}.",
                self.name,
                self.description,
                params.join(", ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_prefix() {
        let out = ToolOutput::result("Order ORD001 found");
        assert!(out.success);
        assert!(out.is_structured());
        assert_eq!(out.content, "RESULT: Order ORD001 found");

        let miss = ToolOutput::rejected("Order ORD999 not found.");
        assert!(!miss.success);
        assert!(miss.is_structured());
    }

    #[test]
    fn test_prompt_line_lists_parameters() {
        let def = ToolDefinition {
            name: "order_status".into(),
            description: "Check the status of an order.".into(),
            parameters: json!({
                "type": "object",
                "properties": { "order_id": { "type": "string" } },
                "required": ["order_id"]
            }),
        };
        assert_eq!(def.parameter_names(), vec!["order_id".to_string()]);
        assert_eq!(
            def.prompt_line(),
            "order_status: Check the status of an order. Arguments: order_id."
        );
    }
}
