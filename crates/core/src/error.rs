//! Error types for ShopDesk.

use thiserror::Error;

/// Result type alias using ShopDesk's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ShopDesk.
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Gateway Errors
    // =========================================================================
    #[error("Gateway error: {0}")]
    Gateway(String),

    // =========================================================================
    // Controller Errors
    // =========================================================================
    #[error("Controller error: {0}")]
    Controller(String),

    // =========================================================================
    // Skills Errors
    // =========================================================================
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid arguments for tool '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    #[error("'{0}' is not a known tool kind")]
    UnknownToolKind(String),

    #[error("Tool execution failed: {0}")]
    ToolExecution(String),

    // =========================================================================
    // Model Gateway Errors
    // =========================================================================
    #[error("Model provider error: {0}")]
    ModelProvider(String),

    // =========================================================================
    // Template Errors
    // =========================================================================
    #[error("Template error: {0}")]
    Template(String),

    // =========================================================================
    // Governance Errors
    // =========================================================================
    #[error("Governance error: {0}")]
    Governance(String),

    // =========================================================================
    // Generic Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timeout: {0}")]
    Timeout(String),
}

impl Error {
    /// Create a gateway error.
    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    /// Create a controller error.
    pub fn controller(msg: impl Into<String>) -> Self {
        Self::Controller(msg.into())
    }

    /// Create a tool not found error.
    pub fn tool_not_found(name: impl Into<String>) -> Self {
        Self::ToolNotFound(name.into())
    }

    /// Create an invalid arguments error.
    pub fn invalid_arguments(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Create a tool execution error.
    pub fn tool_execution(msg: impl Into<String>) -> Self {
        Self::ToolExecution(msg.into())
    }

    /// Create a model provider error.
    pub fn model_provider(msg: impl Into<String>) -> Self {
        Self::ModelProvider(msg.into())
    }

    /// Create a governance error.
    pub fn governance(msg: impl Into<String>) -> Self {
        Self::Governance(msg.into())
    }

    /// Whether the error was produced by a tool invocation the model got wrong
    /// (unknown name or bad arguments) rather than by infrastructure.
    pub fn is_invocation_error(&self) -> bool {
        matches!(self, Self::ToolNotFound(_) | Self::InvalidArguments { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_arguments_display() {
        let err = Error::invalid_arguments("order_status", "missing field `order_id`");
        assert_eq!(
            err.to_string(),
            "Invalid arguments for tool 'order_status': missing field `order_id`"
        );
        assert!(err.is_invocation_error());
    }

    #[test]
    fn test_provider_error_is_not_invocation_error() {
        assert!(!Error::model_provider("connection refused").is_invocation_error());
        assert!(Error::tool_not_found("teleport").is_invocation_error());
    }
}
