//! Typed tool arguments.
//!
//! Every tool declares a `Deserialize + JsonSchema` struct; the schema is what
//! the registry publishes and deserialization is the validation step.

use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};

use shopdesk_core::{Error, Result};

/// JSON Schema for an argument struct.
pub fn schema<T: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T))
        .unwrap_or_else(|_| json!({ "type": "object", "properties": {} }))
}

/// Validate raw arguments against the tool's argument struct.
///
/// A missing input (`null`) is treated as an empty object so that tools
/// whose fields are all optional accept a bare call.
pub fn parse<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T> {
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args).map_err(|e| Error::invalid_arguments(tool, e.to_string()))
}

/// A value the model may send either as a single string or as a list.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(v) => v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Self::Many(v) => v,
        }
    }
}

/// Blank optional strings count as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Capitalize the first letter of every word.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    #[derive(Debug, Deserialize, JsonSchema)]
    struct ReturnRequest {
        order_id: String,
        #[serde(default)]
        reason: String,
    }

    #[test]
    fn test_schema_lists_fields() {
        let schema = schema::<ReturnRequest>();
        let props = schema["properties"].as_object().unwrap();
        assert!(props.contains_key("order_id"));
        assert!(props.contains_key("reason"));
        assert_eq!(schema["required"], json!(["order_id"]));
    }

    #[test]
    fn test_parse_reports_tool_and_reason() {
        let err = parse::<ReturnRequest>("process_return", json!({ "reason": "broken" })).unwrap_err();
        match err {
            Error::InvalidArguments { tool, reason } => {
                assert_eq!(tool, "process_return");
                assert!(reason.contains("order_id"));
            }
            other => panic!("Expected InvalidArguments, got {:?}", other),
        }
    }

    #[test]
    fn test_one_or_many() {
        let one: OneOrMany = serde_json::from_value(json!("Books, Sports")).unwrap();
        assert_eq!(one.into_vec(), vec!["Books", "Sports"]);
        let many: OneOrMany = serde_json::from_value(json!(["Books"])).unwrap();
        assert_eq!(many.into_vec(), vec!["Books"]);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("light rain"), "Light Rain");
        assert_eq!(title_case("sunny"), "Sunny");
    }
}
