//! Common utilities shared across the holiday tools.
//!
//! Parameter defaults, the error envelope, and conversion of a tool's JSON
//! outcome into an MCP result.

use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Year used when a tool call does not name one.
pub const DEFAULT_YEAR: i32 = 2026;

/// Country used when a tool call does not name one.
pub const DEFAULT_COUNTRY_CODE: &str = "us";

pub fn default_year() -> i32 {
    DEFAULT_YEAR
}

pub fn default_country_code() -> String {
    DEFAULT_COUNTRY_CODE.to_string()
}

/// Parameters of tools that take no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

/// Returned in place of the upstream body when a call fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    /// Endpoint template of the failing call.
    pub endpoint: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>, endpoint: &str) -> Self {
        Self {
            error: error.into(),
            endpoint: endpoint.to_string(),
        }
    }

    /// The envelope as JSON, shaped by its `Serialize` impl.
    pub fn into_value(self) -> Value {
        match serde_json::to_value(&self) {
            Ok(value) => value,
            Err(_) => Value::String(self.error),
        }
    }
}

/// Wrap a tool outcome as an MCP result: the JSON text as content, and the
/// value itself as structured content when it is an object.
pub fn call_result(value: Value) -> CallToolResult {
    let mut result = CallToolResult::success(vec![Content::text(value.to_string())]);
    if value.is_object() {
        result.structured_content = Some(value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;
    use serde_json::json;

    #[test]
    fn test_envelope_shape() {
        let value = ErrorEnvelope::new("boom", "/api/v3/Version").into_value();
        assert_eq!(value, json!({"error": "boom", "endpoint": "/api/v3/Version"}));
    }

    #[test]
    fn test_envelope_value_matches_serialize() {
        let envelope = ErrorEnvelope::new(
            "upstream returned HTTP 404",
            "/api/v3/CountryInfo/{countryCode}",
        );
        let value = envelope.clone().into_value();
        assert_eq!(value, serde_json::to_value(&envelope).unwrap());
        let back: ErrorEnvelope = serde_json::from_value(value).unwrap();
        assert_eq!(back, envelope);
    }

    #[test]
    fn test_call_result_for_array_has_text_only() {
        let result = call_result(json!([1, 2, 3]));
        assert_eq!(result.is_error, Some(false));
        assert!(result.structured_content.is_none());
        match &result.content[0].raw {
            RawContent::Text(text) => assert_eq!(text.text, "[1,2,3]"),
            _ => panic!("expected text content"),
        }
    }

    #[test]
    fn test_call_result_for_object_is_structured() {
        let result = call_result(json!({"version": "2.0"}));
        assert_eq!(result.structured_content, Some(json!({"version": "2.0"})));
    }

    #[test]
    fn test_no_params_ignores_unknown_keys() {
        assert!(serde_json::from_value::<NoParams>(json!({})).is_ok());
        assert!(serde_json::from_value::<NoParams>(json!({"extra": 1, "year": 2024})).is_ok());
    }
}
