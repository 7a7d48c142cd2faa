//! Wire types for the tool-server HTTP API
//!
//! Shared by the server routes and the agent-side client so both ends agree
//! on field names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tools::ToolDescriptor;

/// `GET /`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfoResponse {
    pub name: String,
    pub description: String,
    pub version: String,
    pub tools: Vec<String>,
}

/// `GET /tools`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolsResponse {
    #[serde(default)]
    pub tools: BTreeMap<String, ToolDescriptor>,
}

/// `POST /execute` request body
///
/// `parameters` stays raw JSON here so the server can reject non-scalar
/// values with a validation error rather than a decode failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub tool_name: String,
    #[serde(default)]
    pub parameters: Option<Value>,
}

/// `POST /reload_tools`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_execute_request_parameters_optional() {
        let req: ExecuteRequest = serde_json::from_value(json!({"tool_name": "getTime"})).unwrap();
        assert_eq!(req.tool_name, "getTime");
        assert!(req.parameters.is_none());
    }

    #[test]
    fn test_tools_response_keys_descriptors_by_name() {
        let resp: ToolsResponse = serde_json::from_value(json!({
            "tools": {
                "addNumber": {
                    "description": "Add two numbers together",
                    "parameters": {
                        "type": "object",
                        "properties": {"a": {"type": "number", "description": "First"}},
                        "required": ["a"]
                    }
                }
            }
        }))
        .unwrap();
        let add = &resp.tools["addNumber"];
        assert_eq!(add.description, "Add two numbers together");
        assert_eq!(add.parameters.required, vec!["a"]);
    }

    #[test]
    fn test_reload_response_omits_absent_tools() {
        let resp = ReloadResponse {
            success: false,
            message: "Failed to reload tools".to_string(),
            tools: None,
        };
        let value = serde_json::to_value(resp).unwrap();
        assert!(value.get("tools").is_none());
    }
}
