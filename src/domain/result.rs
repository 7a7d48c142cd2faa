//! Uniform outcome of a tool invocation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message returned when the LLM found nothing suitable
pub const NO_TOOL_MESSAGE: &str = "No appropriate MCP or tool found for this request";

/// Result shape shared by every tool, the tool servers and the dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(default = "empty_object")]
    pub data: Value,
    #[serde(default)]
    pub message: String,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl ExecutionResult {
    /// Successful result carrying structured data
    pub fn success(data: Value, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Failed result with empty data
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: empty_object(),
            message: message.into(),
        }
    }

    /// The canonical "nothing to run" result
    pub fn no_tool() -> Self {
        Self::failure(NO_TOOL_MESSAGE)
    }
}
