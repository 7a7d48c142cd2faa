//! The structured action extracted from an LLM reply.

use serde::{Deserialize, Serialize};

use super::params::Parameters;

/// Rationale attached to decisions produced from an unusable LLM reply
pub const SELECTION_ERROR_RATIONALE: &str = "Error in AI processing";

/// Which server and tool to call, and with what
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Decision {
    pub server_key: Option<String>,
    pub tool_name: Option<String>,
    pub parameters: Parameters,
    pub rationale: String,
}

impl Decision {
    pub fn new(
        server_key: impl Into<String>,
        tool_name: impl Into<String>,
        parameters: Parameters,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            server_key: Some(server_key.into()),
            tool_name: Some(tool_name.into()),
            parameters,
            rationale: rationale.into(),
        }
    }

    /// "No suitable tool" with the LLM's own explanation
    pub fn no_tool(rationale: impl Into<String>) -> Self {
        Self {
            rationale: rationale.into(),
            ..Default::default()
        }
    }

    /// Degraded decision used whenever selection fails
    pub fn selection_error() -> Self {
        Self::no_tool(SELECTION_ERROR_RATIONALE)
    }

    /// Server and tool, when both are present and non-empty
    pub fn target(&self) -> Option<(&str, &str)> {
        match (self.server_key.as_deref(), self.tool_name.as_deref()) {
            (Some(server), Some(tool)) if !server.is_empty() && !tool.is_empty() => Some((server, tool)),
            _ => None,
        }
    }
}
