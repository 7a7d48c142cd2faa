//! Built-in tool sets served by `toolpick serve`

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{AddNumberTool, GetTimeTool, GetWeatherTool, SubtractNumberTool, Tool, ToolRegistry};
use crate::domain::ToolServerInfo;

/// Version reported by built-in tool servers
pub const SERVER_VERSION: &str = "1.0.0";

/// A compiled-in capability domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ToolSet {
    Calculator,
    Weather,
}

impl ToolSet {
    pub fn all() -> [ToolSet; 2] {
        [ToolSet::Weather, ToolSet::Calculator]
    }

    /// Key the agent configuration uses for this server
    pub fn server_key(&self) -> &'static str {
        match self {
            Self::Calculator => "calculator_mcp",
            Self::Weather => "weather_mcp",
        }
    }

    /// Name reported by `GET /`
    pub fn server_name(&self) -> &'static str {
        match self {
            Self::Calculator => "Calculator MCP Server",
            Self::Weather => "Weather MCP Server",
        }
    }

    /// Short name shown in the agent banner
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Calculator => "Calculator MCP",
            Self::Weather => "Weather MCP",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Calculator => "Provides basic mathematical operations",
            Self::Weather => "Provides weather and time information",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Self::Calculator => 3002,
            Self::Weather => 3001,
        }
    }

    /// Every handler this set can expose
    pub fn handlers(&self) -> Vec<Arc<dyn Tool>> {
        match self {
            Self::Calculator => vec![Arc::new(AddNumberTool), Arc::new(SubtractNumberTool)],
            Self::Weather => vec![Arc::new(GetWeatherTool), Arc::new(GetTimeTool)],
        }
    }

    pub fn handler(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.handlers().into_iter().find(|h| h.name() == name)
    }

    /// Empty registry carrying this set's identity
    pub fn empty_registry(&self) -> ToolRegistry {
        ToolRegistry::new(self.server_name(), self.description(), SERVER_VERSION)
    }

    /// Registry with every handler registered under its own descriptor
    pub fn builtin_registry(&self) -> ToolRegistry {
        let mut registry = self.empty_registry();
        for handler in self.handlers() {
            registry.register(handler);
        }
        registry
    }

    /// Agent-side configuration entry for a server running this set locally
    pub fn default_server_info(&self) -> ToolServerInfo {
        let tools: Vec<&str> = self.handlers().iter().map(|h| h.name()).collect();
        ToolServerInfo::new(
            self.server_key(),
            self.display_name(),
            self.description(),
            format!("http://localhost:{}", self.default_port()),
            &tools,
        )
    }
}

impl fmt::Display for ToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Calculator => write!(f, "calculator"),
            Self::Weather => write!(f, "weather"),
        }
    }
}

impl FromStr for ToolSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "calculator" | "calculator_mcp" => Ok(Self::Calculator),
            "weather" | "weather_mcp" => Ok(Self::Weather),
            other => Err(format!("unknown tool set '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("calculator".parse::<ToolSet>(), Ok(ToolSet::Calculator));
        assert_eq!("Weather_MCP".parse::<ToolSet>(), Ok(ToolSet::Weather));
        assert!("finance".parse::<ToolSet>().is_err());
    }

    #[test]
    fn test_builtin_registries() {
        assert_eq!(
            ToolSet::Calculator.builtin_registry().tool_names(),
            vec!["addNumber", "subtractNumber"]
        );
        assert_eq!(
            ToolSet::Weather.builtin_registry().tool_names(),
            vec!["getTime", "getWeather"]
        );
    }

    #[test]
    fn test_default_server_info() {
        let info = ToolSet::Weather.default_server_info();
        assert_eq!(info.key, "weather_mcp");
        assert_eq!(info.url, "http://localhost:3001");
        assert_eq!(info.tools, vec!["getWeather", "getTime"]);
    }

    #[test]
    fn test_handler_lookup() {
        assert!(ToolSet::Calculator.handler("addNumber").is_some());
        assert!(ToolSet::Calculator.handler("getWeather").is_none());
    }
}
