//! Tool System - tool definitions, registries, and the built-in tool sets
//!
//! Every tool is compiled in. A registry is an immutable table of
//! name → descriptor → handler; tool servers expose one registry each.

mod calculator;
mod definition;
mod manifest;
mod registry;
mod toolset;
mod weather;

pub use calculator::{AddNumberTool, SubtractNumberTool};
pub use definition::{ParamType, ParameterSchema, PropertySpec, ToolDescriptor};
pub use manifest::{BuiltinSource, ManifestSource, RegistrySource};
pub use registry::{RegistryInfo, ToolRegistry};
pub use toolset::ToolSet;
pub use weather::{GetTimeTool, GetWeatherTool};

use async_trait::async_trait;

use crate::domain::{ExecutionResult, Parameters};

/// A tool a registry can invoke
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (what the LLM selects)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Declared parameters
    fn parameters(&self) -> ParameterSchema;

    /// Execute the tool with parameters already validated against `parameters()`
    async fn execute(&self, params: &Parameters) -> Result<ExecutionResult, eyre::Error>;

    /// Descriptor advertised for this tool
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(self.name(), self.description(), self.parameters())
    }
}
