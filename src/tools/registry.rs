//! Tool registry - maps tool names to descriptors and handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Tool, ToolDescriptor};
use crate::domain::{ExecutionResult, Parameters};
use crate::error::ToolError;

/// Identity of the server a registry is exposed through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryInfo {
    pub name: String,
    pub description: String,
    pub version: String,
}

struct RegisteredTool {
    descriptor: ToolDescriptor,
    handler: Arc<dyn Tool>,
}

/// Immutable-once-built table of tools for one capability domain
pub struct ToolRegistry {
    info: RegistryInfo,
    tools: BTreeMap<String, RegisteredTool>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new(name: impl Into<String>, description: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            info: RegistryInfo {
                name: name.into(),
                description: description.into(),
                version: version.into(),
            },
            tools: BTreeMap::new(),
        }
    }

    /// Register a handler under its own descriptor
    pub fn register(&mut self, handler: Arc<dyn Tool>) {
        let descriptor = handler.descriptor();
        self.register_with_descriptor(descriptor, handler);
    }

    /// Register a handler under an explicit descriptor (e.g. overridden description)
    pub fn register_with_descriptor(&mut self, descriptor: ToolDescriptor, handler: Arc<dyn Tool>) {
        self.tools
            .insert(descriptor.name.clone(), RegisteredTool { descriptor, handler });
    }

    pub fn info(&self) -> &RegistryInfo {
        &self.info
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.info.description = description.into();
    }

    /// All descriptors keyed by tool name
    pub fn list(&self) -> BTreeMap<String, ToolDescriptor> {
        self.tools
            .iter()
            .map(|(name, t)| (name.clone(), t.descriptor.clone()))
            .collect()
    }

    /// Sorted tool names
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate parameters and run a tool
    pub async fn invoke(&self, name: &str, params: &Parameters) -> Result<ExecutionResult, ToolError> {
        let tool = self.tools.get(name).ok_or_else(|| ToolError::NotFound {
            name: name.to_string(),
            available: self.tool_names(),
        })?;

        let checked = tool
            .descriptor
            .parameters
            .validate(params)
            .map_err(|reason| ToolError::Validation {
                name: name.to_string(),
                reason,
            })?;

        log::debug!("Invoking tool {} with {} parameter(s)", name, checked.len());

        tool.handler
            .execute(&checked)
            .await
            .map_err(|e| ToolError::Execution {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("name", &self.info.name)
            .field("tools", &self.tool_names())
            .finish()
    }
}
