//! Tool server configuration and the per-request tool catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tools::ToolDescriptor;

/// Static description of one tool server the agent may call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolServerInfo {
    /// Unique key the LLM uses to name this server (e.g. "calculator_mcp")
    pub key: String,
    /// Human-readable name
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Base URL of the server's HTTP API
    pub url: String,
    /// Tool names the server is expected to expose
    #[serde(default)]
    pub tools: Vec<String>,
}

impl ToolServerInfo {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        tools: &[&str],
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: description.into(),
            url: url.into(),
            tools: tools.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// One server's slice of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub server_info: ToolServerInfo,
    pub tools: BTreeMap<String, ToolDescriptor>,
}

/// Snapshot of every configured server's advertised tools, keyed by server key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, server_info: ToolServerInfo, tools: BTreeMap<String, ToolDescriptor>) {
        self.entries
            .insert(server_info.key.clone(), CatalogEntry { server_info, tools });
    }

    pub fn get(&self, server_key: &str) -> Option<&CatalogEntry> {
        self.entries.get(server_key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of advertised tools across all servers
    pub fn tool_count(&self) -> usize {
        self.entries.values().map(|e| e.tools.len()).sum()
    }

    /// Pretty JSON used as the catalog section of the selection prompt
    pub fn to_prompt_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
