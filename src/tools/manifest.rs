//! Registry sources - where a tool server (re)builds its registry from
//!
//! A manifest is a TOML file that selects which of a tool set's compiled-in
//! handlers are exposed and may override their descriptions:
//!
//! ```toml
//! description = "Arithmetic for the demo agent"
//!
//! [[tool]]
//! name = "addNumber"
//! description = "Add two numbers"
//!
//! [[tool]]
//! name = "subtractNumber"
//! enabled = false
//! ```
//!
//! Handlers only ever come from the tool set; a manifest naming a tool the
//! set does not compile in is rejected.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{ToolRegistry, ToolSet};
use crate::error::{AgentError, Result};

/// Anything a tool server can rebuild its registry from
pub trait RegistrySource: Send + Sync {
    /// Build a fresh registry snapshot
    fn load(&self) -> Result<ToolRegistry>;

    /// Human-readable origin, for logs
    fn describe(&self) -> String;
}

/// The full compiled-in table of a tool set
#[derive(Debug, Clone, Copy)]
pub struct BuiltinSource {
    toolset: ToolSet,
}

impl BuiltinSource {
    pub fn new(toolset: ToolSet) -> Self {
        Self { toolset }
    }
}

impl RegistrySource for BuiltinSource {
    fn load(&self) -> Result<ToolRegistry> {
        Ok(self.toolset.builtin_registry())
    }

    fn describe(&self) -> String {
        format!("built-in {} tools", self.toolset)
    }
}

#[derive(Debug, Deserialize)]
struct TomlTool {
    name: String,
    description: Option<String>,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct TomlManifest {
    description: Option<String>,
    #[serde(rename = "tool", default)]
    tools: Vec<TomlTool>,
}

/// A TOML manifest over a tool set, re-read on every load
#[derive(Debug, Clone)]
pub struct ManifestSource {
    toolset: ToolSet,
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(toolset: ToolSet, path: impl Into<PathBuf>) -> Self {
        Self {
            toolset,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a registry from manifest text
    pub fn from_toml(toolset: ToolSet, content: &str) -> Result<ToolRegistry> {
        let manifest: TomlManifest = toml::from_str(content)
            .map_err(|e| AgentError::Config(format!("Failed to parse tool manifest: {}", e)))?;

        let mut registry = toolset.empty_registry();
        if let Some(description) = manifest.description {
            registry.set_description(description);
        }

        let mut seen = HashSet::new();
        for entry in manifest.tools {
            if !seen.insert(entry.name.clone()) {
                return Err(AgentError::Config(format!(
                    "Tool '{}' listed twice in manifest",
                    entry.name
                )));
            }

            let handler = toolset.handler(&entry.name).ok_or_else(|| {
                AgentError::Config(format!(
                    "Tool '{}' is not provided by the {} tool set",
                    entry.name, toolset
                ))
            })?;

            if !entry.enabled {
                log::debug!("Manifest disables tool {}", entry.name);
                continue;
            }

            let mut descriptor = handler.descriptor();
            if let Some(description) = entry.description {
                descriptor = descriptor.with_description(description);
            }
            registry.register_with_descriptor(descriptor, handler);
        }

        Ok(registry)
    }
}

impl RegistrySource for ManifestSource {
    fn load(&self) -> Result<ToolRegistry> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            AgentError::Config(format!(
                "Failed to read tool manifest {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Self::from_toml(self.toolset, &content)
    }

    fn describe(&self) -> String {
        format!("manifest {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_source() {
        let registry = BuiltinSource::new(ToolSet::Calculator).load().unwrap();
        assert_eq!(registry.info().name, "Calculator MCP Server");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_manifest_subset_and_override() {
        let toml = r#"
description = "Arithmetic only"

[[tool]]
name = "addNumber"
description = "Sum two values"

[[tool]]
name = "subtractNumber"
enabled = false
"#;
        let registry = ManifestSource::from_toml(ToolSet::Calculator, toml).unwrap();
        assert_eq!(registry.info().description, "Arithmetic only");
        assert_eq!(registry.tool_names(), vec!["addNumber"]);
        assert_eq!(registry.list()["addNumber"].description, "Sum two values");
    }

    #[test]
    fn test_manifest_unknown_tool_rejected() {
        let toml = r#"
[[tool]]
name = "rm_rf"
"#;
        let err = ManifestSource::from_toml(ToolSet::Weather, toml).unwrap_err();
        assert!(err.to_string().contains("rm_rf"));
    }

    #[test]
    fn test_manifest_duplicate_rejected() {
        let toml = r#"
[[tool]]
name = "getTime"

[[tool]]
name = "getTime"
"#;
        assert!(ManifestSource::from_toml(ToolSet::Weather, toml).is_err());
    }

    #[test]
    fn test_manifest_empty_keeps_identity() {
        let registry = ManifestSource::from_toml(ToolSet::Weather, "").unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.info().name, "Weather MCP Server");
    }

    #[test]
    fn test_manifest_file_is_reread() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[[tool]]\nname = \"getWeather\"").unwrap();
        let source = ManifestSource::new(ToolSet::Weather, file.path());
        assert_eq!(source.load().unwrap().tool_names(), vec!["getWeather"]);

        writeln!(file, "\n[[tool]]\nname = \"getTime\"").unwrap();
        assert_eq!(source.load().unwrap().tool_names(), vec!["getTime", "getWeather"]);
    }

    #[test]
    fn test_manifest_missing_file() {
        let source = ManifestSource::new(ToolSet::Weather, "/nonexistent/tools.toml");
        assert!(matches!(source.load(), Err(AgentError::Config(_))));
    }
}
