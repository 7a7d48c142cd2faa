//! Error types for Toolpick
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Toolpick
#[derive(Debug, Error)]
pub enum AgentError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required credential is absent from the environment
    #[error("Missing credential: environment variable {env_var} not set")]
    MissingCredential { env_var: String },

    /// LLM API error
    #[error("LLM error: {0}")]
    Llm(String),

    /// LLM reply could not be turned into a decision
    #[error("Selection parse error: {0}")]
    SelectionParse(String),

    /// Prompt template rendering failed
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Tool server failed to bind or serve
    #[error("Server error: {0}")]
    Server(String),

    /// Tool-level failure surfaced outside a tool server
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Failures of a single tool invocation against a registry
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ToolError {
    /// No tool registered under this name
    #[error("Tool '{name}' not found. Available tools: {available:?}")]
    NotFound { name: String, available: Vec<String> },

    /// Parameters do not satisfy the tool's declared schema
    #[error("Invalid parameters for tool '{name}': {reason}")]
    Validation { name: String, reason: String },

    /// The tool body itself failed
    #[error("Error executing tool '{name}': {reason}")]
    Execution { name: String, reason: String },
}

/// Result type alias for Toolpick operations
pub type Result<T> = std::result::Result<T, AgentError>;
