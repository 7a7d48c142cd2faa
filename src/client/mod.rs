//! Tool-server client - the agent's side of the tool-server HTTP API
//!
//! No call ever returns an error. A dead or misbehaving server shows up
//! as an empty tool map from `list_tools` and as a failed `ExecutionResult`
//! from `execute_tool`, so one bad server cannot take down a request.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::{ExecutionResult, Parameters, parameters_to_json};
use crate::error::{AgentError, Result};
use crate::protocol::{ErrorBody, ExecuteRequest, ToolsResponse};
use crate::tools::ToolDescriptor;

/// Default bound on every tool-server call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// What the dispatcher and aggregator need from a tool server
#[async_trait]
pub trait ToolServerApi: Send + Sync {
    /// Advertised tools; empty on any failure
    async fn list_tools(&self) -> BTreeMap<String, ToolDescriptor>;

    /// Invoke a tool; failures come back as `success: false`
    async fn execute_tool(&self, tool_name: &str, parameters: &Parameters) -> ExecutionResult;

    /// Probe the server root within `timeout`
    async fn health(&self, timeout: Duration) -> HealthStatus;
}

/// Outcome of probing a server's `GET /`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Connected,
    UnexpectedStatus(u16),
    Unreachable(String),
}

impl HealthStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// HTTP client for one tool server
#[derive(Debug, Clone)]
pub struct ToolServerClient {
    base_url: String,
    http: Client,
}

impl ToolServerClient {
    /// Create a client with the default timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AgentError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch_tools(&self) -> std::result::Result<BTreeMap<String, ToolDescriptor>, reqwest::Error> {
        let response = self
            .http
            .get(self.endpoint("/tools"))
            .send()
            .await?
            .error_for_status()?;
        let body: ToolsResponse = response.json().await?;

        // Names travel as map keys only
        Ok(body
            .tools
            .into_iter()
            .map(|(name, mut descriptor)| {
                descriptor.name = name.clone();
                (name, descriptor)
            })
            .collect())
    }

    async fn post_execute(&self, request: &ExecuteRequest) -> std::result::Result<ExecutionResult, String> {
        let response = self
            .http
            .post(self.endpoint("/execute"))
            .json(request)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.detail)
                .unwrap_or_else(|_| format!("Tool server returned {}: {}", status, text.trim()));
            return Err(detail);
        }

        response.json().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl ToolServerApi for ToolServerClient {
    async fn list_tools(&self) -> BTreeMap<String, ToolDescriptor> {
        match self.fetch_tools().await {
            Ok(tools) => tools,
            Err(e) => {
                log::warn!("Failed to list tools from {}: {}", self.base_url, e);
                BTreeMap::new()
            }
        }
    }

    async fn execute_tool(&self, tool_name: &str, parameters: &Parameters) -> ExecutionResult {
        let request = ExecuteRequest {
            tool_name: tool_name.to_string(),
            parameters: Some(parameters_to_json(parameters)),
        };

        match self.post_execute(&request).await {
            Ok(result) => result,
            Err(detail) => {
                log::warn!("Tool {} on {} failed: {}", tool_name, self.base_url, detail);
                ExecutionResult::failure(detail)
            }
        }
    }

    async fn health(&self, timeout: Duration) -> HealthStatus {
        match self.http.get(self.endpoint("/")).timeout(timeout).send().await {
            Ok(response) if response.status().is_success() => HealthStatus::Connected,
            Ok(response) => HealthStatus::UnexpectedStatus(response.status().as_u16()),
            Err(e) => HealthStatus::Unreachable(e.to_string()),
        }
    }
}
