//! Agent - catalog refresh, LLM selection and dispatch for one request
//!
//! Control flow for every request:
//! 1. `CatalogAggregator` asks every tool server for its tools
//! 2. `SelectionEngine` asks the LLM to pick a server, tool and parameters
//! 3. `Dispatcher` validates the pick against the catalog and calls the tool
//!
//! Nothing is remembered between requests.

mod aggregator;
mod dispatcher;
mod parser;
pub mod repl;
mod selection;

pub use aggregator::CatalogAggregator;
pub use dispatcher::Dispatcher;
pub use parser::{ParseMode, decision_from_value, extract_json, parse_decision};
pub use selection::SelectionEngine;

use std::sync::Arc;
use std::time::Duration;

use crate::client::{HealthStatus, ToolServerApi, ToolServerClient};
use crate::config::Config;
use crate::domain::{Catalog, Decision, ExecutionResult, ToolServerInfo};
use crate::error::Result;
use crate::llm::{GeminiClient, LlmClient};

/// A configured tool server and the client used to reach it
#[derive(Clone)]
pub struct ServerHandle {
    pub info: ToolServerInfo,
    pub client: Arc<dyn ToolServerApi>,
}

impl ServerHandle {
    pub fn new(info: ToolServerInfo, client: Arc<dyn ToolServerApi>) -> Self {
        Self { info, client }
    }

    /// HTTP client for `info.url` with the given per-call timeout
    pub fn connect(info: ToolServerInfo, timeout: Duration) -> Result<Self> {
        let client = ToolServerClient::with_timeout(info.url.clone(), timeout)?;
        Ok(Self::new(info, Arc::new(client)))
    }
}

/// Everything a front end may want to show about one request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    pub decision: Decision,
    pub result: ExecutionResult,
}

pub struct Agent {
    servers: Vec<ServerHandle>,
    aggregator: CatalogAggregator,
    engine: SelectionEngine,
    dispatcher: Dispatcher,
}

impl Agent {
    pub fn new(servers: Vec<ServerHandle>, llm: Arc<dyn LlmClient>, mode: ParseMode) -> Result<Self> {
        Ok(Self {
            aggregator: CatalogAggregator::new(servers.clone()),
            dispatcher: Dispatcher::new(servers.clone()),
            engine: SelectionEngine::new(llm, mode)?,
            servers,
        })
    }

    /// Build from configuration using the Gemini client; fails without a credential
    pub fn from_config(config: &Config) -> Result<Self> {
        let llm = GeminiClient::new(config.llm.gemini())?;
        Self::with_llm(config, Arc::new(llm))
    }

    /// Build from configuration with a caller-supplied LLM client
    pub fn with_llm(config: &Config, llm: Arc<dyn LlmClient>) -> Result<Self> {
        let servers = config
            .servers
            .iter()
            .cloned()
            .map(|info| ServerHandle::connect(info, config.client.timeout()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(servers, llm, config.llm.parse_mode())
    }

    pub fn servers(&self) -> impl Iterator<Item = &ToolServerInfo> {
        self.servers.iter().map(|h| &h.info)
    }

    pub fn server(&self, key: &str) -> Option<&ToolServerInfo> {
        self.servers().find(|s| s.key == key)
    }

    /// Refresh the catalog and ask the LLM for a decision
    pub async fn select(&self, request: &str) -> (Catalog, Decision) {
        let catalog = self.aggregator.refresh().await;
        let decision = self.engine.select(&catalog, request).await;
        (catalog, decision)
    }

    /// Run a decision against the catalog it was made from
    pub async fn dispatch(&self, decision: &Decision, catalog: &Catalog) -> ExecutionResult {
        self.dispatcher.dispatch(decision, catalog).await
    }

    /// Full request: refresh, select, dispatch
    pub async fn execute_request(&self, request: &str) -> RequestOutcome {
        log::info!("Analyzing request: {}", request);
        let (catalog, decision) = self.select(request).await;
        let result = self.dispatch(&decision, &catalog).await;
        RequestOutcome { decision, result }
    }

    /// Probe every server's root endpoint
    pub async fn health_check(&self, timeout: Duration) -> Vec<(ToolServerInfo, HealthStatus)> {
        let probes = self.servers.iter().map(|handle| async move {
            let status = handle.client.health(timeout).await;
            (handle.info.clone(), status)
        });
        futures::future::join_all(probes).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-process stand-ins for tool servers

    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::ServerHandle;
    use crate::client::{HealthStatus, ToolServerApi};
    use crate::domain::{ExecutionResult, Parameters};
    use crate::tools::{ToolDescriptor, ToolRegistry, ToolSet};

    #[derive(Clone, Copy, PartialEq)]
    enum Behavior {
        Healthy,
        Unreachable,
        Panicking,
    }

    struct FakeClient {
        registry: ToolRegistry,
        behavior: Behavior,
        calls: Mutex<Vec<(String, Parameters)>>,
    }

    #[async_trait]
    impl ToolServerApi for FakeClient {
        async fn list_tools(&self) -> BTreeMap<String, ToolDescriptor> {
            match self.behavior {
                Behavior::Unreachable => BTreeMap::new(),
                _ => self.registry.list(),
            }
        }

        async fn execute_tool(&self, tool_name: &str, parameters: &Parameters) -> ExecutionResult {
            self.calls
                .lock()
                .unwrap()
                .push((tool_name.to_string(), parameters.clone()));
            match self.behavior {
                Behavior::Healthy => match self.registry.invoke(tool_name, parameters).await {
                    Ok(result) => result,
                    Err(e) => ExecutionResult::failure(e.to_string()),
                },
                Behavior::Unreachable => ExecutionResult::failure("connection refused"),
                Behavior::Panicking => panic!("connection pool poisoned"),
            }
        }

        async fn health(&self, _timeout: Duration) -> HealthStatus {
            match self.behavior {
                Behavior::Unreachable => HealthStatus::Unreachable("connection refused".to_string()),
                _ => HealthStatus::Connected,
            }
        }
    }

    pub struct FakeServer {
        toolset: ToolSet,
        client: Arc<FakeClient>,
    }

    impl FakeServer {
        fn build(toolset: ToolSet, behavior: Behavior) -> Self {
            Self {
                toolset,
                client: Arc::new(FakeClient {
                    registry: toolset.builtin_registry(),
                    behavior,
                    calls: Mutex::new(Vec::new()),
                }),
            }
        }

        pub fn new(toolset: ToolSet) -> Self {
            Self::build(toolset, Behavior::Healthy)
        }

        pub fn unreachable(toolset: ToolSet) -> Self {
            Self::build(toolset, Behavior::Unreachable)
        }

        pub fn panicking(toolset: ToolSet) -> Self {
            Self::build(toolset, Behavior::Panicking)
        }

        pub fn handle(&self) -> ServerHandle {
            ServerHandle::new(self.toolset.default_server_info(), self.client.clone())
        }

        pub fn calls(&self) -> Vec<(String, Parameters)> {
            self.client.calls.lock().unwrap().clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeServer;
    use super::*;
    use crate::domain::NO_TOOL_MESSAGE;
    use crate::llm::MockLlmClient;
    use crate::tools::ToolSet;

    fn agent(reply: &str, servers: &[&FakeServer]) -> Agent {
        let handles = servers.iter().map(|s| s.handle()).collect();
        Agent::new(handles, Arc::new(MockLlmClient::with_reply(reply)), ParseMode::Lenient).unwrap()
    }

    #[tokio::test]
    async fn test_execute_request_end_to_end() {
        let calculator = FakeServer::new(ToolSet::Calculator);
        let weather = FakeServer::new(ToolSet::Weather);
        let agent = agent(
            r#"{"mcp_server": "calculator_mcp", "tool_name": "subtractNumber", "parameters": {"a": 10, "b": 5}, "reasoning": "subtraction"}"#,
            &[&calculator, &weather],
        );

        let outcome = agent.execute_request("what is 10 minus 5").await;

        assert_eq!(outcome.decision.rationale, "subtraction");
        assert!(outcome.result.success);
        assert_eq!(outcome.result.message, "Subtracted 5 from 10 to get 5");
        assert!(weather.calls().is_empty());
    }

    #[tokio::test]
    async fn test_execute_request_no_tool() {
        let calculator = FakeServer::new(ToolSet::Calculator);
        let agent = agent(
            r#"{"mcp_server": null, "tool_name": null, "parameters": {}, "reasoning": "poetry is not math"}"#,
            &[&calculator],
        );

        let outcome = agent.execute_request("write me a poem").await;
        assert_eq!(outcome.result.message, NO_TOOL_MESSAGE);
        assert_eq!(outcome.decision.rationale, "poetry is not math");
        assert!(calculator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_with_llm_uses_configured_servers() {
        let config = Config::default();
        let agent = Agent::with_llm(&config, Arc::new(MockLlmClient::new())).unwrap();
        let keys: Vec<&str> = agent.servers().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["weather_mcp", "calculator_mcp"]);
        assert!(agent.server("calculator_mcp").is_some());
    }

    #[tokio::test]
    async fn test_health_check_reports_each_server() {
        let weather = FakeServer::new(ToolSet::Weather);
        let calculator = FakeServer::unreachable(ToolSet::Calculator);
        let agent = agent("{}", &[&weather, &calculator]);

        let report = agent.health_check(Duration::from_millis(100)).await;
        assert_eq!(report.len(), 2);
        assert!(report[0].1.is_connected());
        assert!(matches!(report[1].1, HealthStatus::Unreachable(_)));
    }
}
