//! Dispatcher - checks a Decision against what servers advertise and runs it

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use super::ServerHandle;
use crate::domain::{Catalog, Decision, ExecutionResult};

pub struct Dispatcher {
    servers: BTreeMap<String, ServerHandle>,
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Dispatcher {
    pub fn new(servers: Vec<ServerHandle>) -> Self {
        Self {
            servers: servers.into_iter().map(|h| (h.info.key.clone(), h)).collect(),
        }
    }

    /// Tool names a server is known to offer: the live catalog, else its configuration
    fn advertised<'a>(handle: &'a ServerHandle, catalog: &'a Catalog) -> Vec<&'a str> {
        match catalog.get(&handle.info.key) {
            Some(entry) if !entry.tools.is_empty() => entry.tools.keys().map(String::as_str).collect(),
            _ => handle.info.tools.iter().map(String::as_str).collect(),
        }
    }

    /// Execute a decision; never fails, every problem becomes a failed result
    pub async fn dispatch(&self, decision: &Decision, catalog: &Catalog) -> ExecutionResult {
        let Some((server_key, tool_name)) = decision.target() else {
            return ExecutionResult::no_tool();
        };

        let Some(handle) = self.servers.get(server_key) else {
            let known: Vec<&str> = self.servers.keys().map(String::as_str).collect();
            return ExecutionResult::failure(format!(
                "Unknown MCP server '{}'. Available servers: {}",
                server_key,
                known.join(", ")
            ));
        };

        let advertised = Self::advertised(handle, catalog);
        if !advertised.contains(&tool_name) {
            return ExecutionResult::failure(format!(
                "Tool '{}' is not available on {}. Available tools: {}",
                tool_name,
                handle.info.name,
                advertised.join(", ")
            ));
        }

        log::info!("Dispatching {}/{}", server_key, tool_name);
        let call = handle.client.execute_tool(tool_name, &decision.parameters);
        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => {
                let detail = panic_detail(payload.as_ref());
                log::error!("Tool call {}/{} panicked: {}", server_key, tool_name, detail);
                ExecutionResult::failure(format!("Error executing tool: {}", detail))
            }
        }
    }
}
