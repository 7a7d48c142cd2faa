//! Catalog aggregation across every configured tool server

use futures::future::join_all;

use super::ServerHandle;
use crate::domain::Catalog;

/// Builds a fresh Catalog from all servers on every call
#[derive(Clone)]
pub struct CatalogAggregator {
    servers: Vec<ServerHandle>,
}

impl CatalogAggregator {
    pub fn new(servers: Vec<ServerHandle>) -> Self {
        Self { servers }
    }

    /// Query every server concurrently; unreachable ones contribute empty tool maps
    pub async fn refresh(&self) -> Catalog {
        let listings = join_all(self.servers.iter().map(|handle| async move {
            let tools = handle.client.list_tools().await;
            (handle.info.clone(), tools)
        }))
        .await;

        let mut catalog = Catalog::new();
        for (info, tools) in listings {
            if tools.is_empty() {
                log::debug!("Server {} advertised no tools", info.key);
            }
            catalog.insert(info, tools);
        }
        log::debug!(
            "Catalog refreshed: {} server(s), {} tool(s)",
            catalog.len(),
            catalog.tool_count()
        );
        catalog
    }
}
