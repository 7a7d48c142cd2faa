//! Tool server - exposes one registry over HTTP
//!
//! The live registry is an immutable snapshot. Handlers clone the `Arc` and
//! work on that; `POST /reload_tools` builds a fresh registry from the
//! server's source and swaps the `Arc`, so in-flight calls finish against
//! the snapshot they started with.

mod error;
mod routes;

pub use error::ApiError;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::sync::{Mutex, RwLock, oneshot};
use tower_http::cors::{Any, CorsLayer};

use crate::error::{AgentError, Result};
use crate::tools::{RegistrySource, ToolRegistry};

/// Shared state behind every route
pub struct ServerState {
    source: Arc<dyn RegistrySource>,
    registry: RwLock<Arc<ToolRegistry>>,
    // Held across load and swap so reloads land in the order they ran
    reload_lock: Mutex<()>,
}

impl ServerState {
    /// Load the initial snapshot from `source`
    pub fn new(source: Arc<dyn RegistrySource>) -> Result<Self> {
        let registry = source.load()?;
        Ok(Self {
            source,
            registry: RwLock::new(Arc::new(registry)),
            reload_lock: Mutex::new(()),
        })
    }

    /// Current registry snapshot
    pub async fn snapshot(&self) -> Arc<ToolRegistry> {
        self.registry.read().await.clone()
    }

    /// Rebuild from the source and swap; the old snapshot stays live on failure
    pub async fn reload(&self) -> Result<Vec<String>> {
        let _reloading = self.reload_lock.lock().await;
        let fresh = Arc::new(self.source.load()?);
        let names = fresh.tool_names();
        *self.registry.write().await = fresh;
        log::info!("Reloaded {} tool(s) from {}", names.len(), self.source.describe());
        Ok(names)
    }
}

/// Build the router for a tool server
pub fn router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::server_info))
        .route("/tools", get(routes::list_tools))
        .route("/execute", post(routes::execute))
        .route("/reload_tools", post(routes::reload_tools))
        .with_state(state)
        .layer(cors)
}

/// A tool server running on a background task
pub struct ToolServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl ToolServer {
    /// Bind `addr` (port 0 picks a free port) and serve until shut down or dropped
    pub async fn spawn(addr: SocketAddr, source: Arc<dyn RegistrySource>) -> Result<Self> {
        let state = Arc::new(ServerState::new(source)?);
        let app = router(state);

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AgentError::Server(format!("Failed to bind {}: {}", addr, e)))?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = served {
                log::error!("Tool server on {} stopped: {}", addr, e);
            }
        });

        log::info!("Tool server listening on {}", addr);
        Ok(Self {
            addr,
            shutdown: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL clients should use
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn shutdown(&mut self) {
        if let Some(sender) = self.shutdown.take() {
            let _ = sender.send(());
        }
    }
}

impl Drop for ToolServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Serve in the foreground until `signal` resolves
pub async fn serve<F>(addr: SocketAddr, source: Arc<dyn RegistrySource>, signal: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let state = Arc::new(ServerState::new(source)?);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AgentError::Server(format!("Failed to bind {}: {}", addr, e)))?;
    log::info!("Tool server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(signal)
        .await
        .map_err(|e| AgentError::Server(e.to_string()))
}
