//! Route handlers for the tool-server API

use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use super::ServerState;
use super::error::ApiError;
use crate::domain::{ExecutionResult, parameters_from_json};
use crate::error::ToolError;
use crate::protocol::{ExecuteRequest, ReloadResponse, ServerInfoResponse, ToolsResponse};

/// GET /
pub(crate) async fn server_info(State(state): State<Arc<ServerState>>) -> Json<ServerInfoResponse> {
    let registry = state.snapshot().await;
    let info = registry.info();
    Json(ServerInfoResponse {
        name: info.name.clone(),
        description: info.description.clone(),
        version: info.version.clone(),
        tools: registry.tool_names(),
    })
}

/// GET /tools
pub(crate) async fn list_tools(State(state): State<Arc<ServerState>>) -> Json<ToolsResponse> {
    let registry = state.snapshot().await;
    Json(ToolsResponse { tools: registry.list() })
}

/// POST /execute
pub(crate) async fn execute(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ExecuteRequest>,
) -> Result<Json<ExecutionResult>, ApiError> {
    let registry = state.snapshot().await;
    let tool = request.tool_name;

    // Unknown tool wins over bad parameters
    if !registry.contains(&tool) {
        tracing::warn!(tool = %tool, "unknown tool");
        return Err(ToolError::NotFound {
            available: registry.tool_names(),
            name: tool,
        }
        .into());
    }

    let params = parameters_from_json(request.parameters.unwrap_or_default()).map_err(|reason| {
        tracing::warn!(tool = %tool, %reason, "rejected parameters");
        ApiError::unprocessable(format!("Invalid parameters for tool '{}': {}", tool, reason))
    })?;

    match registry.invoke(&tool, &params).await {
        Ok(result) => {
            tracing::info!(tool = %tool, success = result.success, "executed tool");
            Ok(Json(result))
        }
        Err(err) => {
            tracing::warn!(tool = %tool, error = %err, "tool invocation failed");
            Err(err.into())
        }
    }
}

/// POST /reload_tools
pub(crate) async fn reload_tools(State(state): State<Arc<ServerState>>) -> Json<ReloadResponse> {
    match state.reload().await {
        Ok(tools) => {
            tracing::info!(count = tools.len(), "reloaded tools");
            Json(ReloadResponse {
                success: true,
                message: "Tools reloaded.".to_string(),
                tools: Some(tools),
            })
        }
        Err(err) => {
            tracing::warn!(error = %err, "tool reload failed");
            Json(ReloadResponse {
                success: false,
                message: format!("Failed to reload: {}", err),
                tools: None,
            })
        }
    }
}
