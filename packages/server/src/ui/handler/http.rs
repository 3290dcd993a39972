//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    infrastructure::dto::http::{ConnectionDetailDto, HealthDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthDto>, StatusCode> {
    let connections = state.registry.connections().await.map_err(|e| {
        tracing::warn!("Health check failed: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    Ok(Json(HealthDto {
        status: "ok".to_string(),
        connections: connections.len(),
    }))
}

/// Debug endpoint listing live connections (for testing purposes)
pub async fn debug_connections(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ConnectionDetailDto>>, StatusCode> {
    let connections = state
        .registry
        .connections()
        .await
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;

    Ok(Json(connections.into_iter().map(Into::into).collect()))
}
