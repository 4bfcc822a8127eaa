//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::infrastructure::dto::http::StatusDto;
use crate::ui::state::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Service status endpoint: connected session count and store connectivity
pub async fn service_status(State(state): State<Arc<AppState>>) -> Json<StatusDto> {
    Json(StatusDto {
        connected_sessions: state.registry.count().await,
        store_connected: state.store.is_connected(),
    })
}
