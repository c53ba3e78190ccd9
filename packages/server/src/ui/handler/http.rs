//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::websocket::WireMessage, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current valid history, oldest first
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<WireMessage>> {
    let messages = state.get_history_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(messages.into_iter().map(WireMessage::from).collect())
}
