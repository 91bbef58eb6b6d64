//! API route handlers
//!
//! - `health`: Liveness probe
//! - `chat`: Question answering

pub mod chat;
pub mod health;

use crate::error::ServerError;
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// Service status (GET /)
///
/// # Response
///
/// ```json
/// {
///   "status": "ok",
///   "service": "GEMS Agent API",
///   "project": "my-project",
///   "location": "europe-west1",
///   "rag_corpus_id": "1234",
///   "system_instruction_configured": true
/// }
/// ```
pub async fn api_info(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let config = &state.config;

    Json(json!({
        "status": "ok",
        "service": "GEMS Agent API",
        "version": env!("CARGO_PKG_VERSION"),
        "project": config.project_id,
        "location": config.location,
        "rag_corpus_id": config.rag_corpus_id,
        "system_instruction_configured": config.system_instruction_configured(),
    }))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
