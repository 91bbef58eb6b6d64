//! `POST /chat`

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use gems_core::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Message shown to callers when answering fails unexpectedly.
pub const INTERNAL_ERROR_DETAIL: &str = "Failed to get response from RAG Engine";

/// Chat request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Chat response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Answer a chat message.
///
/// Returns 400 for a missing, blank or malformed message and 500 with a
/// generic detail when the pipeline fails. Fallback answers are successes.
pub async fn chat(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ServerResult<Json<ChatResponse>> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("chat", request_id = %request_id);

    async move {
        let Json(request) = payload.map_err(|rejection| {
            tracing::warn!("Rejected chat request: {}", rejection.body_text());
            ServerError::BadRequest(rejection.body_text())
        })?;

        let message = request.message.unwrap_or_default();
        let message = message.trim();
        tracing::info!("Received chat request: message_length={}", message.len());

        if message.is_empty() {
            tracing::warn!("Empty message request");
            return Err(ServerError::BadRequest(AppError::EmptyQuery.to_string()));
        }

        let start = Instant::now();
        match state.answers.answer(message).await {
            Ok(answer) => {
                tracing::info!(
                    "Request successful: reply_length={}, source={}, duration={:.2}s",
                    answer.text.len(),
                    answer.source,
                    start.elapsed().as_secs_f64()
                );
                Ok(Json(ChatResponse { reply: answer.text }))
            }
            Err(AppError::EmptyQuery) => {
                Err(ServerError::BadRequest(AppError::EmptyQuery.to_string()))
            }
            Err(e) => {
                tracing::error!(
                    "Request failed: error={}, duration={:.2}s (project={}, location={}, corpus={})",
                    e,
                    start.elapsed().as_secs_f64(),
                    state.config.project_id,
                    state.config.location,
                    state.config.rag_corpus_id
                );
                Err(ServerError::Internal(INTERNAL_ERROR_DETAIL.to_string()))
            }
        }
    }
    .instrument(span)
    .await
}
