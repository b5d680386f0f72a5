//! `POST /api/chat` - turn a travel request into an HTML plan.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use super::routes::AppState;
use super::types::{ChatRequest, ChatResponse};
use crate::error::PlannerError;

/// The body is parsed leniently: anything that does not yield a message is
/// answered with the same 400 as an empty message.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ChatResponse>, PlannerError> {
    let request: ChatRequest = serde_json::from_slice(&body).unwrap_or_else(|e| {
        tracing::debug!("Unparsable chat body: {}", e);
        ChatRequest::default()
    });
    let message = request.message.unwrap_or_default();

    let response = state
        .planner
        .plan(&message, request.session_id.as_deref())
        .await?;

    Ok(Json(ChatResponse { response }))
}
