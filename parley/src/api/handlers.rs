//! Route handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use pchat::{ChatTurnRequest, QUESTION_REQUIRED, TraceId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::error::ApiError;
use super::state::AppState;

/// Inbound correlation header; a fresh id is generated when absent.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub credentials: usize,
    pub turns: usize,
    pub uptime_secs: u64,
}

fn trace_id(headers: &HeaderMap) -> TraceId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map(TraceId::from)
        .unwrap_or_else(|| TraceId::new(Uuid::new_v4().to_string()))
}

/// POST /api/chat
///
/// A body that is not JSON, lacks `question`, or carries a non-string
/// `question` is rejected the same way as a blank question.
pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let trace_id = trace_id(&headers);

    let Json(body) = payload.map_err(|rejection| {
        tracing::info!(trace_id = %trace_id, rejection = %rejection, "unreadable chat payload");
        ApiError::BadRequest(QUESTION_REQUIRED.to_string())
    })?;

    let question = body
        .get("question")
        .and_then(Value::as_str)
        .map(str::to_string);

    let result = state
        .orchestrator
        .handle(ChatTurnRequest::from_optional(question).with_trace_id(trace_id))
        .await?;

    Ok(Json(ChatResponse {
        response: result.response,
    }))
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let turns = state.orchestrator.transcript().await?.len();

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        credentials: state.orchestrator.pool().len(),
        turns,
        uptime_secs: state.started_at.elapsed().as_secs(),
    }))
}
