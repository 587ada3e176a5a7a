use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::chat::{ChatMode, Session};
use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetModeRequest {
    pub mode: String,
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<CreateSessionRequest>>,
) -> (StatusCode, Json<Session>) {
    let mode = payload
        .and_then(|Json(req)| req.mode)
        .map(|m| ChatMode::from_str(&m))
        .unwrap_or_default();

    let session = state.controller.sessions().create(mode).await;
    tracing::info!(session_id = %session.id, mode = mode.as_str(), "session created");
    (StatusCode::CREATED, Json(session))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    let session = state.controller.sessions().get(&session_id).await?;
    Ok(Json(session))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.controller.sessions().remove(&session_id).await {
        tracing::info!(session_id = %session_id, "session removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("session {}", session_id)))
    }
}

pub async fn set_mode(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<SetModeRequest>,
) -> Result<StatusCode, ApiError> {
    let mode = ChatMode::from_str(&payload.mode);
    state.controller.sessions().set_mode(&session_id, mode).await?;
    tracing::info!(session_id = %session_id, mode = mode.as_str(), "mode switched");
    Ok(StatusCode::NO_CONTENT)
}
