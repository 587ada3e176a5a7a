use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::chat::{TranscriptEntry, Verbosity};
use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
    #[serde(default)]
    pub verbosity: Option<String>,
}

pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<MessageRequest>,
) -> Result<Json<TranscriptEntry>, ApiError> {
    let verbosity = payload
        .verbosity
        .map(|v| Verbosity::from_str(&v))
        .unwrap_or_default();

    let entry = state
        .controller
        .handle_message(&session_id, &payload.text, verbosity)
        .await?;
    Ok(Json(entry))
}
