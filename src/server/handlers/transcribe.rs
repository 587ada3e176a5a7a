use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::core::errors::ApiError;
use crate::state::AppState;

/// Accepts a single WAV utterance as the raw request body and returns the
/// recognized text. The client submits that text through the normal message
/// endpoint, so voice input never bypasses the conversation flow.
pub async fn transcribe(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let transcriber = state.transcriber.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable("voice input is not configured".to_string())
    })?;

    let text = transcriber.recognize_once(body.to_vec()).await?;
    Ok(Json(json!({ "text": text })))
}
