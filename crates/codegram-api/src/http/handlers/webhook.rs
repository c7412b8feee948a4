//! Telegram webhook receiver.
//!
//! Telegram redelivers any update that does not get a 2xx, so processing
//! failures are reported in the body while the status stays 200. Only a
//! body that is not an update at all is rejected.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use codegram_types::telegram::Update;
use serde_json::{Value, json};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /webhook - Handle one Telegram update.
pub async fn receive_update(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let update: Update = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("invalid update: {e}")))?;

    tracing::debug!(update_id = update.update_id, "webhook update received");

    match state.gateway.handle_update(&update).await {
        Ok(()) => Ok(Json(json!({"status": "ok"}))),
        Err(e) => {
            tracing::error!(update_id = update.update_id, error = %e, "failed to process update");
            Ok(Json(json!({"status": "error", "message": e.to_string()})))
        }
    }
}
