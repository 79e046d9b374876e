use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    match state.social.ping().await {
        Ok(()) => Ok(Json(json!({ "status": "healthy" }))),
        Err(e) => {
            tracing::warn!(error = %e, "Health check: store unreachable");
            Err(AppError::Unavailable("store disconnected".into()))
        }
    }
}
