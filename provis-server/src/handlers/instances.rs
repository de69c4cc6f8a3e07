use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::info;

use provis_core::InstanceRecord;

use crate::errors::AppResult;
use crate::state::AppState;

/// `GET /api/instances` — all persisted instance records.
pub async fn list_instances(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<InstanceRecord>>> {
    Ok(Json(state.store().load().await))
}

/// `POST /api/clear-cache` — delete the persisted instance list entirely.
pub async fn clear_cache(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if state.store().clear().await {
        info!("instance cache cleared");
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Instance cache cleared",
            })),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "message": "No instance cache to clear",
            })),
        )
    }
}
