use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::state::AppState;

/// `GET /health` — liveness plus a quick look at the data directories.
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let instances = state.store().load().await;

    let health_status = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {
            "instance_store": {
                "status": "healthy",
                "records": instances.len(),
            },
            "logs_dir": {
                "status": "healthy",
                "exists": state.config.logs_dir().exists(),
            },
        },
    });

    Ok(Json(health_status))
}
