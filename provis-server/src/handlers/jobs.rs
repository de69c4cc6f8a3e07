use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use provis_core::JobRecord;

use crate::errors::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    /// Submitted hostname prefix. Empty text is accepted silently and runs
    /// the script with an empty substitution, matching the original surface.
    #[serde(default)]
    pub text: String,
}

/// `POST /api/start` — queue a provisioning job and return immediately.
pub async fn start_job(
    State(state): State<AppState>,
    Json(request): Json<StartRequest>,
) -> AppResult<Json<Value>> {
    let job_id = state.orchestrator.start(request.text.clone()).await;
    info!(%job_id, prefix = %request.text, "provisioning job accepted");

    Ok(Json(json!({
        "job_id": job_id,
        "status": "queued",
        "message": format!("Provisioning started for '{}'", request.text),
    })))
}

/// `GET /api/status/{job_id}` — poll one job record.
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<Json<JobRecord>> {
    // Unparseable ids get the same 404 shape as unknown ones.
    let job_id =
        Uuid::parse_str(&job_id).map_err(|_| AppError::not_found("Job not found"))?;

    state
        .registry()
        .get(job_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("Job not found"))
}

/// `GET /api/jobs` — every job record the process has seen. Debug surface,
/// unauthenticated.
pub async fn list_jobs(State(state): State<AppState>) -> AppResult<Json<Vec<JobRecord>>> {
    Ok(Json(state.registry().list_all().await))
}
