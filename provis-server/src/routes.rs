use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers::{health, instances, jobs, logs, validate};
use crate::state::AppState;

/// Create the API routes. Static assets are layered on by
/// [`create_app`](crate::create_app).
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/api/start", post(jobs::start_job))
        .route("/api/status/{job_id}", get(jobs::get_job_status))
        .route("/api/jobs", get(jobs::list_jobs))
        .route("/api/validate/{prefix}", get(validate::validate_prefix))
        .route("/api/ping/{prefix}", get(validate::ping_prefix))
        .route("/api/instances", get(instances::list_instances))
        .route("/api/clear-cache", post(instances::clear_cache))
        .route("/logs/{filename}", get(logs::get_log))
        .route("/health", get(health::health))
}
