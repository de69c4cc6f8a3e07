use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// `GET /logs/{filename}` — raw transcript of one job run.
pub async fn get_log(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<impl IntoResponse> {
    // The logs directory is flat; anything that tries to leave it is rejected
    // outright.
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(AppError::not_found("Log not found"));
    }

    let path = state.config.logs_dir().join(&filename);
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|_| AppError::not_found("Log not found"))?;

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], content))
}
