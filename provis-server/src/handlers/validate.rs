use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::errors::AppResult;
use crate::state::AppState;

/// `GET /api/validate/{prefix}` — advisory availability check for a prefix.
///
/// A prefix is rejected when it was already provisioned (reason `cache`) or
/// when the candidate hostname already answers a probe (reason `ping`).
/// Neither check is enforced at submission time.
pub async fn validate_prefix(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
) -> AppResult<Json<Value>> {
    let hostname = state.config.hostname_for(&prefix);

    if state.store().prefix_used(&prefix).await {
        return Ok(Json(json!({
            "valid": false,
            "reason": "cache",
            "message": format!("Prefix '{prefix}' has already been used"),
            "hostname": hostname,
        })));
    }

    if state.prober.probe(&hostname).await {
        return Ok(Json(json!({
            "valid": false,
            "reason": "ping",
            "message": format!("{hostname} is already reachable"),
            "hostname": hostname,
        })));
    }

    Ok(Json(json!({
        "valid": true,
        "message": format!("{hostname} is available"),
        "hostname": hostname,
    })))
}

/// `GET /api/ping/{prefix}` — raw reachability probe of the candidate
/// hostname.
pub async fn ping_prefix(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
) -> AppResult<Json<Value>> {
    let hostname = state.config.hostname_for(&prefix);
    let reachable = state.prober.probe(&hostname).await;

    Ok(Json(json!({
        "hostname": hostname,
        "reachable": reachable,
        "status": if reachable { "online" } else { "offline" },
    })))
}
