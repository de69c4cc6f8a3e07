//! HTTP surface of the provis provisioning service.
//!
//! [`create_app`] wires the API routes, middleware, and static asset fallback
//! around an [`AppState`]; `main.rs` only handles bootstrap.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::Config;
pub use state::AppState;

use axum::Router;
use axum::http::{HeaderValue, Method};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub fn create_app(state: AppState) -> Router {
    // CORS: permissive in dev, allow-list in prod
    let cors_layer = if state.config.dev_mode {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .cors_allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();
        let allow_origin = if origins.is_empty() {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(origins)
        };

        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST])
    };

    let static_files = ServeDir::new(&state.config.public_dir);

    Router::new()
        .merge(routes::create_api_router())
        .fallback_service(static_files)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
