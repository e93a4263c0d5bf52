use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::v1;

/// Create the full router with application state.
/// Registry routes live under `api_prefix`; health probes stay at the root.
pub fn create_router_with_state(state: AppState, api_prefix: &str) -> Router {
    let prefix = api_prefix.trim_end_matches('/');

    let router = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check));

    let router = if prefix.is_empty() {
        router.merge(v1::create_v1_router())
    } else {
        router.nest(prefix, v1::create_v1_router())
    };

    router
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
