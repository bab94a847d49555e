//! Router construction.

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

/// Build the application router around loaded state.
pub fn router(state: Arc<AppState>, prometheus: PrometheusHandle) -> Router {
    Router::new()
        // Pickers
        .route("/api/years", get(handlers::catalog::years_handler))
        .route(
            "/api/years/:year/factors",
            get(handlers::catalog::factors_handler),
        )
        .route(
            "/api/years/:year/raw-factors",
            get(handlers::catalog::raw_factors_handler),
        )
        .route(
            "/api/years/:year/range",
            get(handlers::catalog::range_handler),
        )
        .route(
            "/api/years/:year/states",
            get(handlers::catalog::states_handler),
        )
        .route(
            "/api/years/:year/states/:state/counties",
            get(handlers::catalog::counties_handler),
        )
        // Selection
        .route(
            "/api/selection",
            get(handlers::resolve::selection_handler),
        )
        // Maps
        .route("/api/map", get(handlers::maps::map_handler))
        .route("/api/raw-map", get(handlers::maps::raw_map_handler))
        .route("/api/state-map", get(handlers::maps::state_map_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(Extension(prometheus))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
