use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // Cached output of the scheduled refresh
    let snapshot = Router::new()
        .route("/api/snapshot/status", get(handlers::snapshot::status))
        .route("/api/clusters", get(handlers::snapshot::clusters))
        .route("/api/clusters/summary", get(handlers::snapshot::cluster_summary))
        .route("/api/differentials", get(handlers::snapshot::differentials))
        .route("/api/form-trends", get(handlers::snapshot::form_trends))
        .route("/api/form-trends/:player_id", get(handlers::snapshot::form_trend_detail))
        .route("/api/price-changes", get(handlers::snapshot::price_changes));

    // On-demand analysis over caller-supplied records
    let analyze = Router::new()
        .route("/api/analyze/clusters", post(handlers::analyze::clusters))
        .route("/api/analyze/differentials", post(handlers::analyze::differentials))
        .route("/api/analyze/form-trends", post(handlers::analyze::form_trends))
        .route("/api/analyze/price-changes", post(handlers::analyze::price_changes));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(snapshot)
        .merge(analyze)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
