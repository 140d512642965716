use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::AppState;

/// Liveness plus whether a snapshot has been published yet.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.cache.latest().await;

    Json(json!({
        "status": "healthy",
        "snapshot_ready": snapshot.is_some(),
        "generated_at": snapshot.map(|s| s.generated_at.to_rfc3339()),
    }))
}
