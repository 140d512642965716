use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ApiResponse;
use crate::errors::AppError;
use crate::models::{
    ClusterResult, ClusterSummary, DifferentialPick, FormTrendPrediction, PriceChangePrediction,
    PriceDirection,
};
use crate::services::AnalysisSnapshot;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
    pub direction: Option<PriceDirection>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotStatus {
    pub generated_at: DateTime<Utc>,
    pub current_gameweek: u32,
    pub players_clustered: usize,
    pub differentials: usize,
    pub form_trends: usize,
    pub price_changes: usize,
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

async fn latest(state: &AppState) -> Result<Arc<AnalysisSnapshot>, AppError> {
    state
        .cache
        .latest()
        .await
        .ok_or_else(|| AppError::Unavailable("No predictions available yet".into()))
}

fn limited<T: Clone>(items: &[T], limit: Option<usize>) -> Vec<T> {
    let n = limit.unwrap_or(items.len()).min(items.len());
    items[..n].to_vec()
}

pub async fn status(State(state): State<AppState>) -> ApiResult<SnapshotStatus> {
    let snap = latest(&state).await?;
    Ok(Json(ApiResponse::ok(SnapshotStatus {
        generated_at: snap.generated_at,
        current_gameweek: snap.current_gameweek,
        players_clustered: snap.clusters.len(),
        differentials: snap.differentials.len(),
        form_trends: snap.form_trends.len(),
        price_changes: snap.price_changes.len(),
    })))
}

pub async fn clusters(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<ClusterResult>> {
    let snap = latest(&state).await?;
    Ok(Json(ApiResponse::ok(limited(&snap.clusters, params.limit))))
}

pub async fn cluster_summary(State(state): State<AppState>) -> ApiResult<Vec<ClusterSummary>> {
    let snap = latest(&state).await?;
    Ok(Json(ApiResponse::ok(snap.cluster_summaries.clone())))
}

pub async fn differentials(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<DifferentialPick>> {
    let snap = latest(&state).await?;
    Ok(Json(ApiResponse::ok(limited(&snap.differentials, params.limit))))
}

pub async fn form_trends(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<FormTrendPrediction>> {
    let snap = latest(&state).await?;
    Ok(Json(ApiResponse::ok(limited(&snap.form_trends, params.limit))))
}

pub async fn form_trend_detail(
    State(state): State<AppState>,
    Path(player_id): Path<i64>,
) -> ApiResult<FormTrendPrediction> {
    let snap = latest(&state).await?;
    let prediction = snap
        .form_trends
        .iter()
        .find(|p| p.player_id == player_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("No form trend for player {player_id}")))?;
    Ok(Json(ApiResponse::ok(prediction)))
}

pub async fn price_changes(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<PriceChangePrediction>> {
    let snap = latest(&state).await?;
    let filtered: Vec<PriceChangePrediction> = snap
        .price_changes
        .iter()
        .filter(|p| params.direction.map_or(true, |d| p.price_change_direction == d))
        .cloned()
        .collect();
    Ok(Json(ApiResponse::ok(limited(&filtered, params.limit))))
}
