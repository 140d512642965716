use axum::extract::State;
use axum::Json;
use chrono::{NaiveDate, Utc};
use metrics::counter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::ApiResponse;
use crate::errors::AppError;
use crate::intelligence::{
    cluster_players, estimate_price_changes, forecast_form_trends, identify_differentials,
    summarize_clusters, DifferentialConfig, KMeansConfig,
};
use crate::models::{
    finite_or_zero, ClusterResult, ClusterSummary, DifferentialPick, FormTrendPrediction,
    PlayerFeatures, PlayerHistory, PlayerTransferStats, PriceChangePrediction,
};
use crate::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRequest {
    pub players: Vec<PlayerFeatures>,
    pub k: Option<usize>,
    pub max_iterations: Option<usize>,
    /// Fixes centroid seeding so repeated calls agree.
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferentialRequest {
    #[serde(flatten)]
    pub clustering: ClusterRequest,
    pub ownership_threshold: Option<f64>,
    pub form_threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTrendRequest {
    pub current_gameweek: u32,
    pub players: Vec<PlayerHistory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChangeRequest {
    pub current_gameweek: u32,
    pub players: Vec<PlayerTransferStats>,
    pub min_probability: Option<f64>,
    /// Reference date for expected-change dates; defaults to today (UTC).
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResponse {
    pub clusters: Vec<ClusterResult>,
    pub summaries: Vec<ClusterSummary>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn clusters(
    State(state): State<AppState>,
    Json(body): Json<ClusterRequest>,
) -> Result<Json<ApiResponse<ClusterResponse>>, AppError> {
    counter!("analysis_requests_total", "kind" => "clusters").increment(1);

    let clusters = run_clustering(&state, &body)?;
    let summaries = summarize_clusters(&clusters);

    Ok(Json(ApiResponse::ok(ClusterResponse { clusters, summaries })))
}

pub async fn differentials(
    State(state): State<AppState>,
    Json(body): Json<DifferentialRequest>,
) -> Result<Json<ApiResponse<Vec<DifferentialPick>>>, AppError> {
    counter!("analysis_requests_total", "kind" => "differentials").increment(1);

    let defaults = state.config.differentials();
    let cfg = DifferentialConfig {
        ownership_threshold: body.ownership_threshold.unwrap_or(defaults.ownership_threshold),
        form_threshold: body.form_threshold.unwrap_or(defaults.form_threshold),
    };

    let clusters = run_clustering(&state, &body.clustering)?;
    let picks = identify_differentials(&clusters, cfg);

    tracing::debug!(
        players = clusters.len(),
        picks = picks.len(),
        "Differential analysis served"
    );

    Ok(Json(ApiResponse::ok(picks)))
}

pub async fn form_trends(
    Json(body): Json<FormTrendRequest>,
) -> Result<Json<ApiResponse<Vec<FormTrendPrediction>>>, AppError> {
    counter!("analysis_requests_total", "kind" => "form_trends").increment(1);

    let players: Vec<PlayerHistory> = body.players.into_iter().map(sanitize_history).collect();
    let predictions = forecast_form_trends(&players, body.current_gameweek);

    Ok(Json(ApiResponse::ok(predictions)))
}

pub async fn price_changes(
    State(state): State<AppState>,
    Json(body): Json<PriceChangeRequest>,
) -> Result<Json<ApiResponse<Vec<PriceChangePrediction>>>, AppError> {
    counter!("analysis_requests_total", "kind" => "price_changes").increment(1);

    let min_probability = body
        .min_probability
        .unwrap_or(state.config.price_min_probability);
    let today = body.today.unwrap_or_else(|| Utc::now().date_naive());

    let players = body
        .players
        .into_iter()
        .map(sanitize_transfer_stats)
        .collect::<Result<Vec<PlayerTransferStats>, AppError>>()?;
    let predictions =
        estimate_price_changes(&players, body.current_gameweek, today, min_probability);

    Ok(Json(ApiResponse::ok(predictions)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Posted iteration counts may exceed the configured default by this factor.
const MAX_ITERATIONS_FACTOR: usize = 10;

fn kmeans_config(defaults: KMeansConfig, body: &ClusterRequest) -> Result<KMeansConfig, AppError> {
    let k = body.k.unwrap_or(defaults.k);
    if k == 0 {
        return Err(AppError::BadRequest("k must be at least 1".into()));
    }

    let iteration_cap = defaults.max_iterations.max(1).saturating_mul(MAX_ITERATIONS_FACTOR);
    let max_iterations = body
        .max_iterations
        .unwrap_or(defaults.max_iterations)
        .min(iteration_cap);

    Ok(KMeansConfig { k, max_iterations })
}

fn run_clustering(state: &AppState, body: &ClusterRequest) -> Result<Vec<ClusterResult>, AppError> {
    let cfg = kmeans_config(state.config.kmeans(), body)?;

    let players: Vec<PlayerFeatures> = body
        .players
        .iter()
        .cloned()
        .map(PlayerFeatures::sanitized)
        .collect();
    let mut rng = match body.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    Ok(cluster_players(&players, cfg, &mut rng))
}

fn sanitize_history(mut player: PlayerHistory) -> PlayerHistory {
    player.current_form = finite_or_zero(player.current_form);
    for sample in player.history.iter_mut() {
        sample.points = finite_or_zero(sample.points);
        sample.form = finite_or_zero(sample.form);
        sample.expected_goals = finite_or_zero(sample.expected_goals);
        sample.expected_assists = finite_or_zero(sample.expected_assists);
    }
    player
}

fn sanitize_transfer_stats(mut player: PlayerTransferStats) -> Result<PlayerTransferStats, AppError> {
    if player.transfers_in < 0 || player.transfers_out < 0 {
        return Err(AppError::BadRequest(format!(
            "Transfer counts for player {} must not be negative",
            player.player_id
        )));
    }
    player.current_price = finite_or_zero(player.current_price);
    player.ownership = finite_or_zero(player.ownership).clamp(0.0, 100.0);
    player.form = finite_or_zero(player.form);
    Ok(player)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster_request(k: Option<usize>, max_iterations: Option<usize>) -> ClusterRequest {
        ClusterRequest {
            players: vec![],
            k,
            max_iterations,
            seed: None,
        }
    }

    fn transfer_stats(transfers_in: i64, transfers_out: i64, ownership: f64) -> PlayerTransferStats {
        PlayerTransferStats {
            player_id: 7,
            player_name: "Player 7".into(),
            team_name: None,
            position: None,
            current_price: 6.5,
            transfers_in,
            transfers_out,
            ownership,
            form: 4.0,
        }
    }

    #[test]
    fn test_kmeans_config_caps_iterations() {
        let defaults = KMeansConfig { k: 4, max_iterations: 100 };

        let cfg = kmeans_config(defaults, &cluster_request(None, Some(usize::MAX))).unwrap();
        assert_eq!(cfg.max_iterations, 1_000);
        assert_eq!(cfg.k, 4);

        let cfg = kmeans_config(defaults, &cluster_request(Some(2), Some(25))).unwrap();
        assert_eq!(cfg.max_iterations, 25);
        assert_eq!(cfg.k, 2);

        assert!(matches!(
            kmeans_config(defaults, &cluster_request(Some(0), None)),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_transfer_stats_sanitizer() {
        assert!(matches!(
            sanitize_transfer_stats(transfer_stats(-1, 0, 10.0)),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            sanitize_transfer_stats(transfer_stats(10, -5, 10.0)),
            Err(AppError::BadRequest(_))
        ));

        let low = sanitize_transfer_stats(transfer_stats(10, 5, -10.0)).unwrap();
        assert_eq!(low.ownership, 0.0);
        let high = sanitize_transfer_stats(transfer_stats(10, 5, 140.0)).unwrap();
        assert_eq!(high.ownership, 100.0);
        let nan = sanitize_transfer_stats(transfer_stats(10, 5, f64::NAN)).unwrap();
        assert_eq!(nan.ownership, 0.0);
    }
}
