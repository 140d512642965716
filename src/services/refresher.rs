use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use metrics::{counter, gauge, histogram};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::{interval, Duration};

use super::cache::{AnalysisSnapshot, SnapshotCache};
use crate::config::AppConfig;
use crate::fpl::convert::{
    current_gameweek, features_from_bootstrap, team_names, to_history,
    transfer_stats_from_bootstrap,
};
use crate::fpl::{ApiElement, Bootstrap, FplClient};
use crate::intelligence::{
    cluster_players, estimate_price_changes, forecast_form_trends, identify_differentials,
    summarize_clusters,
};
use crate::models::PlayerHistory;

/// Periodically rebuild the analysis snapshot from the FPL API.
///
/// The first cycle runs immediately. A failed cycle is logged and counted;
/// the previously published snapshot stays in place.
pub async fn run_analysis_refresher(client: FplClient, cache: SnapshotCache, cfg: AppConfig) {
    let mut ticker = interval(Duration::from_secs(cfg.refresh_interval_secs));

    tracing::info!(
        interval_secs = cfg.refresh_interval_secs,
        "Analysis refresher started"
    );

    loop {
        ticker.tick().await;

        let start = Instant::now();
        match refresh_once(&client, &cache, &cfg).await {
            Ok(()) => {
                counter!("snapshot_refreshes_total").increment(1);
                histogram!("snapshot_refresh_seconds").record(start.elapsed().as_secs_f64());
            }
            Err(e) => {
                counter!("snapshot_refresh_failures_total").increment(1);
                tracing::error!(error = %e, "Analysis refresh failed, keeping previous snapshot");
            }
        }
    }
}

/// Fetch fresh data, run every analysis and publish the result.
pub async fn refresh_once(
    client: &FplClient,
    cache: &SnapshotCache,
    cfg: &AppConfig,
) -> anyhow::Result<()> {
    let bootstrap = client.get_bootstrap().await?;
    let histories = fetch_histories(client, &bootstrap, cfg).await;

    let mut rng = StdRng::from_entropy();
    let snapshot = build_snapshot(&bootstrap, &histories, cfg, Utc::now(), &mut rng);

    gauge!("players_clustered").set(snapshot.clusters.len() as f64);
    gauge!("differentials_found").set(snapshot.differentials.len() as f64);

    tracing::info!(
        gameweek = snapshot.current_gameweek,
        players = snapshot.clusters.len(),
        differentials = snapshot.differentials.len(),
        form_trends = snapshot.form_trends.len(),
        price_changes = snapshot.price_changes.len(),
        "Analysis snapshot published"
    );

    cache.publish(snapshot).await;
    Ok(())
}

/// Players worth forecasting: those with minutes, best form first.
pub fn forecast_candidates(bootstrap: &Bootstrap, limit: usize) -> Vec<&ApiElement> {
    let mut candidates: Vec<&ApiElement> =
        bootstrap.elements.iter().filter(|e| e.minutes > 0).collect();
    candidates.sort_by(|a, b| b.form.partial_cmp(&a.form).unwrap_or(Ordering::Equal));
    candidates.truncate(limit);
    candidates
}

async fn fetch_histories(
    client: &FplClient,
    bootstrap: &Bootstrap,
    cfg: &AppConfig,
) -> Vec<PlayerHistory> {
    let teams = Arc::new(team_names(&bootstrap.teams));
    let window = cfg.forecast_history_window;
    let candidates: Vec<ApiElement> = forecast_candidates(bootstrap, cfg.forecast_player_limit)
        .into_iter()
        .cloned()
        .collect();

    // Each fetch owns its inputs so the refresher future stays `Send`.
    let client = client.clone();
    let results: Vec<Option<PlayerHistory>> = stream::iter(candidates)
        .map(move |element| {
            let client = client.clone();
            let teams = Arc::clone(&teams);
            async move {
                match client.get_element_summary(element.id).await {
                    Ok(summary) => Some(to_history(&element, &teams, &summary.history, window)),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            player_id = element.id,
                            "Failed to fetch player history, skipping"
                        );
                        None
                    }
                }
            }
        })
        .buffer_unordered(cfg.history_fetch_concurrency)
        .collect()
        .await;

    results.into_iter().flatten().collect()
}

/// Run every analysis over already-fetched data.
///
/// Pure apart from `rng`, which seeds the k-means centroids.
pub fn build_snapshot<R: Rng + ?Sized>(
    bootstrap: &Bootstrap,
    histories: &[PlayerHistory],
    cfg: &AppConfig,
    now: DateTime<Utc>,
    rng: &mut R,
) -> AnalysisSnapshot {
    let gameweek = current_gameweek(&bootstrap.events);

    let features = features_from_bootstrap(bootstrap);
    let clusters = cluster_players(&features, cfg.kmeans(), rng);
    let cluster_summaries = summarize_clusters(&clusters);
    let differentials = identify_differentials(&clusters, cfg.differentials());

    let form_trends = forecast_form_trends(histories, gameweek);

    let transfer_stats = transfer_stats_from_bootstrap(bootstrap);
    let price_changes = estimate_price_changes(
        &transfer_stats,
        gameweek,
        now.date_naive(),
        cfg.price_min_probability,
    );

    AnalysisSnapshot {
        generated_at: now,
        current_gameweek: gameweek,
        clusters,
        cluster_summaries,
        differentials,
        form_trends,
        price_changes,
    }
}
